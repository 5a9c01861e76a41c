//! Rating stars and price tier, built from library templates.

use fir_dom::Element;

use crate::error::TemplateError;
use crate::templates::Renderer;

/// Template holding the star icons.
pub const RATING_TEMPLATE: &str = "rating";
/// Template of a filled star.
pub const STAR_TEMPLATE: &str = "star-icon";
/// Template of an empty star.
pub const STAR_BORDER_TEMPLATE: &str = "star-border-icon";
/// Template holding the price tier.
pub const PRICE_TEMPLATE: &str = "price";

/// Number of stars in a rating.
pub const RATING_STARS: u8 = 5;

impl Renderer {
    /// Render a five-star rating for `score`.
    ///
    /// Star `r` (zero-based) is filled when `r < floor(score)`.
    pub fn render_rating(&self, score: f64) -> Result<Element, TemplateError> {
        let mut el = self.render_template(RATING_TEMPLATE, None)?;
        let filled = score.floor();
        for r in 0..RATING_STARS {
            let icon = if f64::from(r) < filled {
                STAR_TEMPLATE
            } else {
                STAR_BORDER_TEMPLATE
            };
            el.append(self.render_template(icon, None)?);
        }
        Ok(el)
    }

    /// Render a price tier as `tier` dollar signs.
    pub fn render_price(&self, tier: usize) -> Result<Element, TemplateError> {
        let mut el = self.render_template(PRICE_TEMPLATE, None)?;
        el.append_text("$".repeat(tier));
        Ok(el)
    }
}

#[cfg(test)]
mod tests {
    use fir_dom::serialize;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::templates::Templates;

    const LIBRARY: &str = r#"<div>
<div id="rating" class="template rating" hidden=""/>
<i id="star-icon" class="template material-icons" hidden="">star</i>
<i id="star-border-icon" class="template material-icons" hidden="">star_border</i>
<div id="price" class="template price" hidden=""/>
</div>"#;

    fn renderer() -> Renderer {
        Renderer::new(Templates::parse(LIBRARY, "template").unwrap())
    }

    fn stars(el: &Element) -> Vec<String> {
        el.child_elements().map(Element::text_content).collect()
    }

    #[test]
    fn test_rating_rounds_down() {
        let el = renderer().render_rating(3.7).unwrap();
        assert_eq!(
            stars(&el),
            vec!["star", "star", "star", "star_border", "star_border"]
        );
    }

    #[test]
    fn test_rating_bounds() {
        let renderer = renderer();
        assert_eq!(
            stars(&renderer.render_rating(0.0).unwrap()),
            vec!["star_border"; 5]
        );
        assert_eq!(stars(&renderer.render_rating(5.0).unwrap()), vec!["star"; 5]);
        assert_eq!(stars(&renderer.render_rating(9.0).unwrap()).len(), 5);
        assert_eq!(
            stars(&renderer.render_rating(f64::NAN).unwrap()),
            vec!["star_border"; 5]
        );
    }

    #[test]
    fn test_price_tier() {
        let el = renderer().render_price(2).unwrap();
        assert_eq!(el.text_content(), "$$");
        assert_eq!(serialize(&el), r#"<div id="price" class="template price">$$</div>"#);
    }

    #[test]
    fn test_price_zero() {
        let el = renderer().render_price(0).unwrap();
        assert!(el.children.is_empty());
    }

    #[test]
    fn test_missing_rating_template() {
        let renderer = Renderer::new(Templates::new());
        assert!(matches!(
            renderer.render_rating(4.0),
            Err(TemplateError::NotFound(ref id)) if id == RATING_TEMPLATE
        ));
    }
}
