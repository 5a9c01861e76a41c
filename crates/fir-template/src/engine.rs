//! Directive engine.
//!
//! A render pass runs in two phases over the descendants of the root:
//!
//! 1. **Repetition**: every `data-fir-foreach` element is replaced by one
//!    clone per list item. Directive paths on each clone and its descendants
//!    have their first placeholder bound to `<list>/<index>`, and the bound
//!    values are written back to the clone's attributes. Clones are not
//!    expanded again in the same pass. The same walk parses every directive
//!    once into the pass plan.
//! 2. **Evaluation**: the planned directives run kind by kind in
//!    [`DirectiveKind::EVALUATION_ORDER`], each kind in document order.

use std::collections::HashSet;
use std::ops::ControlFlow;

use fir_dom::{Element, Node};

use crate::directive::{Directive, DirectiveKind};
use crate::error::{
    DirectiveError, DirectiveFailure, DirectiveValueError, PathError, RenderFailures,
};
use crate::path::FieldPath;
use crate::value::Value;

/// How directive failures inside one render pass are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Process every element and report all failures after the pass.
    #[default]
    Collect,
    /// Stop the pass at the first failure.
    FailFast,
}

/// Options of a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Failure reporting.
    pub error_policy: ErrorPolicy,
    /// Skip evaluation inside elements hidden earlier in the same pass.
    ///
    /// Off by default: hidden subtrees are still evaluated, so a missing
    /// field under a hidden element is still reported.
    pub skip_hidden: bool,
}

impl RenderOptions {
    /// Set the error policy.
    #[must_use]
    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Enable or disable skipping of hidden subtrees.
    #[must_use]
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }
}

/// Applies directives to an element tree.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    options: RenderOptions,
}

/// Directive parsed once for the pass, located by child-index path.
struct Planned {
    position: Vec<usize>,
    kind: DirectiveKind,
    /// Attribute value after placeholder binding.
    raw: String,
    directive: Result<Directive, DirectiveValueError>,
}

/// Mutable state of one render pass.
#[derive(Default)]
struct Pass {
    failures: Vec<DirectiveFailure>,
    /// Evaluation-kind directives of every element, in document order.
    plan: Vec<Planned>,
    /// Child-index paths of elements hidden during the pass.
    hidden: HashSet<Vec<usize>>,
}

impl Pass {
    fn is_hidden(&self, position: &[usize]) -> bool {
        (1..=position.len()).any(|n| self.hidden.contains(&position[..n]))
    }
}

impl Engine {
    /// Create an engine with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Engine options.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render `root` in place against `data`.
    ///
    /// Only descendants of `root` are evaluated. With
    /// [`ErrorPolicy::Collect`] every element is processed and successful
    /// elements keep their effects even when the pass returns failures.
    pub fn render(&self, root: &mut Element, data: &Value) -> Result<(), RenderFailures> {
        let mut pass = Pass::default();
        let expanded = self.expand(root, data, &mut Vec::new(), &mut pass);
        let plan = if expanded.is_break() {
            Vec::new()
        } else {
            std::mem::take(&mut pass.plan)
        };

        'phases: for kind in DirectiveKind::EVALUATION_ORDER {
            for planned in plan.iter().filter(|planned| planned.kind == kind) {
                if self.evaluate(root, planned, data, &mut pass).is_break() {
                    break 'phases;
                }
            }
        }

        tracing::debug!(
            root = %root.tag,
            directives = plan.len(),
            failures = pass.failures.len(),
            "Render pass complete"
        );

        if pass.failures.is_empty() {
            Ok(())
        } else {
            Err(RenderFailures::new(pass.failures))
        }
    }

    fn record(&self, pass: &mut Pass, failure: DirectiveFailure) -> ControlFlow<()> {
        tracing::debug!(%failure, "Directive failed");
        pass.failures.push(failure);
        match self.options.error_policy {
            ErrorPolicy::Collect => ControlFlow::Continue(()),
            ErrorPolicy::FailFast => ControlFlow::Break(()),
        }
    }

    /// Replace repeated elements by their clones and plan every directive.
    fn expand(
        &self,
        el: &mut Element,
        data: &Value,
        position: &mut Vec<usize>,
        pass: &mut Pass,
    ) -> ControlFlow<()> {
        let attribute = DirectiveKind::Foreach.attribute();
        let mut i = 0;

        while i < el.children.len() {
            let Node::Element(child) = &mut el.children[i] else {
                i += 1;
                continue;
            };
            let Some(raw) = child.attr(&attribute).map(str::to_owned) else {
                position.push(i);
                plan_element(child, position, None, &mut pass.plan);
                self.expand(child, data, position, pass)?;
                position.pop();
                i += 1;
                continue;
            };

            match repeat(child, &raw, data) {
                Ok((list, clones)) => {
                    let count = clones.len();
                    el.children
                        .splice(i..=i, clones.into_iter().map(Node::Element));
                    for (index, clone) in el.children[i..i + count]
                        .iter_mut()
                        .filter_map(Node::as_element_mut)
                        .enumerate()
                    {
                        position.push(i + index);
                        plan_subtree(clone, position, &list, index, &mut pass.plan);
                        position.pop();
                    }
                    i += count;
                }
                Err(error) => {
                    let tag = child.tag.clone();
                    el.children.remove(i);
                    self.record(
                        pass,
                        DirectiveFailure {
                            kind: DirectiveKind::Foreach,
                            raw,
                            tag,
                            error,
                        },
                    )?;
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn evaluate(
        &self,
        root: &mut Element,
        planned: &Planned,
        data: &Value,
        pass: &mut Pass,
    ) -> ControlFlow<()> {
        if self.options.skip_hidden && pass.is_hidden(&planned.position) {
            return ControlFlow::Continue(());
        }
        // Gone when an ancestor's content was replaced earlier in the pass.
        let Some(el) = element_at_mut(root, &planned.position) else {
            return ControlFlow::Continue(());
        };

        let result = match &planned.directive {
            Ok(directive) => apply(directive, el, data),
            Err(error) => Err(error.clone().into()),
        };
        match result {
            Ok(true) => {
                pass.hidden.insert(planned.position.clone());
                ControlFlow::Continue(())
            }
            Ok(false) => ControlFlow::Continue(()),
            Err(error) => {
                let failure = DirectiveFailure {
                    kind: planned.kind,
                    raw: planned.raw.clone(),
                    tag: el.tag.clone(),
                    error,
                };
                self.record(pass, failure)
            }
        }
    }
}

fn element_at_mut<'a>(root: &'a mut Element, position: &[usize]) -> Option<&'a mut Element> {
    position.iter().try_fold(root, |el, &i| {
        el.children.get_mut(i).and_then(Node::as_element_mut)
    })
}

/// Clone `template` once per item of the list at `raw`.
///
/// Clones lose their foreach attribute; their paths are still unbound.
fn repeat(
    template: &Element,
    raw: &str,
    data: &Value,
) -> Result<(FieldPath, Vec<Element>), DirectiveError> {
    let list = FieldPath::parse(raw)?;
    let Value::List(items) = list.resolve(data)? else {
        return Err(PathError::NotAList {
            path: list.to_string(),
        }
        .into());
    };

    let attribute = DirectiveKind::Foreach.attribute();
    let clones = (0..items.len())
        .map(|_| {
            let mut clone = template.clone();
            clone.remove_attr(&attribute);
            clone
        })
        .collect();
    Ok((list, clones))
}

/// Parse the directives of `el` into `plan`.
///
/// With a binding, the first placeholder of each path is bound to
/// `list/index` and the bound value is written back to the attribute.
/// Malformed values are planned as failures of their kind. Foreach values
/// are bound but not planned: clones are not expanded again.
fn plan_element(
    el: &mut Element,
    position: &[usize],
    binding: Option<(&FieldPath, usize)>,
    plan: &mut Vec<Planned>,
) {
    for kind in DirectiveKind::ALL {
        let attribute = kind.attribute();
        let Some(mut raw) = el.attr(&attribute).map(str::to_owned) else {
            continue;
        };

        let mut directive = Directive::parse(kind, &raw);
        if let (Some((list, index)), Ok(parsed)) = (binding, directive.as_mut())
            && parsed.bind(list, index)
        {
            raw = parsed.raw_value();
            el.set_attr(attribute, raw.clone());
        }

        if kind != DirectiveKind::Foreach {
            plan.push(Planned {
                position: position.to_vec(),
                kind,
                raw,
                directive,
            });
        }
    }
}

/// Plan a clone and its descendants with their placeholders bound.
fn plan_subtree(
    el: &mut Element,
    position: &mut Vec<usize>,
    list: &FieldPath,
    index: usize,
    plan: &mut Vec<Planned>,
) {
    plan_element(el, position, Some((list, index)), plan);
    for (i, child) in el.children.iter_mut().enumerate() {
        if let Node::Element(child) = child {
            position.push(i);
            plan_subtree(child, position, list, index, plan);
            position.pop();
        }
    }
}

/// Apply one directive. Returns `true` when the element was hidden.
fn apply(directive: &Directive, el: &mut Element, data: &Value) -> Result<bool, DirectiveError> {
    let value = directive.path().resolve(data)?;

    match directive {
        Directive::Foreach(_) => {}
        Directive::Content(path) => el.set_text_content(display(&value, path)?),
        Directive::Click(path) => {
            let Value::Action(callback) = value else {
                return Err(PathError::NotCallable {
                    path: path.to_string(),
                }
                .into());
            };
            el.set_listener("click", callback);
        }
        Directive::If(_) => {
            if !value.is_truthy() {
                el.hide();
                return Ok(true);
            }
        }
        Directive::IfNot(_) => {
            if value.is_truthy() {
                el.hide();
                return Ok(true);
            }
        }
        Directive::Attr { name, path } => el.set_attr(name.clone(), display(&value, path)?),
        Directive::Style { property, path } => {
            let text = display(&value, path)?;
            let property = css_property_name(property);
            if property == "background-image" {
                el.set_style_property(property, format!("url({text})"));
            } else {
                el.set_style_property(property, text);
            }
        }
    }

    Ok(false)
}

fn display(value: &Value, path: &FieldPath) -> Result<String, PathError> {
    value.to_display().ok_or_else(|| PathError::NotDisplayable {
        path: path.to_string(),
    })
}

/// CSS name of a style property written in camelCase or kebab-case.
///
/// `backgroundImage` matches case-insensitively; custom properties (`--x`)
/// are kept as written.
fn css_property_name(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_owned();
    }
    if property.eq_ignore_ascii_case("backgroundimage")
        || property.eq_ignore_ascii_case("background-image")
    {
        return "background-image".to_owned();
    }

    let mut name = String::with_capacity(property.len() + 4);
    for (i, c) in property.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                name.push('-');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}
