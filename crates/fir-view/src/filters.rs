//! Restaurant list filters.

use std::fmt;
use std::str::FromStr;

use fir_source::{Direction, FilterOp, Query};

/// Collection holding restaurants.
const RESTAURANTS: &str = "restaurants";
/// Result size of the unfiltered list.
const DEFAULT_LIMIT: usize = 50;

/// Rated/unrated filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rated {
    /// Both rated and unrated restaurants.
    #[default]
    Either,
    /// Restaurants with at least one rating.
    Rated,
    /// Restaurants without ratings.
    Unrated,
}

/// Sort order by average rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RatingOrder {
    /// Best rated first.
    #[default]
    Decreasing,
    /// Worst rated first.
    Increasing,
}

/// Unknown filter keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseFilterError {
    kind: &'static str,
    value: String,
}

impl FromStr for Rated {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "either" | "any" => Ok(Self::Either),
            "rated" => Ok(Self::Rated),
            "unrated" => Ok(Self::Unrated),
            _ => Err(ParseFilterError {
                kind: "rated filter",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for RatingOrder {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decreasing" | "desc" => Ok(Self::Decreasing),
            "increasing" | "asc" => Ok(Self::Increasing),
            _ => Err(ParseFilterError {
                kind: "rating order",
                value: s.to_owned(),
            }),
        }
    }
}

/// Filters of the restaurant list. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// City to match exactly.
    pub city: Option<String>,
    /// Category to match exactly.
    pub category: Option<String>,
    /// Price tier (number of `$`).
    pub price: Option<u8>,
    /// Rated/unrated filter.
    pub rated: Rated,
    /// Sort order.
    pub rating_order: RatingOrder,
}

impl Filters {
    /// True if no filter narrows or reorders the list.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Query over the restaurant collection.
    ///
    /// Without filters the query is the 50 best rated restaurants.
    #[must_use]
    pub fn to_query(&self) -> Query {
        let query = Query::new(RESTAURANTS);
        if self.is_default() {
            return query
                .order_by("avgRating", Direction::Descending)
                .limit(DEFAULT_LIMIT);
        }

        let mut query = query;
        if let Some(category) = &self.category {
            query = query.filter("category", FilterOp::Eq, category.as_str());
        }
        if let Some(city) = &self.city {
            query = query.filter("city", FilterOp::Eq, city.as_str());
        }
        if let Some(price) = self.price {
            query = query.filter("price", FilterOp::Eq, price);
        }
        query = match self.rated {
            Rated::Either => query,
            Rated::Rated => query.filter("avgRating", FilterOp::Gt, 0),
            Rated::Unrated => query.filter("avgRating", FilterOp::Lt, 1),
        };
        let direction = match self.rating_order {
            RatingOrder::Decreasing => Direction::Descending,
            RatingOrder::Increasing => Direction::Ascending,
        };
        query.order_by("avgRating", direction)
    }

    /// Sentence describing the filters, shown above the list.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            return f.write_str("any type of food with any price in any city.");
        }

        let rated = match self.rated {
            Rated::Rated => "rated",
            Rated::Unrated => "unrated",
            Rated::Either => "both rated and unrated",
        };
        match &self.category {
            Some(category) => write!(f, "{rated} {category} places")?,
            None => write!(f, "{rated} restaurants")?,
        }
        match &self.city {
            Some(city) => write!(f, " in {city}")?,
            None => f.write_str(" located anywhere")?,
        }
        match self.price {
            Some(price) => write!(f, " with a price of {}", "$".repeat(usize::from(price)))?,
            None => f.write_str(" with any price")?,
        }
        match self.rating_order {
            RatingOrder::Decreasing => f.write_str(", sorted by descending rating"),
            RatingOrder::Increasing => f.write_str(", sorted by ascending rating"),
        }
    }
}

#[cfg(test)]
mod tests {
    use fir_source::{Filter, Order};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_default_query() {
        let query = Filters::default().to_query();

        assert_eq!(query.collection, "restaurants");
        assert!(query.filters.is_empty());
        assert_eq!(
            query.order,
            Some(Order {
                field: "avgRating".to_owned(),
                direction: Direction::Descending,
            })
        );
        assert_eq!(query.limit, Some(50));
    }

    #[test]
    fn test_filtered_query() {
        let filters = Filters {
            city: Some("Oakland".to_owned()),
            category: Some("Deli".to_owned()),
            price: Some(2),
            rated: Rated::Unrated,
            rating_order: RatingOrder::Increasing,
        };

        let query = filters.to_query();

        assert_eq!(
            query.filters,
            vec![
                Filter {
                    field: "category".to_owned(),
                    op: FilterOp::Eq,
                    value: json!("Deli"),
                },
                Filter {
                    field: "city".to_owned(),
                    op: FilterOp::Eq,
                    value: json!("Oakland"),
                },
                Filter {
                    field: "price".to_owned(),
                    op: FilterOp::Eq,
                    value: json!(2),
                },
                Filter {
                    field: "avgRating".to_owned(),
                    op: FilterOp::Lt,
                    value: json!(1),
                },
            ]
        );
        assert_eq!(query.order.unwrap().direction, Direction::Ascending);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn test_describe_default() {
        assert_eq!(
            Filters::default().describe(),
            "any type of food with any price in any city."
        );
    }

    #[test]
    fn test_describe_filtered() {
        let filters = Filters {
            city: Some("Oakland".to_owned()),
            category: Some("Deli".to_owned()),
            price: Some(3),
            rated: Rated::Rated,
            rating_order: RatingOrder::Decreasing,
        };
        assert_eq!(
            filters.describe(),
            "rated Deli places in Oakland with a price of $$$, sorted by descending rating"
        );
    }

    #[test]
    fn test_describe_partial() {
        let filters = Filters {
            rating_order: RatingOrder::Increasing,
            ..Filters::default()
        };
        assert_eq!(
            filters.describe(),
            "both rated and unrated restaurants located anywhere with any price, sorted by ascending rating"
        );
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!("Rated".parse::<Rated>(), Ok(Rated::Rated));
        assert_eq!("either".parse::<Rated>(), Ok(Rated::Either));
        assert_eq!("asc".parse::<RatingOrder>(), Ok(RatingOrder::Increasing));
        let err = "sometimes".parse::<Rated>().unwrap_err();
        assert_eq!(err.to_string(), "unknown rated filter \"sometimes\"");
    }
}
