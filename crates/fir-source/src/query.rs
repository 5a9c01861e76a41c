//! Collection queries: field filters, ordering and a result limit.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::Document;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals the value.
    Eq,
    /// Field is less than the value.
    Lt,
    /// Field is greater than the value.
    Gt,
}

/// Field filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field name.
    pub field: String,
    /// Comparison.
    pub op: FilterOp,
    /// Value compared against.
    pub value: Value,
}

impl Filter {
    /// True if `doc` passes the filter. Documents without the field never pass.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(field) = doc.field(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => compare(field, &self.value)
                .map_or_else(|| field == &self.value, Ordering::is_eq),
            FilterOp::Lt => compare(field, &self.value) == Some(Ordering::Less),
            FilterOp::Gt => compare(field, &self.value) == Some(Ordering::Greater),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Result ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Field to sort by.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// Query over one collection.
///
/// # Example
///
/// ```
/// use fir_source::{Direction, FilterOp, Query};
///
/// let query = Query::new("restaurants")
///     .filter("city", FilterOp::Eq, "Oakland")
///     .order_by("avgRating", Direction::Descending)
///     .limit(50);
///
/// assert_eq!(query.collection, "restaurants");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Collection name.
    pub collection: String,
    /// Filters, all of which must pass.
    pub filters: Vec<Filter>,
    /// Result ordering. Documents lacking the field are excluded.
    pub order: Option<Order>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl Query {
    /// Query every document of `collection`.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value: value.into(),
        });
        self
    }

    /// Order results by `field`.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            field: field.into(),
            direction,
        });
        self
    }

    /// Limit the number of results.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True if `doc` passes every filter and has the order field.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|filter| filter.matches(doc))
            && self
                .order
                .as_ref()
                .is_none_or(|order| doc.field(&order.field).is_some())
    }

    /// Evaluate the query over `docs`.
    ///
    /// Ties keep the input order.
    pub fn apply<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut result: Vec<Document> = docs
            .into_iter()
            .filter(|doc| self.matches(doc))
            .cloned()
            .collect();

        if let Some(order) = &self.order {
            result.sort_by(|a, b| {
                let ordering = match (a.field(&order.field), b.field(&order.field)) {
                    (Some(a), Some(b)) => compare(a, b).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            result.truncate(limit);
        }
        result
    }
}

/// Compare two JSON values of the same scalar type.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
