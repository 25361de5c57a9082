//! Query description and search option types.
//!
//! Callers describe what to search with a `QueryDescription` and how to
//! search with `SearchOptions`. Translation into the engine's request
//! shape happens in the engine crate.

use serde_json::{Map, Value};

/// Engine-agnostic description of what to search for.
///
/// Exactly one variant is active per query. `Raw` is an escape hatch: the
/// body is sent to the engine as-is and no filters, sort, or pagination
/// are layered on top.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryDescription {
    /// Free-text search against the default query-string field.
    FreeText(String),
    /// Disjunctive multi-field search: one match per field, at least one
    /// must hit.
    FieldMatch(Map<String, Value>),
    /// Engine-native request body, passed through verbatim.
    Raw(Value),
}

impl QueryDescription {
    /// Free-text query.
    pub fn free_text(text: impl Into<String>) -> Self {
        Self::FreeText(text.into())
    }

    /// Field-match query from (field, value) pairs.
    pub fn field_match<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::FieldMatch(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Raw engine-native body.
    pub fn raw(body: Value) -> Self {
        Self::Raw(body)
    }
}

/// A single filter constraint merged into the translated query.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterClause {
    /// Field must match one of the given values.
    Terms { field: String, values: Vec<Value> },
    /// Raw query-string payload (from the reserved `"query"` constraint key).
    QueryString(Value),
    /// Field must match the value as a phrase.
    Phrase { field: String, value: Value },
}

impl FilterClause {
    /// Build filters from a flat constraint map.
    ///
    /// The key `"query"` is reserved and always produces `QueryString`;
    /// array values produce `Terms`; scalar values produce `Phrase`.
    /// Input order is preserved.
    pub fn from_constraints<I, K>(constraints: I) -> Vec<FilterClause>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        constraints
            .into_iter()
            .map(|(key, value)| {
                let field = key.into();
                if field == "query" {
                    FilterClause::QueryString(value)
                } else if let Value::Array(values) = value {
                    FilterClause::Terms { field, values }
                } else {
                    FilterClause::Phrase { field, value }
                }
            })
            .collect()
    }
}

/// Sort direction for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire representation of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One entry of the caller-ordered sort sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SortClause {
    pub field: String,
    pub order: SortOrder,
}

/// How a query executes: target index, filters, sort, and pagination.
///
/// `from` and `size` map to the engine's skip-count and page-size fields;
/// both are omitted from the request when unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Target index name.
    pub index: String,
    /// Filters merged into the translated query, in order.
    pub filters: Vec<FilterClause>,
    /// Sort directives in caller order; empty means engine relevance order.
    pub sort: Vec<SortClause>,
    /// Number of leading hits to skip.
    pub from: Option<u64>,
    /// Maximum number of hits to return.
    pub size: Option<u64>,
}

impl SearchOptions {
    /// Options targeting the given index, with no filters, sort, or
    /// pagination.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Self::default()
        }
    }

    /// Replace the filter sequence.
    pub fn with_filters(mut self, filters: Vec<FilterClause>) -> Self {
        self.filters = filters;
        self
    }

    /// Append one sort directive.
    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort.push(SortClause {
            field: field.into(),
            order,
        });
        self
    }

    /// Skip the given number of leading hits.
    pub fn with_offset(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Cap the number of returned hits.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}
