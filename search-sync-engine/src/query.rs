//! Query translation.
//!
//! Converts an engine-agnostic `QueryDescription` plus `SearchOptions`
//! into the engine's request body. Pure transformation; no network
//! access.

use serde_json::{Map, Value};

use crate::errors::EngineError;
use search_sync_shared::{FilterClause, QueryDescription, SearchOptions, SortClause};

/// Marker key a raw body may carry; stripped before transmission.
const RAW_BODY_MARKER: &str = "_customize_body";

/// Typed request-body builder.
///
/// Collects bool-query clauses, sort directives, and pagination and
/// serializes to the engine's wire shape only at the boundary.
#[derive(Debug, Default)]
pub struct SearchBody {
    must: Vec<Value>,
    should: Vec<Value>,
    minimum_should_match: Option<u32>,
    sort: Vec<Value>,
    from: Option<u64>,
    size: Option<u64>,
}

impl SearchBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause every hit has to satisfy.
    pub fn push_must(&mut self, clause: Value) {
        self.must.push(clause);
    }

    /// Append a disjunctive clause.
    pub fn push_should(&mut self, clause: Value) {
        self.should.push(clause);
    }

    /// Require at least `n` should clauses to match.
    pub fn set_minimum_should_match(&mut self, n: u32) {
        self.minimum_should_match = Some(n);
    }

    /// Replace the ordered sort directives.
    pub fn set_sort(&mut self, sort: Vec<Value>) {
        self.sort = sort;
    }

    /// Set skip-count and page-size; `None` leaves the field out.
    pub fn set_pagination(&mut self, from: Option<u64>, size: Option<u64>) {
        self.from = from;
        self.size = size;
    }

    /// Serialize to the engine's wire shape.
    pub fn into_value(self) -> Value {
        let mut bool_query = Map::new();
        if !self.must.is_empty() {
            bool_query.insert("must".to_string(), Value::Array(self.must));
        }
        if !self.should.is_empty() {
            bool_query.insert("should".to_string(), Value::Array(self.should));
        }
        if let Some(n) = self.minimum_should_match {
            bool_query.insert("minimum_should_match".to_string(), Value::from(n));
        }

        let mut query = Map::new();
        query.insert("bool".to_string(), Value::Object(bool_query));

        let mut body = Map::new();
        body.insert("query".to_string(), Value::Object(query));
        if !self.sort.is_empty() {
            body.insert("sort".to_string(), Value::Array(self.sort));
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), Value::from(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), Value::from(size));
        }

        Value::Object(body)
    }
}

/// Translate a query description and options into a request body.
///
/// `Raw` bodies are authoritative: the marker field is stripped and no
/// filters, sort, or pagination are layered on. For the other variants,
/// filters are merged into the must array, sort directives keep caller
/// order, and pagination is emitted only when requested.
pub fn translate(
    query: &QueryDescription,
    options: &SearchOptions,
) -> Result<Value, EngineError> {
    let mut body = SearchBody::new();

    match query {
        QueryDescription::Raw(raw) => {
            let mut raw = raw.clone();
            if let Some(object) = raw.as_object_mut() {
                object.remove(RAW_BODY_MARKER);
            }
            return Ok(raw);
        }
        QueryDescription::FreeText(text) => {
            body.push_must(single_entry(
                "query_string",
                single_entry("query", Value::String(format!("*{}*", text))),
            ));
        }
        QueryDescription::FieldMatch(fields) => {
            if fields.is_empty() {
                return Err(EngineError::invalid_query(
                    "field match requires at least one field",
                ));
            }
            for (field, value) in fields {
                body.push_should(single_entry("match", single_entry(field, value.clone())));
            }
            body.set_minimum_should_match(1);
        }
    }

    for filter in &options.filters {
        body.push_must(filter_clause(filter));
    }

    if !options.sort.is_empty() {
        body.set_sort(sort_directives(&options.sort));
    }

    body.set_pagination(options.from, options.size);

    Ok(body.into_value())
}

/// Wire form of a single filter.
fn filter_clause(filter: &FilterClause) -> Value {
    match filter {
        FilterClause::Terms { field, values } => single_entry(
            "terms",
            single_entry(field, Value::Array(values.clone())),
        ),
        FilterClause::QueryString(value) => single_entry("query_string", value.clone()),
        FilterClause::Phrase { field, value } => {
            single_entry("match_phrase", single_entry(field, value.clone()))
        }
    }
}

/// Ordered single-field sort directives.
fn sort_directives(sort: &[SortClause]) -> Vec<Value> {
    sort.iter()
        .map(|clause| {
            single_entry(
                &clause.field,
                Value::String(clause.order.as_str().to_string()),
            )
        })
        .collect()
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}
