//! Query grammar shared by live subscriptions and one-shot reads
//!
//! A query is a collection, a conjunction of field filters, an optional sort
//! on one field (ties broken by document id), an optional exclusive start
//! cursor and an optional limit. Documents missing the sort field never match
//! a sorted query.

use std::cmp::Ordering;

use serde_json::Value;

use super::Document;

static NULL: Value = Value::Null;

/// Sort direction of an ordered query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Field equals the value
    Eq(Value),
    /// Field equals one of the values
    In(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub op: FilterOp,
}

impl FieldFilter {
    fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = doc.data.get(&self.field) else {
            return false;
        };
        match &self.op {
            FilterOp::Eq(expected) => values_equal(actual, expected),
            FilterOp::In(candidates) => candidates.iter().any(|c| values_equal(actual, c)),
        }
    }
}

/// A conjunction of field filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Vec<FieldFilter>);

impl Filter {
    /// Matches every document
    pub fn none() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push(FieldFilter {
            field: field.into(),
            op: FilterOp::Eq(value.into()),
        });
        self
    }

    pub fn any_of(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.0.push(FieldFilter {
            field: field.into(),
            op: FilterOp::In(values),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldFilter> {
        self.0.iter()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.0.iter().all(|f| f.matches(doc))
    }
}

/// Position of a document inside an ordered result
///
/// Only meaningful for queries sorted on the field it was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    id: String,
    key: Value,
}

impl Cursor {
    pub(crate) fn new(id: impl Into<String>, key: Value) -> Self {
        Self { id: id.into(), key }
    }

    /// Document the cursor points at
    pub fn document_id(&self) -> &str {
        &self.id
    }
}

/// Composite index a query needs: collection, filtered fields, sort field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub collection: String,
    pub fields: Vec<String>,
    pub order_by: String,
}

impl IndexKey {
    pub fn new(collection: &str, fields: &[&str], order_by: &str) -> Self {
        let mut fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        fields.sort();
        fields.dedup();
        Self {
            collection: collection.to_string(),
            fields,
            order_by: order_by.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Filter,
    pub order_by: Option<OrderBy>,
    pub start_after: Option<Cursor>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filter: Filter::none(),
            order_by: None,
            start_after: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = self.filter.eq(field, value);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn start_after(mut self, cursor: Cursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Index required by a backend that only serves filtered + sorted scans
    /// from composite indexes
    pub fn required_index(&self) -> Option<IndexKey> {
        let order = self.order_by.as_ref()?;
        if self.filter.is_empty() {
            return None;
        }
        let fields: Vec<&str> = self.filter.fields().map(|f| f.field.as_str()).collect();
        Some(IndexKey::new(&self.collection, &fields, &order.field))
    }

    pub fn matches(&self, doc: &Document) -> bool {
        if !self.filter.matches(doc) {
            return false;
        }
        match &self.order_by {
            Some(order) => doc.data.contains_key(&order.field),
            None => true,
        }
    }

    /// Cursor for `doc` under this query's ordering
    pub fn cursor_for(&self, doc: &Document) -> Cursor {
        let key = self
            .order_by
            .as_ref()
            .and_then(|o| doc.data.get(&o.field).cloned())
            .unwrap_or(Value::Null);
        Cursor::new(doc.id.clone(), key)
    }

    fn compare_keys(&self, a_key: &Value, a_id: &str, b_key: &Value, b_id: &str) -> Ordering {
        let ordering = compare_values(a_key, b_key).then_with(|| a_id.cmp(b_id));
        match self.order_by.as_ref().map(|o| o.direction) {
            Some(SortDirection::Descending) => ordering.reverse(),
            _ => ordering,
        }
    }

    fn sort_key<'a>(&self, doc: &'a Document) -> &'a Value {
        self.order_by
            .as_ref()
            .and_then(|o| doc.data.get(&o.field))
            .unwrap_or(&NULL)
    }

    /// Run the query over a collection's documents
    pub fn execute<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut matched: Vec<&Document> = docs.into_iter().filter(|d| self.matches(d)).collect();
        matched.sort_by(|a, b| self.compare_keys(self.sort_key(a), &a.id, self.sort_key(b), &b.id));

        let after_cursor = |doc: &&Document| match &self.start_after {
            Some(cursor) => {
                self.compare_keys(self.sort_key(doc), &doc.id, &cursor.key, &cursor.id)
                    == Ordering::Greater
            }
            None => true,
        };

        matched
            .into_iter()
            .filter(after_cursor)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array < object
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(a, b) == Ordering::Equal,
        _ => a == b,
    }
}
