use async_trait::async_trait;
use serde_json::{Map, Value};

use super::manager::DatabaseError;

/// The four named document collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    TeamMembers,
    Projects,
    Forms,
    ClientRequests,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::TeamMembers,
        Collection::Projects,
        Collection::Forms,
        Collection::ClientRequests,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::TeamMembers => "team_members",
            Collection::Projects => "projects",
            Collection::Forms => "forms",
            Collection::ClientRequests => "client_requests",
        }
    }
}

/// Containment filter over documents: a document matches when every key in
/// the filter is present with a matching value. Array values in the filter
/// match when each element is found in the document's array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    fields: Map<String, Value>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Require the array `field` to contain `value`
    pub fn contains(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields
            .insert(field.to_string(), Value::Array(vec![value.into()]));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, document: &Value) -> bool {
        json_contains(document, &self.to_value())
    }
}

/// JSON containment with the same semantics as Postgres `jsonb @> jsonb`
pub(crate) fn json_contains(haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::Object(h), Value::Object(n)) => n
            .iter()
            .all(|(key, nv)| h.get(key).map_or(false, |hv| json_contains(hv, nv))),
        (Value::Array(h), Value::Array(n)) => n
            .iter()
            .all(|nv| h.iter().any(|hv| json_contains(hv, nv))),
        // A scalar needle is contained in an array holding it
        (Value::Array(h), scalar) if !scalar.is_object() => h.iter().any(|hv| hv == scalar),
        (h, n) => h == n,
    }
}

/// Document storage keyed by application-generated string identifiers.
/// Listing returns the newest documents first.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: &DocumentFilter) -> Result<Vec<Value>, DatabaseError>;

    async fn find_one(&self, collection: Collection, id: &str) -> Result<Option<Value>, DatabaseError>;

    async fn insert(&self, collection: Collection, id: &str, document: Value) -> Result<(), DatabaseError>;

    /// Replace the whole document. Returns false when no document has `id`.
    async fn replace(&self, collection: Collection, id: &str, document: Value) -> Result<bool, DatabaseError>;

    /// Returns false when no document has `id`
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, DatabaseError>;

    async fn delete_many(&self, collection: Collection, filter: &DocumentFilter) -> Result<u64, DatabaseError>;

    /// Create collections and indexes if they do not exist
    async fn ensure_collections(&self) -> Result<(), DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
