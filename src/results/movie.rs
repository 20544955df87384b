//! Movie record returned to callers

use crate::query::SCORE_FIELD;
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

/// A movie as returned by the API.
///
/// The store-native `_id` is always rendered as a plain string; the remaining
/// projected fields are passed through as relaxed JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Relevance score, present on search results only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl MovieRecord {
    /// Convert a store document into a record
    pub fn from_document(mut document: Document) -> Self {
        let id = document.remove("_id").map(id_to_string).unwrap_or_default();
        let score = document.remove(SCORE_FIELD).and_then(|score| match score {
            Bson::Double(v) => Some(v),
            Bson::Int32(v) => Some(f64::from(v)),
            Bson::Int64(v) => Some(v as f64),
            _ => None,
        });

        let fields = document
            .into_iter()
            .map(|(key, value)| (key, value.into_relaxed_extjson()))
            .collect();

        Self { id, fields, score }
    }

    /// Title as stored, if present
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }
}

/// Render a store identifier as a plain string
pub fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => match other.into_relaxed_extjson() {
            Value::String(s) => s,
            value => value.to_string(),
        },
    }
}
