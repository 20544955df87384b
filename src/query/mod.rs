//! Query building module
//!
//! Turns validated requests into MongoDB documents:
//! - Atlas Search aggregation pipelines for free-text queries
//! - Case-insensitive title filters for exact-title lookups
//!
//! Everything here is pure; nothing touches the network.

use crate::config::TitleMatch;
use mongodb::bson::{doc, Document};

/// Movie fields returned by every query
pub const MOVIE_FIELDS: [&str; 8] = [
    "title",
    "year",
    "plot",
    "genres",
    "cast",
    "directors",
    "rated",
    "runtime",
];

/// Name of the relevance score field added to search results
pub const SCORE_FIELD: &str = "score";

/// Projection of the movie fields, without a score
pub fn title_projection() -> Document {
    let mut projection = Document::new();
    for field in MOVIE_FIELDS {
        projection.insert(field, 1);
    }
    projection
}

/// Projection of the movie fields plus the Atlas Search score
pub fn search_projection() -> Document {
    let mut projection = title_projection();
    projection.insert(SCORE_FIELD, doc! { "$meta": "searchScore" });
    projection
}

/// Build the full-text search pipeline.
///
/// Results come back in the index's relevance order; no sort stage is added.
pub fn build_search_pipeline(query: &str, limit: u32, index: &str) -> Vec<Document> {
    vec![
        doc! {
            "$search": {
                "index": index,
                "text": {
                    "query": query,
                    "path": { "wildcard": "*" }
                }
            }
        },
        doc! { "$limit": i64::from(limit) },
        doc! { "$project": search_projection() },
    ]
}

/// Build the case-insensitive title filter
pub fn build_title_filter(title: &str, mode: TitleMatch) -> Document {
    let pattern = match mode {
        TitleMatch::Literal => regex::escape(title),
        TitleMatch::Pattern => title.to_string(),
    };

    doc! {
        "title": {
            "$regex": pattern,
            "$options": "i"
        }
    }
}
