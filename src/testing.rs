//! In-memory stand-ins for the secret store and MongoDB, for tests

use crate::config::Settings;
use crate::query::{MOVIE_FIELDS, SCORE_FIELD};
use crate::secrets::{SecretError, SecretResolver};
use crate::store::{MovieStore, StoreConnector, StoreError};
use crate::web::AppState;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use regex::RegexBuilder;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Movie collection held in memory.
///
/// Search scores each movie by how many query words appear in its title,
/// plot and genres; that is enough to exercise ordering and limits.
pub struct MemoryStore {
    movies: Vec<Document>,
    pub calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new(movies: Vec<Document>) -> Self {
        Self {
            movies,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn project(movie: &Document, projection: &Document) -> Document {
        let mut out = Document::new();
        if let Some(id) = movie.get("_id") {
            out.insert("_id", id.clone());
        }
        for (key, _) in projection {
            if let Some(value) = movie.get(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        out
    }

    fn relevance(movie: &Document, query: &str) -> f64 {
        let mut haystack = String::new();
        for field in ["title", "plot"] {
            if let Ok(text) = movie.get_str(field) {
                haystack.push_str(&text.to_lowercase());
                haystack.push(' ');
            }
        }
        if let Ok(genres) = movie.get_array("genres") {
            for genre in genres.iter().filter_map(Bson::as_str) {
                haystack.push_str(&genre.to_lowercase());
                haystack.push(' ');
            }
        }

        query
            .split_whitespace()
            .filter(|word| haystack.contains(&word.to_lowercase()))
            .count() as f64
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut query = String::new();
        let mut limit = usize::MAX;
        let mut projection = Document::new();
        for stage in &pipeline {
            if let Ok(search) = stage.get_document("$search") {
                query = search
                    .get_document("text")
                    .and_then(|t| t.get_str("query"))
                    .map_err(|e| StoreError::Query(e.to_string()))?
                    .to_string();
            }
            if let Ok(n) = stage.get_i64("$limit") {
                limit = n as usize;
            }
            if let Ok(p) = stage.get_document("$project") {
                projection = p.clone();
            }
        }

        let mut scored: Vec<(f64, &Document)> = self
            .movies
            .iter()
            .map(|m| (Self::relevance(m, &query), m))
            .filter(|(score, _)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(score, movie)| {
                let mut out = Self::project(movie, &projection);
                if projection.contains_key(SCORE_FIELD) {
                    out.insert(SCORE_FIELD, score);
                }
                out
            })
            .collect())
    }

    async fn find_one(
        &self,
        filter: Document,
        projection: Document,
    ) -> Result<Option<Document>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let pattern = filter
            .get_document("title")
            .and_then(|t| t.get_str("$regex"))
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(self
            .movies
            .iter()
            .find(|m| m.get_str("title").map(|t| re.is_match(t)).unwrap_or(false))
            .map(|m| Self::project(m, &projection)))
    }
}

/// Store whose every operation fails with the given error kind
pub struct FailingStore {
    pub connection: bool,
}

#[async_trait]
impl MovieStore for FailingStore {
    async fn aggregate(&self, _pipeline: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        Err(self.error())
    }

    async fn find_one(
        &self,
        _filter: Document,
        _projection: Document,
    ) -> Result<Option<Document>, StoreError> {
        Err(self.error())
    }
}

impl FailingStore {
    fn error(&self) -> StoreError {
        if self.connection {
            StoreError::Connection("connection reset".to_string())
        } else {
            StoreError::Query("$search index not found".to_string())
        }
    }
}

/// Resolver returning a fixed value, or a not-found error
pub struct StaticSecret {
    value: Option<String>,
    pub calls: AtomicUsize,
}

impl StaticSecret {
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretResolver for StaticSecret {
    fn name(&self) -> &str {
        "static"
    }

    async fn resolve(&self, secret_name: &str) -> Result<String, SecretError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.value
            .clone()
            .ok_or_else(|| SecretError::NotFound(secret_name.to_string()))
    }
}

/// Connector that always hands out the same store
pub struct FixedConnector {
    store: Arc<dyn MovieStore>,
}

impl FixedConnector {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreConnector for FixedConnector {
    async fn connect(&self, _connection_string: &str) -> Result<Arc<dyn MovieStore>, StoreError> {
        Ok(self.store.clone())
    }
}

/// A handful of sample_mflix-shaped documents
pub fn sample_movies() -> Vec<Document> {
    let matrix_id = ObjectId::parse_str("573a1398f29313caabceb515").unwrap();
    vec![
        doc! {
            "_id": matrix_id,
            "title": "The Matrix",
            "year": 1999,
            "plot": "A computer hacker learns about the true nature of reality.",
            "genres": ["Action", "Sci-Fi"],
            "cast": ["Keanu Reeves", "Laurence Fishburne"],
            "directors": ["Lana Wachowski", "Lilly Wachowski"],
            "rated": "R",
            "runtime": 136,
            "imdb": { "rating": 8.7 },
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Space Cowboys",
            "year": 2000,
            "plot": "Veteran pilots head to space on an adventure to fix a satellite.",
            "genres": ["Action", "Adventure"],
            "rated": "PG-13",
            "runtime": 130,
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "2001: A Space Odyssey",
            "year": 1968,
            "plot": "A voyage to Jupiter with the sentient computer HAL.",
            "genres": ["Adventure", "Sci-Fi"],
            "runtime": 149,
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Treasure Planet",
            "year": 2002,
            "plot": "A space adventure retelling of Treasure Island.",
            "genres": ["Animation", "Adventure"],
            "runtime": 95,
        },
        doc! {
            "_id": ObjectId::new(),
            "title": "Heat",
            "year": 1995,
            "plot": "A group of professional bank robbers and a detective.",
            "genres": ["Crime", "Drama"],
            "runtime": 170,
        },
    ]
}

/// Application state backed by the given store and secret
pub fn state_with(store: Arc<dyn MovieStore>, secret: Arc<StaticSecret>) -> AppState {
    AppState::with_backends(
        Settings::default(),
        secret,
        Arc::new(FixedConnector::new(store)),
    )
}

/// Every field a search projection may return
pub fn projected_fields() -> Vec<&'static str> {
    let mut fields = vec!["_id"];
    fields.extend(MOVIE_FIELDS);
    fields.push(SCORE_FIELD);
    fields
}
