//! Domain types shared across the ingester, searcher, and gateway.

use serde::{Deserialize, Serialize};

/// A single comic as persisted in storage: the full record, including body
/// text, owned by the ingester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub alt: String,
    pub transcript: String,
    pub safe_title: String,
    /// Stemmed keyword set produced by the normalizer. Always present
    /// (possibly empty), never null in persisted form.
    pub words: Vec<String>,
}

impl Comic {
    /// The exact concatenation fed to the normalizer: `alt + " " + title + " " + transcript`.
    pub fn normalization_input(&self) -> String {
        format!("{} {} {}", self.alt, self.title, self.transcript)
    }
}

/// The subset of a [`Comic`] returned by both search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComicRef {
    pub id: i64,
    pub url: String,
}

/// Result of either the database-backed `Search` or the in-memory `ISearch`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub comics: Vec<ComicRef>,
    pub total: i64,
}

/// Two-valued run-state of the ingestion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running => write!(f, "running"),
        }
    }
}

/// Aggregate counters returned by the ingester's `Stats` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
    pub comics_total: i64,
}

/// The single administrator credential, provisioned from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub name: String,
    pub password: String,
}

/// Metadata fetched from the remote corpus for a single comic id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteComicInfo {
    #[serde(rename = "num")]
    pub id: i64,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub safe_title: String,
}
