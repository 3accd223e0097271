//! ESK Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the entity
//! schema kit:
//! - The canonical entity table row produced by provider normalization
//! - External identifier bundle (Wikidata, Wikipedia, Knowledge Graph)
//! - Common error types with the fatal/degradable split
//! - The Wikipedia lookup collaborator trait
//! - Configuration management

pub mod config;
pub mod logging;
pub mod text;

pub use config::{AppConfig, ConfigError, FetchConfig, LoggingConfig, ProviderKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for analysis operations.
///
/// Only [`EskError::Auth`] and [`EskError::EmptyInput`] are fatal to an
/// analysis; every other variant degrades gracefully and is reported at
/// most as a log line.
#[derive(Error, Debug)]
pub enum EskError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("No text or URL supplied")]
    EmptyInput,

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Wikipedia lookup miss: {0}")]
    LookupMiss(String),

    #[error("Page fetch failed: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EskError {
    /// Whether this error must halt the whole analysis.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth(_) | Self::EmptyInput)
    }
}

pub type Result<T> = std::result::Result<T, EskError>;

// ============================================================================
// Language
// ============================================================================

/// Analysis language as detected by a provider.
///
/// Providers report different code shapes ("eng"/"ita" vs "en"/"it");
/// anything that is not Italian falls back to English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Italian,
}

impl Language {
    /// Map a provider language code onto a supported language.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "it" | "ita" => Self::Italian,
            _ => Self::English,
        }
    }

    /// Wikipedia subdomain for this language.
    pub fn wiki_subdomain(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Italian => "it",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wiki_subdomain())
    }
}

// ============================================================================
// Canonical Entity Table
// ============================================================================

/// External identifiers attached to a canonical entity.
///
/// Every field is optional; absent values are omitted from serialized
/// rows entirely (the key is absent, not empty).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(rename = "wikidataId", skip_serializing_if = "Option::is_none", default)]
    pub wikidata_id: Option<String>,

    #[serde(
        rename = "wikipediaLink",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub wikipedia_link: Option<String>,

    #[serde(
        rename = "englishWikipediaLink",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub english_wikipedia_link: Option<String>,

    #[serde(
        rename = "italianWikipediaLink",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub italian_wikipedia_link: Option<String>,

    #[serde(
        rename = "knowledgeGraphId",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub knowledge_graph_id: Option<String>,
}

/// The unifying table row produced by either provider normalizer.
///
/// `name` is unique within one canonical table (first occurrence wins,
/// case-sensitive exact match). The row is created by a normalizer and
/// later mutated in place by exactly two enrichment passes: frequency
/// annotation and confidence rescaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEntity {
    /// Entity surface form / identifier.
    pub name: String,

    /// Provider-specific type collapsed to a single label.
    pub category: String,

    /// Wikipedia summary; only present when full enrichment was requested.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(flatten)]
    pub external_ids: ExternalIds,

    /// Relevance (TextRazor) or salience (Google), 0..1.
    pub score: f64,

    /// Raw confidence score (TextRazor only), kept for later rescaling.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,

    /// Confidence rescaled against the column maximum, e.g. "87.65%".
    #[serde(
        rename = "confidencePercent",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub confidence_percent: Option<String>,

    /// In-text occurrence count, attached post-hoc.
    #[serde(default)]
    pub frequency: u64,
}

impl CanonicalEntity {
    /// Create a new entity row with the mandatory columns.
    pub fn new(name: impl Into<String>, category: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: None,
            external_ids: ExternalIds::default(),
            score,
            confidence: None,
            confidence_percent: None,
            frequency: 0,
        }
    }

    /// Set the raw confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the external identifier bundle.
    pub fn with_external_ids(mut self, ids: ExternalIds) -> Self {
        self.external_ids = ids;
        self
    }

    /// Format the relevance/salience score as a 2-decimal percentage.
    pub fn score_percent(&self) -> String {
        format!("{:.2}%", self.score * 100.0)
    }
}

/// A topic or category label with its score (TextRazor only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub label: String,
    pub score: f64,
}

// ============================================================================
// Wikipedia Lookup Collaborator
// ============================================================================

/// Result of a Wikipedia page lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WikiPage {
    /// Condensed article summary.
    pub summary: String,

    /// English article URL, when resolvable.
    pub english_link: Option<String>,

    /// Italian article URL, when resolvable.
    pub italian_link: Option<String>,
}

/// Trait for the Wikipedia summary/link collaborator.
///
/// A miss is reported as [`EskError::LookupMiss`]; callers must treat it
/// as non-fatal and degrade that entity's enrichment fields to empty.
#[async_trait::async_trait]
pub trait WikipediaLookup: Send + Sync {
    /// Look up the article titled `title` in the given language edition.
    async fn lookup(&self, title: &str, lang: Language) -> Result<WikiPage>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code("it"), Language::Italian);
        assert_eq!(Language::from_code("ita"), Language::Italian);
        assert_eq!(Language::from_code("en"), Language::English);
        assert_eq!(Language::from_code("eng"), Language::English);
        assert_eq!(Language::from_code("de"), Language::English);
        assert_eq!(Language::from_code(""), Language::English);
    }

    #[test]
    fn test_score_percent_format() {
        let entity = CanonicalEntity::new("Rust", "thing", 0.8765);
        assert_eq!(entity.score_percent(), "87.65%");
    }

    #[test]
    fn test_fatal_errors() {
        assert!(EskError::Auth("bad key".into()).is_fatal());
        assert!(EskError::EmptyInput.is_fatal());
        assert!(!EskError::LookupMiss("page".into()).is_fatal());
        assert!(!EskError::Fetch("timeout".into()).is_fatal());
    }

    #[test]
    fn test_absent_keys_are_omitted() {
        let entity = CanonicalEntity::new("SEO", "thing", 0.5);
        let json = serde_json::to_value(&entity).unwrap();
        let obj = json.as_object().unwrap();

        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("englishWikipediaLink"));
        assert!(!obj.contains_key("wikidataId"));
        assert_eq!(obj.get("name"), Some(&serde_json::json!("SEO")));
    }

    #[test]
    fn test_present_keys_are_serialized() {
        let mut entity = CanonicalEntity::new("Rust", "ProgrammingLanguage", 0.9);
        entity.external_ids.wikidata_id = Some("Q575650".to_string());
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["wikidataId"], "Q575650");
    }
}
