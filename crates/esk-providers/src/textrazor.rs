//! TextRazor API client and wire types

use serde::Deserialize;

use esk_core::{AppConfig, EskError, Result};

use crate::{EntityProvider, ProviderResponse};

const TEXTRAZOR_ENDPOINT: &str = "https://api.textrazor.com";

// ============================================================================
// Wire Types
// ============================================================================

/// Top-level TextRazor envelope
#[derive(Debug, Clone, Default, Deserialize)]
struct TextRazorEnvelope {
    #[serde(default = "default_ok")]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    response: TextRazorResponse,
}

fn default_ok() -> bool {
    true
}

/// The analysis payload of a TextRazor response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRazorResponse {
    /// Detected language, ISO 639-2 ("eng", "ita", ...)
    #[serde(default)]
    pub language: String,

    /// Source text after boilerplate cleanup
    #[serde(rename = "cleanedText", default)]
    pub cleaned_text: Option<String>,

    #[serde(default)]
    pub entities: Vec<TextRazorEntity>,

    #[serde(default)]
    pub topics: Vec<RawTopic>,

    #[serde(default)]
    pub categories: Vec<RawTopic>,
}

/// A single entity as TextRazor reports it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRazorEntity {
    /// Disambiguated entity identifier (the canonical surface form)
    #[serde(rename = "entityId", default)]
    pub entity_id: String,

    #[serde(rename = "confidenceScore", default)]
    pub confidence_score: f64,

    #[serde(rename = "relevanceScore", default)]
    pub relevance_score: f64,

    #[serde(rename = "wikidataId", default)]
    pub wikidata_id: Option<String>,

    #[serde(rename = "wikiLink", default)]
    pub wikipedia_link: Option<String>,

    /// DBpedia type URIs; the wire key is "type"
    #[serde(rename = "type", default)]
    pub dbpedia_types: Vec<String>,

    #[serde(rename = "freebaseTypes", default)]
    pub freebase_types: Vec<String>,
}

/// Topic or IPTC media-topic category with its score
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTopic {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub score: f64,
}

// ============================================================================
// Client
// ============================================================================

/// TextRazor API client
pub struct TextRazorClient {
    client: reqwest::Client,
    api_key: String,
}

impl TextRazorClient {
    /// Create a new client with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .textrazor_api_key
            .as_ref()
            .ok_or_else(|| EskError::Auth("TextRazor API key required".to_string()))?;
        Ok(Self::new(api_key))
    }
}

#[async_trait::async_trait]
impl EntityProvider for TextRazorClient {
    async fn analyze(&self, text: &str, is_url: bool) -> Result<ProviderResponse> {
        let input_field = if is_url { "url" } else { "text" };
        let form = [
            ("extractors", "entities,topics"),
            ("classifiers", "textrazor_mediatopics"),
            ("cleanup.returnCleaned", "true"),
            (input_field, text),
        ];

        let response = self
            .client
            .post(TEXTRAZOR_ENDPOINT)
            .header("x-textrazor-key", &self.api_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| EskError::Provider(format!("TextRazor request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(EskError::Auth(
                "TextRazor rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EskError::Provider(format!("TextRazor error: {body}")));
        }

        let envelope: TextRazorEnvelope = response
            .json()
            .await
            .map_err(|e| EskError::Provider(format!("Failed to parse TextRazor response: {e}")))?;

        if !envelope.ok {
            let message = envelope.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(EskError::Provider(format!("TextRazor error: {message}")));
        }

        Ok(ProviderResponse::TextRazor(envelope.response))
    }

    fn name(&self) -> &str {
        "textrazor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_response() {
        let json = r#"{
            "ok": true,
            "response": {
                "language": "eng",
                "cleanedText": "Rust is a systems language.",
                "entities": [
                    {
                        "entityId": "Rust (programming language)",
                        "confidenceScore": 4.2,
                        "relevanceScore": 0.9,
                        "wikidataId": "Q575650",
                        "wikiLink": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
                        "type": ["http://dbpedia.org/ontology/ProgrammingLanguage"],
                        "freebaseTypes": ["/computer/programming_language"]
                    }
                ],
                "topics": [{"label": "Software", "score": 0.99}],
                "categories": [{"label": "medtop>science and technology>technology", "score": 0.7}]
            }
        }"#;

        let envelope: TextRazorEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.ok);
        let response = envelope.response;
        assert_eq!(response.language, "eng");
        assert_eq!(response.entities.len(), 1);
        assert_eq!(response.entities[0].entity_id, "Rust (programming language)");
        assert_eq!(
            response.entities[0].dbpedia_types,
            vec!["http://dbpedia.org/ontology/ProgrammingLanguage"]
        );
        assert_eq!(response.topics[0].label, "Software");
    }

    #[test]
    fn test_deserialize_error_envelope() {
        let json = r#"{"ok": false, "error": "Your API key is invalid."}"#;
        let envelope: TextRazorEnvelope = serde_json::from_str(json).unwrap();
        assert!(!envelope.ok);
        assert_eq!(envelope.error.as_deref(), Some("Your API key is invalid."));
    }

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{"response": {"entities": [{"entityId": "X"}]}}"#;
        let envelope: TextRazorEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.ok);
        let entity = &envelope.response.entities[0];
        assert_eq!(entity.confidence_score, 0.0);
        assert!(entity.wikidata_id.is_none());
        assert!(entity.dbpedia_types.is_empty());
    }
}
