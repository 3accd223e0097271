//! Google Natural Language API client and wire types
//!
//! The v1 REST API reports entity types as enum names while the gRPC
//! surface uses numeric codes; the wire type here tolerates both and
//! stores the numeric code. The code-to-name table is kept as pure data
//! so the normalizer can branch on it without logic of its own.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use esk_core::{AppConfig, EskError, FetchConfig, Result};

use crate::{fetch::fetch_page, EntityProvider, ProviderResponse};

const GOOGLE_NLP_ENDPOINT: &str =
    "https://language.googleapis.com/v1/documents:analyzeEntities";

/// Numeric entity type codes as the Language API defines them.
///
/// Code 8 is unassigned in the public enum.
pub const GOOGLE_TYPE_NAMES: &[(i32, &str)] = &[
    (0, "UNKNOWN"),
    (1, "PERSON"),
    (2, "LOCATION"),
    (3, "ORGANIZATION"),
    (4, "EVENT"),
    (5, "WORK_OF_ART"),
    (6, "CONSUMER_GOOD"),
    (7, "OTHER"),
    (9, "PHONE_NUMBER"),
    (10, "ADDRESS"),
    (11, "DATE"),
    (12, "NUMBER"),
    (13, "PRICE"),
];

/// Resolve a numeric type code to its enum name.
pub fn google_type_name(code: i32) -> Option<&'static str> {
    GOOGLE_TYPE_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

fn google_type_code(name: &str) -> Option<i32> {
    GOOGLE_TYPE_NAMES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(c, _)| *c)
}

// ============================================================================
// Wire Types
// ============================================================================

/// Response of `documents:analyzeEntities`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleEntitiesResponse {
    #[serde(default)]
    pub entities: Vec<GoogleEntity>,

    /// Detected language, ISO 639-1 ("en", "it", ...)
    #[serde(default)]
    pub language: String,
}

/// A single entity as the Language API reports it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleEntity {
    #[serde(default)]
    pub name: String,

    /// Numeric entity type code; the REST wire value may be a string name
    #[serde(rename = "type", default, deserialize_with = "type_code_from_wire")]
    pub type_code: i32,

    #[serde(default)]
    pub salience: f64,

    /// Extra identifiers, e.g. "mid" and "wikipedia_url"
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl GoogleEntity {
    /// Knowledge Graph search URL for this entity's mid, if present.
    pub fn knowledge_graph_url(&self) -> Option<String> {
        self.metadata
            .get("mid")
            .map(|mid| format!("https://www.google.com/search?kgmid={mid}"))
    }
}

fn type_code_from_wire<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Code(i32),
        Name(String),
    }

    match Wire::deserialize(deserializer)? {
        Wire::Code(code) => Ok(code),
        // Unmapped names collapse to UNKNOWN rather than failing the batch
        Wire::Name(name) => Ok(google_type_code(&name).unwrap_or(0)),
    }
}

// ============================================================================
// Client
// ============================================================================

/// Google Natural Language API client
pub struct GoogleNlpClient {
    client: reqwest::Client,
    api_key: String,
    fetch: FetchConfig,
}

#[derive(serde::Serialize)]
struct AnalyzeRequest<'a> {
    document: Document<'a>,
    #[serde(rename = "encodingType")]
    encoding_type: &'static str,
}

#[derive(serde::Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    doc_type: &'static str,
    content: &'a str,
}

impl GoogleNlpClient {
    /// Create a new client with an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            fetch: FetchConfig::default(),
        }
    }

    /// Create from config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config
            .google_api_key
            .as_ref()
            .ok_or_else(|| EskError::Auth("Google NLP API key required".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.clone(),
            fetch: config.fetch.clone(),
        })
    }

    async fn analyze_document(
        &self,
        content: &str,
        doc_type: &'static str,
    ) -> Result<GoogleEntitiesResponse> {
        let request = AnalyzeRequest {
            document: Document { doc_type, content },
            encoding_type: "UTF8",
        };

        let response = self
            .client
            .post(format!("{GOOGLE_NLP_ENDPOINT}?key={}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| EskError::Provider(format!("Google NLP request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(EskError::Auth(
                "Google NLP rejected the API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EskError::Provider(format!("Google NLP error: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| EskError::Provider(format!("Failed to parse Google NLP response: {e}")))
    }
}

#[async_trait::async_trait]
impl EntityProvider for GoogleNlpClient {
    async fn analyze(&self, text: &str, is_url: bool) -> Result<ProviderResponse> {
        if is_url {
            let body = fetch_page(
                &self.client,
                text,
                self.fetch.timeout_secs,
                &self.fetch.user_agent,
            )
            .await;
            match body {
                Some(html) => {
                    let response = self.analyze_document(&html, "HTML").await?;
                    Ok(ProviderResponse::Google(response))
                }
                None => {
                    // No content is not fatal; the pipeline proceeds with an
                    // empty table instead of crashing.
                    warn!(url = text, "no content fetched, returning empty analysis");
                    Ok(ProviderResponse::Google(GoogleEntitiesResponse::default()))
                }
            }
        } else {
            let response = self.analyze_document(text, "PLAIN_TEXT").await?;
            Ok(ProviderResponse::Google(response))
        }
    }

    fn name(&self) -> &str {
        "google_nlp"
    }
}
