//! ESK Providers - NLP provider clients and web collaborators
//!
//! Implements the external collaborators the analysis pipeline consumes:
//! - TextRazor and Google Natural Language API clients behind a common
//!   [`EntityProvider`] trait
//! - A Wikipedia summary/link lookup client
//! - A bounded-timeout page fetcher that never raises

use esk_core::{Language, Result};

pub mod fetch;
pub mod google;
pub mod textrazor;
pub mod wikipedia;

pub use fetch::fetch_page;
pub use google::{GoogleEntitiesResponse, GoogleEntity, GoogleNlpClient};
pub use textrazor::{TextRazorClient, TextRazorEntity, TextRazorResponse};
pub use wikipedia::WikipediaClient;

/// A raw provider analysis response, consumed by the normalizers.
#[derive(Debug, Clone)]
pub enum ProviderResponse {
    TextRazor(TextRazorResponse),
    Google(GoogleEntitiesResponse),
}

impl ProviderResponse {
    /// The language the provider detected for the analyzed document.
    pub fn language(&self) -> Language {
        match self {
            Self::TextRazor(r) => Language::from_code(&r.language),
            Self::Google(r) => Language::from_code(&r.language),
        }
    }

    /// Number of raw entities in the response.
    pub fn entity_count(&self) -> usize {
        match self {
            Self::TextRazor(r) => r.entities.len(),
            Self::Google(r) => r.entities.len(),
        }
    }

    /// The text the frequency annotator should count against.
    ///
    /// TextRazor echoes back its cleaned source text; Google does not, so
    /// the caller's submitted text is used instead.
    pub fn analyzed_text<'a>(&'a self, submitted: &'a str) -> &'a str {
        match self {
            Self::TextRazor(r) => r.cleaned_text.as_deref().unwrap_or(submitted),
            Self::Google(_) => submitted,
        }
    }
}

/// Trait for NLP entity extraction providers.
#[async_trait::async_trait]
pub trait EntityProvider: Send + Sync {
    /// Analyze a text or a URL and return the raw provider response.
    ///
    /// Fails with [`esk_core::EskError::Auth`] on a bad credential, which
    /// halts the whole pipeline before any entity processing.
    async fn analyze(&self, text: &str, is_url: bool) -> Result<ProviderResponse>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Check whether a piece of input text is a well-formed http(s) URL.
pub fn is_url(text: &str) -> bool {
    match url::Url::parse(text.trim()) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/page"));
        assert!(is_url("  http://example.com  "));
        assert!(!is_url("just some text"));
        assert!(!is_url("ftp://example.com/file"));
        assert!(!is_url("example.com"));
    }

    #[test]
    fn test_response_language() {
        let response = ProviderResponse::TextRazor(TextRazorResponse {
            language: "ita".to_string(),
            ..Default::default()
        });
        assert_eq!(response.language(), Language::Italian);

        let response = ProviderResponse::Google(GoogleEntitiesResponse {
            language: "en".to_string(),
            ..Default::default()
        });
        assert_eq!(response.language(), Language::English);
    }

    #[test]
    fn test_analyzed_text_prefers_cleaned() {
        let response = ProviderResponse::TextRazor(TextRazorResponse {
            cleaned_text: Some("cleaned".to_string()),
            ..Default::default()
        });
        assert_eq!(response.analyzed_text("submitted"), "cleaned");

        let response = ProviderResponse::Google(GoogleEntitiesResponse::default());
        assert_eq!(response.analyzed_text("submitted"), "submitted");
    }
}
