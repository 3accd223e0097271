//! Wikipedia summary and cross-language link lookup
//!
//! Wraps the REST summary endpoint plus a langlinks query. The returned
//! summary is condensed to its first two sentences and ASCII-folded so it
//! can be dropped straight into CSV cells and JSON-LD descriptions.
//!
//! Clients are stateless per call, so one instance can be shared
//! process-wide across sessions.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use esk_core::text::{ascii_fold, collapse_double_spaces};
use esk_core::{EskError, Language, Result, WikiPage, WikipediaLookup};

/// Wikipedia API client
pub struct WikipediaClient {
    client: reqwest::Client,
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn page_summary(&self, title: &str, lang: Language) -> Result<(String, String)> {
        let base = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/",
            lang.wiki_subdomain()
        );
        let mut url = url::Url::parse(&base)
            .map_err(|e| EskError::Other(anyhow::anyhow!("bad wikipedia base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| EskError::Other(anyhow::anyhow!("wikipedia url cannot be a base")))?
            .pop_if_empty()
            .push(&title.replace(' ', "_"));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EskError::LookupMiss(format!("{title}: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EskError::LookupMiss(format!("no page for {title}")));
        }
        if !response.status().is_success() {
            return Err(EskError::LookupMiss(format!(
                "{title}: status {}",
                response.status()
            )));
        }

        let summary: SummaryResponse = response
            .json()
            .await
            .map_err(|e| EskError::LookupMiss(format!("{title}: {e}")))?;

        let page_url = summary
            .content_urls
            .map(|urls| urls.desktop.page)
            .ok_or_else(|| EskError::LookupMiss(format!("no canonical url for {title}")))?;

        Ok((summary.extract, page_url))
    }

    /// Resolve the article URL in the other language edition, if any.
    ///
    /// Failures degrade to `None`; a missing cross-language link is not an
    /// error condition.
    async fn cross_language_link(
        &self,
        title: &str,
        lang: Language,
        target: Language,
    ) -> Option<String> {
        let url = format!(
            "https://{}.wikipedia.org/w/api.php",
            lang.wiki_subdomain()
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "query"),
                ("prop", "langlinks"),
                ("titles", title),
                ("lllang", target.wiki_subdomain()),
                ("llprop", "url"),
                ("redirects", "1"),
                ("format", "json"),
            ])
            .send()
            .await
            .ok()?;

        let parsed: LanglinksResponse = response.json().await.ok()?;
        let link = parsed
            .query?
            .pages
            .into_values()
            .find_map(|page| page.langlinks.into_iter().next())?
            .url;
        if link.is_none() {
            debug!(title, "no cross-language link");
        }
        link
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl WikipediaLookup for WikipediaClient {
    async fn lookup(&self, title: &str, lang: Language) -> Result<WikiPage> {
        let (extract, page_url) = self.page_summary(title, lang).await?;
        let summary = condense_summary(&extract);

        // The page's own URL fills its language slot; the other language
        // slot comes from a langlinks query and may be absent.
        let (english_link, italian_link) = match lang {
            Language::Italian => (
                self.cross_language_link(title, lang, Language::English)
                    .await,
                Some(page_url),
            ),
            Language::English => (
                Some(page_url),
                self.cross_language_link(title, lang, Language::Italian)
                    .await,
            ),
        };

        Ok(WikiPage {
            summary,
            english_link,
            italian_link,
        })
    }
}

/// Condense an article extract into a short, CSV-safe description.
///
/// Keeps the first two sentences, strips newlines and commas, collapses
/// doubled spaces, and folds accents to ASCII.
pub fn condense_summary(extract: &str) -> String {
    let two_sentences = extract
        .split('.')
        .take(2)
        .collect::<Vec<_>>()
        .join(". ");
    let cleaned = two_sentences.replace('\n', " ").replace(',', " ");
    ascii_fold(&collapse_double_spaces(&cleaned))
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: String,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: DesktopUrls,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
    page: String,
}

#[derive(Debug, Deserialize)]
struct LanglinksResponse {
    #[serde(default)]
    query: Option<LanglinksQuery>,
}

#[derive(Debug, Deserialize)]
struct LanglinksQuery {
    #[serde(default)]
    pages: HashMap<String, LanglinksPage>,
}

#[derive(Debug, Deserialize)]
struct LanglinksPage {
    #[serde(default)]
    langlinks: Vec<Langlink>,
}

#[derive(Debug, Deserialize)]
struct Langlink {
    #[serde(default)]
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condense_keeps_two_sentences() {
        let extract = "First sentence. Second sentence. Third sentence.";
        assert_eq!(condense_summary(extract), "First sentence. Second sentence");
    }

    #[test]
    fn test_condense_strips_newlines_and_commas() {
        let extract = "Rust is fast,\nsafe and productive. It has no garbage collector.";
        assert_eq!(
            condense_summary(extract),
            "Rust is fast safe and productive. It has no garbage collector"
        );
    }

    #[test]
    fn test_condense_folds_accents() {
        let extract = "La Società è già nota. Fondata nel 1900.";
        assert_eq!(
            condense_summary(extract),
            "La Societa e gia nota. Fondata nel 1900"
        );
    }

    #[test]
    fn test_condense_short_extract() {
        assert_eq!(condense_summary("Just one sentence"), "Just one sentence");
        assert_eq!(condense_summary(""), "");
    }

    #[test]
    fn test_langlinks_parse() {
        let json = r#"{
            "query": {
                "pages": {
                    "736": {
                        "langlinks": [
                            {"lang": "it", "url": "https://it.wikipedia.org/wiki/Roma"}
                        ]
                    }
                }
            }
        }"#;
        let parsed: LanglinksResponse = serde_json::from_str(json).unwrap();
        let link = parsed
            .query
            .unwrap()
            .pages
            .into_values()
            .find_map(|p| p.langlinks.into_iter().next())
            .and_then(|l| l.url);
        assert_eq!(link.as_deref(), Some("https://it.wikipedia.org/wiki/Roma"));
    }
}
