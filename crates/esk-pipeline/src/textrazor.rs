//! TextRazor response normalization
//!
//! Collapses TextRazor's DBpedia/Freebase type taxonomy into a single
//! category label and carries its Wikidata/Wikipedia identifiers into the
//! canonical row. Topics and IPTC media-topic categories are extracted
//! separately.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use esk_core::{CanonicalEntity, EskError, Language, Result, Topic, WikipediaLookup};
use esk_providers::{ProviderResponse, TextRazorEntity, TextRazorResponse};

use crate::normalize::{accepts_name, EntityNormalizer, Progress};

/// Normalizer for TextRazor responses
pub struct TextRazorNormalizer {
    lookup: Arc<dyn WikipediaLookup>,
}

impl TextRazorNormalizer {
    pub fn new(lookup: Arc<dyn WikipediaLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait::async_trait]
impl EntityNormalizer for TextRazorNormalizer {
    async fn normalize(
        &self,
        response: &ProviderResponse,
        enrich_fully: bool,
        language: Language,
    ) -> Result<Vec<CanonicalEntity>> {
        let ProviderResponse::TextRazor(response) = response else {
            return Err(EskError::Provider(
                "expected a TextRazor response".to_string(),
            ));
        };

        let mut progress = Progress::new(response.entities.len());
        let mut known: HashSet<&str> = HashSet::new();
        let mut rows = Vec::new();

        for entity in &response.entities {
            progress.tick();

            if known.contains(entity.entity_id.as_str())
                || entity.confidence_score <= 0.0
                || entity.relevance_score <= 0.0
                || !accepts_name(&entity.entity_id)
            {
                continue;
            }

            let mut row = CanonicalEntity::new(
                entity.entity_id.clone(),
                categorize(entity),
                entity.relevance_score,
            )
            .with_confidence(entity.confidence_score);
            row.external_ids.wikidata_id = entity.wikidata_id.clone();
            row.external_ids.wikipedia_link = entity.wikipedia_link.clone();

            if enrich_fully {
                match self.lookup.lookup(&entity.entity_id, language).await {
                    Ok(page) => {
                        row.description = Some(page.summary);
                        row.external_ids.english_wikipedia_link = page.english_link;
                    }
                    Err(e) => {
                        warn!(entity = %entity.entity_id, error = %e, "enrichment lookup failed");
                        row.description = Some(String::new());
                    }
                }
            }

            known.insert(entity.entity_id.as_str());
            rows.push(row);
        }

        Ok(rows)
    }
}

/// Collapse the entity's type taxonomy to a single category label.
///
/// Prefers the first DBpedia type, falls back to the first Freebase type,
/// and defaults to "thing"; the label is the last path segment.
fn categorize(entity: &TextRazorEntity) -> String {
    entity
        .dbpedia_types
        .first()
        .or_else(|| entity.freebase_types.first())
        .map(|t| last_segment(t, '/').to_string())
        .unwrap_or_else(|| "thing".to_string())
}

fn last_segment(path: &str, separator: char) -> &str {
    path.rsplit(separator).next().unwrap_or(path)
}

/// Extract topics from a TextRazor response.
pub fn topics(response: &TextRazorResponse) -> Vec<Topic> {
    response
        .topics
        .iter()
        .map(|t| Topic {
            label: t.label.clone(),
            score: t.score,
        })
        .collect()
}

/// Extract IPTC media-topic categories; labels keep only the last
/// taxonomy path segment ("medtop>arts>cinema" becomes "cinema").
pub fn categories(response: &TextRazorResponse) -> Vec<Topic> {
    response
        .categories
        .iter()
        .map(|c| Topic {
            label: last_segment(&c.label, '>').to_string(),
            score: c.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use esk_core::WikiPage;
    use esk_providers::textrazor::RawTopic;

    struct NullLookup;

    #[async_trait::async_trait]
    impl WikipediaLookup for NullLookup {
        async fn lookup(&self, title: &str, _lang: Language) -> Result<WikiPage> {
            Err(EskError::LookupMiss(title.to_string()))
        }
    }

    fn entity(id: &str, confidence: f64, relevance: f64) -> TextRazorEntity {
        TextRazorEntity {
            entity_id: id.to_string(),
            confidence_score: confidence,
            relevance_score: relevance,
            ..Default::default()
        }
    }

    fn response_with(entities: Vec<TextRazorEntity>) -> ProviderResponse {
        ProviderResponse::TextRazor(TextRazorResponse {
            language: "eng".to_string(),
            entities,
            ..Default::default()
        })
    }

    #[test]
    fn test_dbpedia_category_label() {
        let raw = TextRazorEntity {
            dbpedia_types: vec!["http://dbpedia.org/ontology/Person".to_string()],
            freebase_types: vec!["/people/person".to_string()],
            ..Default::default()
        };
        assert_eq!(categorize(&raw), "Person");
    }

    #[test]
    fn test_freebase_fallback_and_thing_default() {
        let raw = TextRazorEntity {
            freebase_types: vec!["/computer/programming_language".to_string()],
            ..Default::default()
        };
        assert_eq!(categorize(&raw), "programming_language");
        assert_eq!(categorize(&TextRazorEntity::default()), "thing");
    }

    #[test]
    fn test_category_taxonomy_last_segment() {
        let response = TextRazorResponse {
            categories: vec![RawTopic {
                label: "medtop>arts>cinema".to_string(),
                score: 0.8,
            }],
            ..Default::default()
        };
        let extracted = categories(&response);
        assert_eq!(extracted[0].label, "cinema");
        assert_eq!(extracted[0].score, 0.8);
    }

    #[tokio::test]
    async fn test_filters_and_dedup() {
        let normalizer = TextRazorNormalizer::new(Arc::new(NullLookup));
        let response = response_with(vec![
            entity("Rust", 2.0, 0.9),
            entity("Rust", 3.0, 0.8),  // duplicate
            entity("rust", 1.0, 0.5),  // different case, kept
            entity("2023", 1.0, 0.5),  // numeric
            entity("2023-05-17", 1.0, 0.5), // date
            entity("Zero", 0.0, 0.5),  // non-positive confidence
            entity("Irrelevant", 1.0, 0.0), // non-positive relevance
        ]);

        let rows = normalizer
            .normalize(&response, false, Language::English)
            .await
            .unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "rust"]);
        // first occurrence wins
        assert_eq!(rows[0].score, 0.9);
    }

    #[tokio::test]
    async fn test_no_enrichment_leaves_fields_absent() {
        let normalizer = TextRazorNormalizer::new(Arc::new(NullLookup));
        let response = response_with(vec![entity("Rust", 2.0, 0.9)]);
        let rows = normalizer
            .normalize(&response, false, Language::English)
            .await
            .unwrap();
        assert!(rows[0].description.is_none());
        assert!(rows[0].external_ids.english_wikipedia_link.is_none());
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_empty() {
        let normalizer = TextRazorNormalizer::new(Arc::new(NullLookup));
        let response = response_with(vec![entity("Rust", 2.0, 0.9)]);
        let rows = normalizer
            .normalize(&response, true, Language::English)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_zero_entities() {
        let normalizer = TextRazorNormalizer::new(Arc::new(NullLookup));
        let response = response_with(vec![]);
        let rows = normalizer
            .normalize(&response, false, Language::English)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_google_response() {
        let normalizer = TextRazorNormalizer::new(Arc::new(NullLookup));
        let response = ProviderResponse::Google(Default::default());
        assert!(normalizer
            .normalize(&response, false, Language::English)
            .await
            .is_err());
    }
}
