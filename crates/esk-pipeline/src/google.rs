//! Google Natural Language response normalization
//!
//! Maps the numeric entity type code through the fixed taxonomy table,
//! rejects the NUMBER/PRICE/DATE classes outright, ASCII-folds surface
//! forms, and turns the Knowledge Graph mid into a search URL.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use esk_core::text::ascii_fold;
use esk_core::{CanonicalEntity, EskError, Language, Result, WikipediaLookup};
use esk_providers::google::google_type_name;
use esk_providers::ProviderResponse;

use crate::normalize::{accepts_name, EntityNormalizer, Progress};

/// Normalizer for Google Natural Language responses
pub struct GoogleNormalizer {
    lookup: Arc<dyn WikipediaLookup>,
}

impl GoogleNormalizer {
    pub fn new(lookup: Arc<dyn WikipediaLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait::async_trait]
impl EntityNormalizer for GoogleNormalizer {
    async fn normalize(
        &self,
        response: &ProviderResponse,
        enrich_fully: bool,
        language: Language,
    ) -> Result<Vec<CanonicalEntity>> {
        let ProviderResponse::Google(response) = response else {
            return Err(EskError::Provider(
                "expected a Google NLP response".to_string(),
            ));
        };

        let mut progress = Progress::new(response.entities.len());
        let mut known: HashSet<&str> = HashSet::new();
        let mut rows = Vec::new();

        for entity in &response.entities {
            progress.tick();

            if known.contains(entity.name.as_str()) || !accepts_name(&entity.name) {
                continue;
            }

            // Code 0 and unmapped codes collapse to "thing"; the numeric
            // classes are excluded entirely.
            let category = match google_type_name(entity.type_code) {
                Some("NUMBER") | Some("PRICE") | Some("DATE") => continue,
                Some("UNKNOWN") | None => "thing".to_string(),
                Some(name) => name.to_string(),
            };

            let mut row = CanonicalEntity::new(ascii_fold(&entity.name), category, entity.salience);
            row.external_ids.knowledge_graph_id = entity.knowledge_graph_url();

            if enrich_fully {
                match self.lookup.lookup(&entity.name, language).await {
                    Ok(page) => {
                        row.description = Some(page.summary);
                        row.external_ids.english_wikipedia_link = page.english_link;
                        row.external_ids.italian_wikipedia_link = page.italian_link;
                    }
                    Err(e) => {
                        warn!(entity = %entity.name, error = %e, "enrichment lookup failed");
                        row.description = Some(String::new());
                    }
                }
            }

            known.insert(entity.name.as_str());
            rows.push(row);
        }

        Ok(rows)
    }
}
