//! ESK Pipeline - Entity enrichment and normalization pipeline
//!
//! Takes a raw NLP provider response and produces a de-duplicated,
//! cross-referenced, frequency-annotated canonical entity table, plus
//! schema.org JSON-LD markup for the rows a caller selects into the
//! `about` or `mentions` group.
//!
//! Data flow: raw provider response → normalizer → canonical table →
//! frequency annotation + confidence rescale (independent passes) →
//! selection → schema serialization.

use std::sync::Arc;

use tracing::info;

use esk_core::{CanonicalEntity, EskError, Language, Result, Topic, WikipediaLookup};
use esk_providers::{is_url, EntityProvider, ProviderResponse};

pub mod export;
pub mod frequency;
pub mod google;
pub mod normalize;
pub mod rescale;
pub mod schema;
pub mod textrazor;

pub use frequency::annotate_frequencies;
pub use google::GoogleNormalizer;
pub use normalize::EntityNormalizer;
pub use rescale::rescale_confidence;
pub use schema::{SchemaRole, SchemaSerializer};
pub use textrazor::TextRazorNormalizer;

/// An immutable description of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// The text or URL to analyze
    pub input: String,

    /// Whether the input is a URL
    pub is_url: bool,

    /// Enrich every accepted entity from Wikipedia during normalization
    pub enrich_fully: bool,

    /// Extract topics and categories (TextRazor only)
    pub extract_topics: bool,
}

impl AnalysisRequest {
    /// Build a request, classifying the input as URL or free text.
    ///
    /// Empty input is rejected up front; nothing downstream runs.
    pub fn new(input: impl Into<String>) -> Result<Self> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(EskError::EmptyInput);
        }
        let is_url = is_url(&input);
        Ok(Self {
            input,
            is_url,
            enrich_fully: false,
            extract_topics: false,
        })
    }

    /// Request Wikipedia enrichment for every accepted entity.
    pub fn with_full_enrichment(mut self) -> Self {
        self.enrich_fully = true;
        self
    }

    /// Request topic and category extraction.
    pub fn with_topics(mut self) -> Self {
        self.extract_topics = true;
        self
    }
}

/// The product of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Canonical entity table, in order of first appearance
    pub entities: Vec<CanonicalEntity>,

    /// Topics (TextRazor only, when requested)
    pub topics: Vec<Topic>,

    /// IPTC media-topic categories (TextRazor only, when requested)
    pub categories: Vec<Topic>,

    /// Detected document language
    pub language: Language,

    /// The text frequencies were counted against
    pub analyzed_text: String,
}

impl AnalysisResult {
    /// The `n` most frequent entities, most frequent first.
    pub fn top_entities_by_frequency(&self, n: usize) -> Vec<&CanonicalEntity> {
        let mut ranked: Vec<&CanonicalEntity> = self.entities.iter().collect();
        ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        ranked.truncate(n);
        ranked
    }
}

/// Orchestrates one full analysis: provider call, normalization, and the
/// two enrichment passes.
///
/// Runs request-scoped and sequentially; the Wikipedia lookup client is
/// the only shared collaborator and is stateless per call.
pub struct AnalysisPipeline {
    provider: Arc<dyn EntityProvider>,
    lookup: Arc<dyn WikipediaLookup>,
}

impl AnalysisPipeline {
    pub fn new(provider: Arc<dyn EntityProvider>, lookup: Arc<dyn WikipediaLookup>) -> Self {
        Self { provider, lookup }
    }

    /// Run an analysis to completion.
    ///
    /// Only authentication and empty-input failures abort the run;
    /// per-entity enrichment failures degrade the affected rows.
    pub async fn run(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        if request.input.trim().is_empty() {
            return Err(EskError::EmptyInput);
        }

        let response = self.provider.analyze(&request.input, request.is_url).await?;
        let language = response.language();
        info!(
            provider = self.provider.name(),
            entities = response.entity_count(),
            %language,
            "provider response received"
        );

        let normalizer: Box<dyn EntityNormalizer> = match &response {
            ProviderResponse::TextRazor(_) => {
                Box::new(TextRazorNormalizer::new(self.lookup.clone()))
            }
            ProviderResponse::Google(_) => Box::new(GoogleNormalizer::new(self.lookup.clone())),
        };
        let mut entities = normalizer
            .normalize(&response, request.enrich_fully, language)
            .await?;

        let analyzed_text = response.analyzed_text(&request.input).to_string();
        annotate_frequencies(&mut entities, &analyzed_text, language);
        rescale_confidence(&mut entities);

        let (topics, categories) = match (&response, request.extract_topics) {
            (ProviderResponse::TextRazor(raw), true) => {
                (textrazor::topics(raw), textrazor::categories(raw))
            }
            _ => (Vec::new(), Vec::new()),
        };

        Ok(AnalysisResult {
            entities,
            topics,
            categories,
            language,
            analyzed_text,
        })
    }

    /// Serialize a selection of result rows into JSON-LD markup.
    pub async fn schema_markup(
        &self,
        role: SchemaRole,
        selection: &[CanonicalEntity],
        already_enriched: bool,
        language: Language,
    ) -> Result<String> {
        SchemaSerializer::new(self.lookup.clone())
            .serialize(role, selection, already_enriched, language)
            .await
    }
}
