//! schema.org JSON-LD serialization for selected entities
//!
//! Turns the entities a user selected into the `about` or `mentions`
//! group into a JSON-LD document of schema.org `Thing` items, wrapped in
//! the script-tag envelope expected for page injection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use esk_core::{CanonicalEntity, EskError, Language, Result, WikipediaLookup};

pub const SCHEMA_ENVELOPE_OPEN: &str = "<script type=\"application/ld+json\">";
pub const SCHEMA_ENVELOPE_CLOSE: &str = "</script>";

const SCHEMA_CONTEXT: &str = "http://schema.org";
const WIKIDATA_BASE: &str = "https://www.wikidata.org/wiki/";

/// The schema.org property a selection is serialized under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaRole {
    About,
    Mentions,
}

impl SchemaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::About => "about",
            Self::Mentions => "mentions",
        }
    }

    /// Export file name for this role's JSON-LD artifact.
    pub fn export_filename(&self) -> &'static str {
        match self {
            Self::About => "about-entities.json",
            Self::Mentions => "mentions-entities.json",
        }
    }
}

impl std::fmt::Display for SchemaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One schema.org `Thing` in the output document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaItem {
    #[serde(rename = "@context")]
    pub context: String,

    #[serde(rename = "@type")]
    pub item_type: String,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    #[serde(rename = "SameAs", skip_serializing_if = "Option::is_none", default)]
    pub same_as: Option<Vec<String>>,
}

/// Serializer for the selected-entity JSON-LD documents
pub struct SchemaSerializer {
    lookup: Arc<dyn WikipediaLookup>,
}

impl SchemaSerializer {
    pub fn new(lookup: Arc<dyn WikipediaLookup>) -> Self {
        Self { lookup }
    }

    /// Serialize a selection into a JSON-LD document string.
    ///
    /// When normalization already enriched the table, the stored
    /// descriptions were shipped with the entity rows and the items carry
    /// none; otherwise a fresh Wikipedia lookup fills each description,
    /// degrading to an absent field on a miss. Item order follows the
    /// selection order.
    pub async fn serialize(
        &self,
        role: SchemaRole,
        selection: &[CanonicalEntity],
        already_enriched: bool,
        language: Language,
    ) -> Result<String> {
        let mut items = Vec::with_capacity(selection.len());
        for entity in selection {
            let description = if already_enriched {
                None
            } else {
                match self.lookup.lookup(&entity.name, language).await {
                    Ok(page) => Some(page.summary),
                    Err(e) => {
                        warn!(entity = %entity.name, error = %e, "schema description lookup failed");
                        None
                    }
                }
            };

            items.push(SchemaItem {
                context: SCHEMA_CONTEXT.to_string(),
                item_type: "Thing".to_string(),
                name: entity.name.clone(),
                description,
                same_as: same_as_links(entity),
            });
        }

        let mut grouped = serde_json::Map::new();
        grouped.insert(
            role.as_str().to_string(),
            serde_json::to_value(&items)
                .map_err(|e| EskError::Export(format!("schema serialization failed: {e}")))?,
        );
        let document = serde_json::Value::Array(vec![serde_json::Value::Object(grouped)]);
        let body = serde_json::to_string_pretty(&document)
            .map_err(|e| EskError::Export(format!("schema serialization failed: {e}")))?;

        Ok(format!(
            "{SCHEMA_ENVELOPE_OPEN}\n{body}\n{SCHEMA_ENVELOPE_CLOSE}"
        ))
    }
}

/// Combine the stored Wikipedia link and the Wikidata URI into `SameAs`.
///
/// One present gives a single element; neither present omits the key.
fn same_as_links(entity: &CanonicalEntity) -> Option<Vec<String>> {
    let wiki = entity.external_ids.wikipedia_link.clone();
    let wikidata = entity
        .external_ids
        .wikidata_id
        .as_ref()
        .map(|id| format!("{WIKIDATA_BASE}{id}"));

    match (wiki, wikidata) {
        (Some(link), Some(uri)) => Some(vec![link, uri]),
        (Some(link), None) => Some(vec![link]),
        (None, Some(uri)) => Some(vec![uri]),
        (None, None) => None,
    }
}

/// Strip the script-tag envelope from a serialized document.
///
/// Intended for tests and for callers that want to re-parse the payload.
pub fn strip_envelope(document: &str) -> Option<&str> {
    document
        .strip_prefix(SCHEMA_ENVELOPE_OPEN)?
        .strip_suffix(SCHEMA_ENVELOPE_CLOSE)
        .map(str::trim)
}
