//! Entity normalization contract and shared filtering rules
//!
//! Both provider normalizers produce the same canonical row shape and
//! apply the same rejection rules before any provider-specific handling:
//! purely numeric names, names that parse as a calendar date or time, and
//! names already emitted (case-sensitive, first occurrence wins).

use chrono::{DateTime, NaiveDate, NaiveTime};
use tracing::debug;

use esk_core::{CanonicalEntity, Language, Result};
use esk_providers::ProviderResponse;

/// Common contract for the two provider normalizers.
///
/// Output order is the order of first appearance in the raw response.
/// A Wikipedia enrichment failure for one entity must never abort the
/// batch; the normalizer visits every entity in the response.
#[async_trait::async_trait]
pub trait EntityNormalizer: Send + Sync {
    async fn normalize(
        &self,
        response: &ProviderResponse,
        enrich_fully: bool,
        language: Language,
    ) -> Result<Vec<CanonicalEntity>>;
}

/// Date formats an entity name is checked against before acceptance.
///
/// Approximates the permissive date parsing the upstream taxonomy uses;
/// purely numeric strings are handled by [`is_purely_numeric`] first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const TIME_FORMATS: &[&str] = &["%H:%M", "%H:%M:%S", "%I:%M %p"];

/// Whether an identifying string is purely numeric.
pub fn is_purely_numeric(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_numeric())
}

/// Whether an identifying string parses as a calendar date or time.
pub fn parses_as_datetime(name: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    if DateTime::parse_from_rfc3339(name).is_ok() {
        return true;
    }
    if DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(name, fmt).is_ok())
    {
        return true;
    }
    TIME_FORMATS
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(name, fmt).is_ok())
}

/// Whether a name passes the shared rejection rules.
pub fn accepts_name(name: &str) -> bool {
    !is_purely_numeric(name) && !parses_as_datetime(name)
}

/// Progress counter over a raw entity sequence.
///
/// Guards the zero-entity case so progress reporting never divides by
/// zero.
pub struct Progress {
    total: usize,
    seen: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self { total, seen: 0 }
    }

    /// Record one visited entity and report progress.
    pub fn tick(&mut self) {
        self.seen += 1;
        debug!(percent = self.percent(), "normalization progress");
    }

    /// Completed share in whole percent; 100 for an empty sequence.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            100
        } else {
            (self.seen * 100 / self.total) as u64
        }
    }
}
