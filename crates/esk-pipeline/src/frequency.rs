//! In-text frequency annotation with stemmed fallback
//!
//! Counting runs in two explicit stages: a lower-cased literal substring
//! count over the source text, and, only when that count is zero, a
//! lookup of the stemmed entity name in a pre-stemmed token multiset.
//!
//! The substring count is deliberately not word-bounded, so a short
//! entity name also matches inside longer unrelated words ("art" inside
//! "article"). That imprecision is part of the counting contract.

use std::collections::HashMap;

use rust_stemmers::{Algorithm, Stemmer};

use esk_core::{CanonicalEntity, Language};

fn stemmer_for(language: Language) -> Stemmer {
    match language {
        Language::English => Stemmer::create(Algorithm::English),
        Language::Italian => Stemmer::create(Algorithm::Italian),
    }
}

/// A whitespace-tokenized source text with every token stemmed once.
pub struct StemmedCorpus {
    counts: HashMap<String, u64>,
    stemmer: Stemmer,
}

impl StemmedCorpus {
    pub fn new(text: &str, language: Language) -> Self {
        let stemmer = stemmer_for(language);
        let mut counts: HashMap<String, u64> = HashMap::new();
        for token in text.split_whitespace() {
            let stem = stemmer.stem(&token.to_lowercase()).to_string();
            *counts.entry(stem).or_insert(0) += 1;
        }
        Self { counts, stemmer }
    }

    /// How many corpus tokens share this word's stem.
    pub fn stem_count(&self, word: &str) -> u64 {
        let lowered = word.to_lowercase();
        let stem = self.stemmer.stem(&lowered);
        self.counts.get(stem.as_ref()).copied().unwrap_or(0)
    }
}

/// Count literal substring occurrences of `name` in `text`, both
/// lower-cased. Non-overlapping, not word-bounded.
pub fn literal_count(name: &str, text: &str) -> u64 {
    let name = name.to_lowercase();
    if name.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&name).count() as u64
}

/// Attach an occurrence count to every entity in the table.
pub fn annotate_frequencies(entities: &mut [CanonicalEntity], text: &str, language: Language) {
    let corpus = StemmedCorpus::new(text, language);
    for entity in entities.iter_mut() {
        let count = literal_count(&entity.name, text);
        entity.frequency = if count == 0 {
            corpus.stem_count(&entity.name)
        } else {
            count
        };
    }
}
