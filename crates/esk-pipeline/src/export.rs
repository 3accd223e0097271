//! CSV export encoders for the canonical table and topic lists

use esk_core::{CanonicalEntity, EskError, Result, Topic};

pub const ENTITIES_CSV_FILENAME: &str = "entities.csv";
pub const TOPICS_CSV_FILENAME: &str = "topics.csv";
pub const CATEGORIES_CSV_FILENAME: &str = "categories.csv";

const ENTITY_HEADER: [&str; 11] = [
    "name",
    "category",
    "description",
    "wikidataId",
    "wikipediaLink",
    "englishWikipediaLink",
    "italianWikipediaLink",
    "knowledgeGraphId",
    "score",
    "confidence",
    "frequency",
];

/// Encode the full canonical table as CSV, one row per entity.
///
/// The score column carries the 2-decimal percentage form; the
/// confidence column prefers the rescaled percentage when the rescaler
/// ran, else the raw value.
pub fn entities_csv(entities: &[CanonicalEntity]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(ENTITY_HEADER)
        .map_err(|e| EskError::Export(format!("csv write failed: {e}")))?;

    for entity in entities {
        let confidence = match (&entity.confidence_percent, entity.confidence) {
            (Some(percent), _) => percent.clone(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => String::new(),
        };
        let ids = &entity.external_ids;
        writer
            .write_record([
                entity.name.as_str(),
                entity.category.as_str(),
                entity.description.as_deref().unwrap_or(""),
                ids.wikidata_id.as_deref().unwrap_or(""),
                ids.wikipedia_link.as_deref().unwrap_or(""),
                ids.english_wikipedia_link.as_deref().unwrap_or(""),
                ids.italian_wikipedia_link.as_deref().unwrap_or(""),
                ids.knowledge_graph_id.as_deref().unwrap_or(""),
                entity.score_percent().as_str(),
                confidence.as_str(),
                entity.frequency.to_string().as_str(),
            ])
            .map_err(|e| EskError::Export(format!("csv write failed: {e}")))?;
    }

    finish(writer)
}

/// Encode a topic or category list as two-column CSV.
pub fn topics_csv(topics: &[Topic]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(["label", "score"])
        .map_err(|e| EskError::Export(format!("csv write failed: {e}")))?;

    for topic in topics {
        writer
            .write_record([topic.label.as_str(), topic.score.to_string().as_str()])
            .map_err(|e| EskError::Export(format!("csv write failed: {e}")))?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| EskError::Export(format!("csv flush failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| EskError::Export(format!("csv is not utf-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_csv_header_and_rows() {
        let mut entity = CanonicalEntity::new("Rust", "ProgrammingLanguage", 0.8765);
        entity.external_ids.wikidata_id = Some("Q575650".to_string());
        entity.frequency = 3;

        let csv = entities_csv(&[entity]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "name,category,description,wikidataId,wikipediaLink,englishWikipediaLink,italianWikipediaLink,knowledgeGraphId,score,confidence,frequency"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Rust,ProgrammingLanguage,,Q575650,,,,,87.65%,,3"
        );
    }

    #[test]
    fn test_confidence_prefers_rescaled() {
        let mut entity = CanonicalEntity::new("A", "thing", 0.5).with_confidence(2.5);
        entity.confidence_percent = Some("50.00%".to_string());
        let csv = entities_csv(&[entity]).unwrap();
        assert!(csv.contains("50.00%"));
        assert!(!csv.contains("2.5"));
    }

    #[test]
    fn test_topics_csv() {
        let topics = vec![
            Topic {
                label: "cinema".to_string(),
                score: 0.75,
            },
            Topic {
                label: "arts".to_string(),
                score: 0.5,
            },
        ];
        let csv = topics_csv(&topics).unwrap();
        assert_eq!(csv, "label,score\ncinema,0.75\narts,0.5\n");
    }

    #[test]
    fn test_empty_table() {
        let csv = entities_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
