//! Confidence rescaling against the column maximum

use tracing::{debug, warn};

use esk_core::CanonicalEntity;

/// Rescale a numeric column into 0-100% of its maximum, formatted with
/// two decimals.
///
/// Returns `None` when the column is empty or its maximum is not a
/// positive finite number; callers leave the original values unchanged
/// in that case.
pub fn rescale(values: &[f64]) -> Option<Vec<String>> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if values.is_empty() || !max.is_finite() || max <= 0.0 {
        return None;
    }
    Some(
        values
            .iter()
            .map(|v| format!("{:.2}%", v / max * 100.0))
            .collect(),
    )
}

/// Rescale the confidence column of an entity table in place.
///
/// No-op when any row lacks a confidence value (the column is absent for
/// Google tables) or when the maximum is degenerate.
pub fn rescale_confidence(entities: &mut [CanonicalEntity]) {
    if entities.is_empty() {
        return;
    }
    let values: Option<Vec<f64>> = entities.iter().map(|e| e.confidence).collect();
    let Some(values) = values else {
        debug!("confidence column absent, skipping rescale");
        return;
    };
    match rescale(&values) {
        Some(formatted) => {
            for (entity, percent) in entities.iter_mut().zip(formatted) {
                entity.confidence_percent = Some(percent);
            }
        }
        None => warn!("confidence column maximum is not positive, leaving values unchanged"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_against_maximum() {
        let rescaled = rescale(&[2.0, 4.0, 5.0, 1.0]).unwrap();
        assert_eq!(rescaled, vec!["40.00%", "80.00%", "100.00%", "20.00%"]);
    }

    #[test]
    fn test_degenerate_columns() {
        assert!(rescale(&[]).is_none());
        assert!(rescale(&[0.0, 0.0]).is_none());
        assert!(rescale(&[-1.0, -2.0]).is_none());
    }

    #[test]
    fn test_rescale_confidence_in_place() {
        let mut entities = vec![
            CanonicalEntity::new("A", "thing", 0.1).with_confidence(2.0),
            CanonicalEntity::new("B", "thing", 0.2).with_confidence(4.0),
            CanonicalEntity::new("C", "thing", 0.3).with_confidence(5.0),
            CanonicalEntity::new("D", "thing", 0.4).with_confidence(1.0),
        ];
        rescale_confidence(&mut entities);
        let percents: Vec<&str> = entities
            .iter()
            .map(|e| e.confidence_percent.as_deref().unwrap())
            .collect();
        assert_eq!(percents, vec!["40.00%", "80.00%", "100.00%", "20.00%"]);
        // raw values are preserved
        assert_eq!(entities[0].confidence, Some(2.0));
    }

    #[test]
    fn test_absent_column_is_noop() {
        let mut entities = vec![CanonicalEntity::new("A", "thing", 0.1)];
        rescale_confidence(&mut entities);
        assert!(entities[0].confidence_percent.is_none());
    }

    #[test]
    fn test_zero_maximum_leaves_values_unchanged() {
        let mut entities = vec![
            CanonicalEntity::new("A", "thing", 0.1).with_confidence(0.0),
            CanonicalEntity::new("B", "thing", 0.2).with_confidence(0.0),
        ];
        rescale_confidence(&mut entities);
        assert!(entities.iter().all(|e| e.confidence_percent.is_none()));
    }

    #[test]
    fn test_empty_table_is_noop() {
        let mut entities: Vec<CanonicalEntity> = vec![];
        rescale_confidence(&mut entities);
    }
}
