use loto7_db::models::DrawRecord;

use super::FeatureVector;
use crate::error::{EngineError, EngineResult};

/// Compte les numéros principaux des `window` tirages les plus récents (par date).
/// L'ordre de `history` est indifférent. Un historique plus court que la fenêtre
/// n'est pas une erreur ; un historique vide donne un vecteur nul.
pub fn build_features(history: &[DrawRecord], window: usize, max_number: u8) -> EngineResult<FeatureVector> {
    if window == 0 {
        return Err(EngineError::Configuration("window doit être ≥ 1".to_string()));
    }

    let mut recent: Vec<&DrawRecord> = history.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(window);

    let mut features = FeatureVector::zeros(max_number);
    for draw in recent {
        check_record(draw, max_number)?;
        for &n in &draw.numbers {
            features.increment(n);
        }
    }

    Ok(features)
}

pub(crate) fn check_record(draw: &DrawRecord, max_number: u8) -> EngineResult<()> {
    if let Some(&n) = draw.numbers.iter().find(|&&n| n < 1 || n > max_number) {
        return Err(EngineError::DataIntegrity {
            date: draw.date,
            field: "numbers",
            reason: format!("numéro {} hors limites (1-{})", n, max_number),
        });
    }
    for (i, n) in draw.numbers.iter().enumerate() {
        if draw.numbers[i + 1..].contains(n) {
            return Err(EngineError::DataIntegrity {
                date: draw.date,
                field: "numbers",
                reason: format!("numéro {} en double", n),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, make_test_history};

    #[test]
    fn test_three_draw_example() {
        let history = vec![
            DrawRecord::new(date(2024, 1, 5), [1, 2, 3, 4, 5, 6, 7], [8, 9]),
            DrawRecord::new(date(2024, 1, 12), [1, 2, 3, 4, 5, 6, 8], [7, 9]),
            DrawRecord::new(date(2024, 1, 19), [1, 2, 3, 4, 5, 6, 9], [7, 8]),
        ];
        let features = build_features(&history, 3, 9).unwrap();
        assert_eq!(features.counts(), &[3, 3, 3, 3, 3, 3, 1, 1, 1]);
    }

    #[test]
    fn test_empty_history_all_zero() {
        let features = build_features(&[], 20, 37).unwrap();
        assert_eq!(features.len(), 37);
        assert!(features.counts().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_dimension_and_sum() {
        let history = make_test_history(30);
        for window in [1, 5, 20, 30, 50] {
            let features = build_features(&history, window, 37).unwrap();
            assert_eq!(features.len(), 37);
            assert_eq!(features.total() as usize, 7 * window.min(history.len()));
        }
    }

    #[test]
    fn test_selects_most_recent_by_date() {
        // Ordre d'entrée volontairement mélangé
        let history = vec![
            DrawRecord::new(date(2024, 1, 5), [1, 2, 3, 4, 5, 6, 7], [8, 9]),
            DrawRecord::new(date(2024, 3, 1), [31, 32, 33, 34, 35, 36, 37], [1, 2]),
            DrawRecord::new(date(2024, 2, 2), [10, 11, 12, 13, 14, 15, 16], [1, 2]),
        ];
        let features = build_features(&history, 2, 37).unwrap();
        assert_eq!(features.count(1), Some(0));
        assert_eq!(features.count(10), Some(1));
        assert_eq!(features.count(37), Some(1));
        assert_eq!(features.total(), 14);
    }

    #[test]
    fn test_deterministic() {
        let history = make_test_history(25);
        let a = build_features(&history, 20, 37).unwrap();
        let b = build_features(&history, 20, 37).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_out_of_range_is_reported() {
        let history = vec![
            DrawRecord::new(date(2024, 1, 5), [1, 2, 3, 4, 5, 6, 38], [8, 9]),
        ];
        let err = build_features(&history, 20, 37).unwrap_err();
        match err {
            EngineError::DataIntegrity { date: d, field, .. } => {
                assert_eq!(d, date(2024, 1, 5));
                assert_eq!(field, "numbers");
            }
            other => panic!("erreur inattendue : {other:?}"),
        }
    }

    #[test]
    fn test_zero_is_reported() {
        let history = vec![
            DrawRecord::new(date(2024, 1, 5), [0, 2, 3, 4, 5, 6, 7], [8, 9]),
        ];
        assert!(matches!(
            build_features(&history, 20, 37),
            Err(EngineError::DataIntegrity { .. })
        ));
    }

    #[test]
    fn test_duplicate_number_is_reported() {
        let history = vec![
            DrawRecord::new(date(2024, 1, 5), [1, 1, 3, 4, 5, 6, 7], [8, 9]),
        ];
        assert!(matches!(
            build_features(&history, 20, 37),
            Err(EngineError::DataIntegrity { .. })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let history = make_test_history(5);
        assert!(matches!(
            build_features(&history, 0, 37),
            Err(EngineError::Configuration(_))
        ));
    }
}
