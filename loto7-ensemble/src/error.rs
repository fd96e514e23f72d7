use chrono::NaiveDate;
use thiserror::Error;

/// Erreurs du moteur de recommandation.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Tirage de l'historique mal formé.
    #[error("Tirage du {date} invalide ({field}) : {reason}")]
    DataIntegrity {
        date: NaiveDate,
        field: &'static str,
        reason: String,
    },

    /// Ensemble incomplet, paramètre K/W/N invalide, prédicteur défaillant.
    #[error("Configuration invalide : {0}")]
    Configuration(String),

    /// Vecteur de features de mauvaise dimension.
    #[error("Vecteur de features de dimension {actual}, attendu {expected}")]
    Input { expected: usize, actual: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
