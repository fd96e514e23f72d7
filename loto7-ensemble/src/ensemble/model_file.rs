use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PredictorSet;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{LogisticPredictor, Predictor};

/// Ensemble entraîné tel qu'il est sauvegardé sur disque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub max_number: u8,
    pub window: usize,
    /// Date du tirage le plus récent vu à l'entraînement.
    pub trained_on: Option<NaiveDate>,
    pub n_samples: usize,
    pub predictors: BTreeMap<u8, LogisticPredictor>,
}

impl ModelFile {
    /// Vérifie que le fichier correspond à la configuration active puis construit l'ensemble.
    pub fn into_predictor_set(self, config: &EngineConfig) -> EngineResult<PredictorSet> {
        if self.max_number != config.max_number {
            return Err(EngineError::Configuration(format!(
                "modèles entraînés pour N={}, configuration N={}",
                self.max_number, config.max_number
            )));
        }
        if self.window != config.window {
            return Err(EngineError::Configuration(format!(
                "modèles entraînés avec une fenêtre de {}, configuration {}",
                self.window, config.window
            )));
        }

        for (n, predictor) in &self.predictors {
            predictor.check().map_err(|reason| {
                EngineError::Configuration(format!("prédicteur du numéro {} : {}", n, reason))
            })?;
        }

        let predictors: BTreeMap<u8, Box<dyn Predictor>> = self
            .predictors
            .into_iter()
            .map(|(n, p)| (n, Box::new(p) as Box<dyn Predictor>))
            .collect();
        PredictorSet::from_predictors(self.max_number, predictors)
    }
}

pub fn save_models(models: &ModelFile, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(models)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {:?}", path))?;
    log::info!("{} prédicteurs sauvegardés dans {:?}", models.predictors.len(), path);
    Ok(())
}

pub fn read_models(path: &Path) -> anyhow::Result<ModelFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let models: ModelFile = serde_json::from_str(&json)
        .with_context(|| format!("Fichier de modèles {:?} mal formé", path))?;
    Ok(models)
}

/// Charge un ensemble complet ; échoue dès le chargement si un numéro manque.
pub fn load_models(path: &Path, config: &EngineConfig) -> anyhow::Result<PredictorSet> {
    let models = read_models(path)?;
    log::debug!(
        "Modèles {:?} : N={}, fenêtre={}, entraînés jusqu'au {:?}",
        path, models.max_number, models.window, models.trained_on
    );
    let set = models
        .into_predictor_set(config)
        .with_context(|| format!("Ensemble {:?} inutilisable", path))?;
    Ok(set)
}
