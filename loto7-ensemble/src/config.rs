use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use loto7_db::models::{MAX_NUMBER, PICK_COUNT};
use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plus grand numéro tirable (N).
    pub max_number: u8,
    /// Nombre de tirages récents utilisés pour les features (W).
    pub window: usize,
    /// Taille du pool des meilleurs scores dans lequel on tire (K).
    pub top_k: usize,
    /// Nombre de grilles par lot.
    pub n_sets: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_number: MAX_NUMBER,
            window: 20,
            top_k: 20,
            n_sets: 5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if (self.max_number as usize) < PICK_COUNT {
            return Err(EngineError::Configuration(format!(
                "max_number={} inférieur à {} numéros par grille",
                self.max_number, PICK_COUNT
            )));
        }
        if self.window == 0 {
            return Err(EngineError::Configuration("window doit être ≥ 1".to_string()));
        }
        if self.top_k < PICK_COUNT || self.top_k > self.max_number as usize {
            return Err(EngineError::Configuration(format!(
                "top_k={} hors de [{}, {}]",
                self.top_k, PICK_COUNT, self.max_number
            )));
        }
        if self.n_sets == 0 {
            return Err(EngineError::Configuration("n_sets doit être ≥ 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub lambda: f64,
    pub epochs: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            lambda: 0.001,
            epochs: 300,
        }
    }
}

/// Fichier de configuration optionnel : les clés absentes prennent la valeur par défaut.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub engine: EngineConfig,
    pub training: TrainingConfig,
}

pub fn load_config(path: &Path) -> anyhow::Result<ConfigFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire la configuration {:?}", path))?;
    let config: ConfigFile = serde_json::from_str(&json)
        .with_context(|| format!("Configuration {:?} mal formée", path))?;
    config.engine.validate()?;
    log::debug!("Configuration chargée depuis {:?} : {:?}", path, config);
    Ok(config)
}
