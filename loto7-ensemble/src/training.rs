use std::collections::BTreeMap;

use ndarray::Array2;

use loto7_db::models::DrawRecord;
use crate::config::{EngineConfig, TrainingConfig};
use crate::ensemble::model_file::ModelFile;
use crate::error::{EngineError, EngineResult};
use crate::features::build_features;
use crate::features::compute::check_record;
use crate::models::LogisticPredictor;

/// Exemples d'entraînement : une ligne par tirage cible.
/// `features[[i, ..]]` = comptes sur les `window` tirages qui précèdent la cible,
/// `labels[[i, n - 1]]` = 1.0 si `n` est sorti au tirage cible.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub features: Array2<f64>,
    pub labels: Array2<f64>,
}

impl TrainingSet {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }
}

/// Chaque tirage ayant au moins un tirage antérieur devient un exemple.
/// Seuls les tirages strictement antérieurs à la cible alimentent ses features.
pub fn build_training_set(history: &[DrawRecord], window: usize, max_number: u8) -> EngineResult<TrainingSet> {
    if window == 0 {
        return Err(EngineError::Configuration("window doit être ≥ 1".to_string()));
    }

    let mut chronological: Vec<&DrawRecord> = history.iter().collect();
    chronological.sort_by(|a, b| a.date.cmp(&b.date));

    let n_samples = chronological.len().saturating_sub(1);
    if n_samples == 0 {
        return Err(EngineError::Configuration(format!(
            "historique insuffisant pour l'entraînement ({} tirage(s))",
            chronological.len()
        )));
    }

    let size = max_number as usize;
    let mut features = Array2::<f64>::zeros((n_samples, size));
    let mut labels = Array2::<f64>::zeros((n_samples, size));

    for t in 1..chronological.len() {
        let target = chronological[t];
        check_record(target, max_number)?;

        let past: Vec<DrawRecord> = chronological[t.saturating_sub(window)..t]
            .iter()
            .map(|&d| d.clone())
            .collect();
        let vector = build_features(&past, window, max_number)?;

        let i = t - 1;
        for (j, &count) in vector.counts().iter().enumerate() {
            features[[i, j]] = count as f64;
        }
        for &n in &target.numbers {
            labels[[i, (n - 1) as usize]] = 1.0;
        }
    }

    Ok(TrainingSet { features, labels })
}

/// Entraîne un prédicteur logistique par numéro. `on_progress` est appelé après chaque numéro.
pub fn train_predictors(
    history: &[DrawRecord],
    engine: &EngineConfig,
    training: &TrainingConfig,
    mut on_progress: impl FnMut(u8),
) -> EngineResult<ModelFile> {
    engine.validate()?;
    let set = build_training_set(history, engine.window, engine.max_number)?;
    log::info!(
        "Entraînement de {} prédicteurs sur {} exemples (fenêtre {})",
        engine.max_number,
        set.n_samples(),
        engine.window
    );

    let mut predictors = BTreeMap::new();
    for n in 1..=engine.max_number {
        let y = set.labels.column((n - 1) as usize).to_owned();
        let model = LogisticPredictor::fit(&set.features, &y, training);
        log::debug!("Numéro {:2} : biais {:.4}", n, model.bias);
        predictors.insert(n, model);
        on_progress(n);
    }

    Ok(ModelFile {
        max_number: engine.max_number,
        window: engine.window,
        trained_on: history.iter().map(|d| d.date).max(),
        n_samples: set.n_samples(),
        predictors,
    })
}
