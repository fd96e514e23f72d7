pub mod model_file;

use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::features::FeatureVector;
use crate::models::Predictor;

/// Un prédicteur par numéro 1..=N, chargés et possédés ensemble.
/// `predictors[n - 1]` évalue le numéro `n`.
pub struct PredictorSet {
    max_number: u8,
    predictors: Vec<Box<dyn Predictor>>,
}

impl std::fmt::Debug for PredictorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictorSet")
            .field("max_number", &self.max_number)
            .field("predictors", &self.predictors.len())
            .finish()
    }
}

impl PredictorSet {
    /// Construit l'ensemble en vérifiant immédiatement sa complétude :
    /// chaque numéro 1..=N présent, aucun numéro hors domaine, dimension d'entrée N.
    pub fn from_predictors(
        max_number: u8,
        mut predictors: BTreeMap<u8, Box<dyn Predictor>>,
    ) -> EngineResult<Self> {
        let missing: Vec<u8> = (1..=max_number).filter(|n| !predictors.contains_key(n)).collect();
        if !missing.is_empty() {
            return Err(EngineError::Configuration(format!(
                "ensemble incomplet, prédicteurs manquants pour {:?}",
                missing
            )));
        }

        let extra: Vec<u8> = predictors.keys().copied().filter(|&n| n < 1 || n > max_number).collect();
        if !extra.is_empty() {
            return Err(EngineError::Configuration(format!(
                "prédicteurs hors domaine (1-{}) : {:?}",
                max_number, extra
            )));
        }

        let mut ordered = Vec::with_capacity(max_number as usize);
        for n in 1..=max_number {
            if let Some(predictor) = predictors.remove(&n) {
                if predictor.n_features() != max_number as usize {
                    return Err(EngineError::Configuration(format!(
                        "le prédicteur du numéro {} attend {} features, {} prévues",
                        n,
                        predictor.n_features(),
                        max_number
                    )));
                }
                ordered.push(predictor);
            }
        }

        Ok(Self { max_number, predictors: ordered })
    }

    pub fn max_number(&self) -> u8 {
        self.max_number
    }

    pub fn len(&self) -> usize {
        self.predictors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictors.is_empty()
    }

    /// Évalue chaque numéro sur le même vecteur de features.
    pub fn score_all(&self, features: &FeatureVector) -> EngineResult<ScoreMap> {
        let size = self.max_number as usize;
        if self.predictors.len() != size {
            return Err(EngineError::Configuration(format!(
                "ensemble incomplet : {} prédicteurs pour {} numéros",
                self.predictors.len(),
                size
            )));
        }
        if features.len() != size {
            return Err(EngineError::Input {
                expected: size,
                actual: features.len(),
            });
        }

        let row = features.as_row();
        let mut likelihoods = Vec::with_capacity(size);
        for (i, predictor) in self.predictors.iter().enumerate() {
            let p = predictor.predict_proba(&row);
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(EngineError::Configuration(format!(
                    "le prédicteur du numéro {} a produit {} (attendu dans [0, 1])",
                    i + 1,
                    p
                )));
            }
            likelihoods.push(p);
        }

        Ok(ScoreMap { likelihoods })
    }
}

/// Vraisemblance par numéro, `likelihoods[n - 1]` pour le numéro `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMap {
    likelihoods: Vec<f64>,
}

impl ScoreMap {
    /// Refuse toute valeur non finie ou hors de [0, 1].
    pub fn from_likelihoods(likelihoods: Vec<f64>) -> EngineResult<Self> {
        if let Some((i, p)) = likelihoods
            .iter()
            .enumerate()
            .find(|(_, p)| !p.is_finite() || !(0.0..=1.0).contains(*p))
        {
            return Err(EngineError::Configuration(format!(
                "vraisemblance {} pour le numéro {} (attendu dans [0, 1])",
                p,
                i + 1
            )));
        }
        Ok(Self { likelihoods })
    }

    pub fn len(&self) -> usize {
        self.likelihoods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.likelihoods.is_empty()
    }

    pub fn get(&self, number: u8) -> Option<f64> {
        (number as usize)
            .checked_sub(1)
            .and_then(|idx| self.likelihoods.get(idx))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.likelihoods
            .iter()
            .enumerate()
            .map(|(i, &p)| ((i + 1) as u8, p))
    }

    /// Numéros par vraisemblance décroissante, à égalité par numéro croissant.
    pub fn ranked(&self) -> Vec<u8> {
        let mut numbers: Vec<(u8, f64)> = self.iter().collect();
        numbers.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        numbers.into_iter().map(|(n, _)| n).collect()
    }
}
