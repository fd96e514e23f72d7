use rand::Rng;

use loto7_db::models::DrawRecord;
use crate::config::EngineConfig;
use crate::ensemble::{PredictorSet, ScoreMap};
use crate::error::{EngineError, EngineResult};
use crate::features::{FeatureVector, build_features};
use crate::sampler::{RecommendedSet, random_batch, scored_batch};

/// Résultat d'une recommandation par scores, avec ses intermédiaires pour l'affichage.
#[derive(Debug, Clone)]
pub struct ScoredRecommendation {
    pub features: FeatureVector,
    pub scores: ScoreMap,
    pub sets: Vec<RecommendedSet>,
}

/// Historique → features → scores de l'ensemble.
pub fn score_history(
    history: &[DrawRecord],
    predictors: &PredictorSet,
    config: &EngineConfig,
) -> EngineResult<(FeatureVector, ScoreMap)> {
    config.validate()?;
    if predictors.max_number() != config.max_number {
        return Err(EngineError::Configuration(format!(
            "ensemble prévu pour N={}, configuration N={}",
            predictors.max_number(),
            config.max_number
        )));
    }
    let features = build_features(history, config.window, config.max_number)?;
    let scores = predictors.score_all(&features)?;
    Ok((features, scores))
}

/// Lot de `config.n_sets` grilles tirées dans le top-K des scores.
pub fn recommend_scored<R: Rng + ?Sized>(
    history: &[DrawRecord],
    predictors: &PredictorSet,
    config: &EngineConfig,
    rng: &mut R,
) -> EngineResult<ScoredRecommendation> {
    let (features, scores) = score_history(history, predictors, config)?;
    let sets = scored_batch(&scores, config.top_k, config.n_sets, rng)?;
    log::info!("{} grilles générées par scores (top-{})", sets.len(), config.top_k);
    Ok(ScoredRecommendation { features, scores, sets })
}

/// Lot de `config.n_sets` grilles purement aléatoires.
pub fn recommend_random<R: Rng + ?Sized>(config: &EngineConfig, rng: &mut R) -> EngineResult<Vec<RecommendedSet>> {
    config.validate()?;
    random_batch(rng, config.n_sets, config.max_number)
}
