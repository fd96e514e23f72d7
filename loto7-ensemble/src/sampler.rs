use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use loto7_db::models::PICK_COUNT;
use crate::ensemble::ScoreMap;
use crate::error::{EngineError, EngineResult};

/// Grille recommandée : 7 numéros distincts triés par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendedSet {
    numbers: [u8; PICK_COUNT],
}

impl RecommendedSet {
    pub fn numbers(&self) -> &[u8; PICK_COUNT] {
        &self.numbers
    }
}

/// RNG à seed fixe si demandé (tests, audit), sinon initialisé depuis l'entropie système.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Tirage uniforme sans remise de 7 numéros dans `pool`.
fn sample_from_pool<R: Rng + ?Sized>(pool: &[u8], rng: &mut R) -> RecommendedSet {
    let mut numbers = [0u8; PICK_COUNT];
    for (slot, idx) in numbers.iter_mut().zip(index::sample(rng, pool.len(), PICK_COUNT).iter()) {
        *slot = pool[idx];
    }
    numbers.sort();
    RecommendedSet { numbers }
}

/// 7 numéros uniformes sans remise dans [1, max_number].
pub fn generate_random_set<R: Rng + ?Sized>(rng: &mut R, max_number: u8) -> EngineResult<RecommendedSet> {
    if (max_number as usize) < PICK_COUNT {
        return Err(EngineError::Configuration(format!(
            "impossible de tirer {} numéros distincts dans 1-{}",
            PICK_COUNT, max_number
        )));
    }
    let pool: Vec<u8> = (1..=max_number).collect();
    Ok(sample_from_pool(&pool, rng))
}

pub fn random_batch<R: Rng + ?Sized>(rng: &mut R, n_sets: usize, max_number: u8) -> EngineResult<Vec<RecommendedSet>> {
    (0..n_sets).map(|_| generate_random_set(rng, max_number)).collect()
}

/// Les `top_k` numéros les mieux classés (vraisemblance décroissante, égalités par numéro croissant).
pub fn top_k_pool(scores: &ScoreMap, top_k: usize) -> EngineResult<Vec<u8>> {
    if top_k < PICK_COUNT {
        return Err(EngineError::Configuration(format!(
            "top_k={} inférieur à {} numéros par grille",
            top_k, PICK_COUNT
        )));
    }
    if scores.len() < top_k {
        return Err(EngineError::Configuration(format!(
            "{} numéros évalués, top_k={} demandé",
            scores.len(),
            top_k
        )));
    }
    let mut ranked = scores.ranked();
    ranked.truncate(top_k);
    Ok(ranked)
}

/// Tire 7 numéros uniformément parmi les `top_k` meilleurs scores.
/// Le tirage dans un pool plus large que 7 garde de la variabilité d'une grille à l'autre.
pub fn generate_scored_set<R: Rng + ?Sized>(scores: &ScoreMap, top_k: usize, rng: &mut R) -> EngineResult<RecommendedSet> {
    let pool = top_k_pool(scores, top_k)?;
    Ok(sample_from_pool(&pool, rng))
}

pub fn scored_batch<R: Rng + ?Sized>(
    scores: &ScoreMap,
    top_k: usize,
    n_sets: usize,
    rng: &mut R,
) -> EngineResult<Vec<RecommendedSet>> {
    let pool = top_k_pool(scores, top_k)?;
    log::debug!("Pool top-{} : {:?}", top_k, pool);
    Ok((0..n_sets).map(|_| sample_from_pool(&pool, rng)).collect())
}
