pub mod compute;

pub use compute::build_features;

/// Nombre d'apparitions de chaque numéro 1..=N sur la fenêtre récente.
/// `counts[n - 1]` correspond au numéro `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    counts: Vec<u32>,
}

impl FeatureVector {
    pub fn zeros(max_number: u8) -> Self {
        Self { counts: vec![0; max_number as usize] }
    }

    pub fn from_counts(counts: Vec<u32>) -> Self {
        Self { counts }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, number: u8) -> Option<u32> {
        (number as usize)
            .checked_sub(1)
            .and_then(|idx| self.counts.get(idx))
            .copied()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Ligne unique passée à chaque prédicteur.
    pub fn as_row(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }

    pub(crate) fn increment(&mut self, number: u8) {
        self.counts[(number - 1) as usize] += 1;
    }
}
