pub mod logistic;

pub use logistic::LogisticPredictor;

/// Prédicteur binaire pour UN numéro : « ce numéro sort-il au prochain tirage ? ».
/// Il ne voit que le vecteur de features partagé ; c'est l'identité du modèle,
/// pas la ligne d'entrée, qui encode le numéro évalué.
pub trait Predictor: Send + Sync {
    /// Vraisemblance dans [0, 1] pour une ligne de features.
    fn predict_proba(&self, row: &[f64]) -> f64;
    /// Dimension attendue de la ligne d'entrée.
    fn n_features(&self) -> usize;
}

/// Prédicteur constant, utile pour les tests et comme référence uniforme.
#[derive(Debug, Clone)]
pub struct ConstantPredictor {
    pub probability: f64,
    pub n_features: usize,
}

impl Predictor for ConstantPredictor {
    fn predict_proba(&self, _row: &[f64]) -> f64 {
        self.probability
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_predictor() {
        let p = ConstantPredictor { probability: 0.25, n_features: 37 };
        assert_eq!(p.predict_proba(&[0.0; 37]), 0.25);
        assert_eq!(p.n_features(), 37);
    }
}
