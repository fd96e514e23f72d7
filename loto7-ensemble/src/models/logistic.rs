use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::Predictor;
use crate::config::TrainingConfig;

/// Régression logistique sur features normalisées (z-score).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPredictor {
    pub means: Vec<f64>,
    pub stds: Vec<f64>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticPredictor {
    /// Descente de gradient avec régularisation L2.
    /// `x` : une ligne par exemple, `y` : 1.0 si le numéro est sorti, 0.0 sinon.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, config: &TrainingConfig) -> Self {
        let (n_samples, n_features) = x.dim();

        let means = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(n_features));
        let stds: Array1<f64> = x
            .axis_iter(Axis(0))
            .fold(Array1::zeros(n_features), |acc, row| {
                let diff = &row - &means;
                acc + &diff.mapv(|v| v * v)
            }) / n_samples.max(1) as f64;
        let stds = stds.mapv(|v| v.sqrt().max(1e-10));

        let mut x_norm = x.clone();
        for mut row in x_norm.rows_mut() {
            for j in 0..n_features {
                row[j] = (row[j] - means[j]) / stds[j];
            }
        }

        let mut weights = Array1::<f64>::zeros(n_features);
        let mut bias = 0.0f64;

        if n_samples > 0 {
            for _ in 0..config.epochs {
                let logits = x_norm.dot(&weights) + bias;
                let preds = logits.mapv(sigmoid);
                let errors = &preds - y;

                let grad_w = x_norm.t().dot(&errors) / n_samples as f64
                    + &weights * (config.lambda * 2.0);
                let grad_b = errors.sum() / n_samples as f64;

                weights = weights - &grad_w * config.learning_rate;
                bias -= grad_b * config.learning_rate;
            }
        }

        Self {
            means: means.to_vec(),
            stds: stds.to_vec(),
            weights: weights.to_vec(),
            bias,
        }
    }

    /// Cohérence interne d'un modèle relu depuis le disque.
    pub fn check(&self) -> Result<(), String> {
        let n = self.weights.len();
        if self.means.len() != n || self.stds.len() != n {
            return Err(format!(
                "dimensions incohérentes (means={}, stds={}, weights={})",
                self.means.len(),
                self.stds.len(),
                n
            ));
        }
        if let Some(s) = self.stds.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(format!("écart-type invalide : {}", s));
        }
        if self.means.iter().chain(&self.weights).any(|v| !v.is_finite()) || !self.bias.is_finite() {
            return Err("coefficient non fini".to_string());
        }
        Ok(())
    }
}

impl Predictor for LogisticPredictor {
    fn predict_proba(&self, row: &[f64]) -> f64 {
        let logit: f64 = row
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .zip(&self.weights)
            .map(|((&v, (&m, &s)), &w)| (v - m) / s * w)
            .sum();
        sigmoid(logit + self.bias)
    }

    fn n_features(&self) -> usize {
        self.weights.len()
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrainingConfig {
        TrainingConfig { learning_rate: 0.5, lambda: 0.0, epochs: 500 }
    }

    #[test]
    fn test_fit_learns_separable_signal() {
        // Le label suit la première feature
        let x = Array2::from_shape_vec(
            (6, 2),
            vec![0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 3.0, 1.0, 3.0, 2.0, 3.0, 3.0],
        ).unwrap();
        let y = Array1::from_vec(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let model = LogisticPredictor::fit(&x, &y, &config());

        let low = model.predict_proba(&[0.0, 2.0]);
        let high = model.predict_proba(&[3.0, 2.0]);
        assert!(high > 0.8, "high = {}", high);
        assert!(low < 0.2, "low = {}", low);
    }

    #[test]
    fn test_output_in_unit_interval() {
        let x = Array2::from_shape_vec((4, 3), (0..12).map(|v| v as f64).collect()).unwrap();
        let y = Array1::from_vec(vec![0.0, 1.0, 0.0, 1.0]);
        let model = LogisticPredictor::fit(&x, &y, &TrainingConfig::default());
        for row in [[0.0, 0.0, 0.0], [100.0, -50.0, 3.0], [1e6, 1e6, 1e6]] {
            let p = model.predict_proba(&row);
            assert!((0.0..=1.0).contains(&p), "p = {}", p);
        }
    }

    #[test]
    fn test_untrained_is_half() {
        let x = Array2::<f64>::zeros((0, 4));
        let y = Array1::<f64>::zeros(0);
        let model = LogisticPredictor::fit(&x, &y, &TrainingConfig::default());
        assert_eq!(model.n_features(), 4);
        assert!((model.predict_proba(&[1.0, 2.0, 3.0, 4.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_constant_feature_no_nan() {
        let x = Array2::from_elem((5, 2), 1.0);
        let y = Array1::from_vec(vec![1.0, 0.0, 1.0, 0.0, 1.0]);
        let model = LogisticPredictor::fit(&x, &y, &TrainingConfig::default());
        assert!(model.predict_proba(&[1.0, 1.0]).is_finite());
    }

    #[test]
    fn test_check_fitted_model() {
        let x = Array2::from_shape_vec((4, 2), vec![0.0, 1.0, 1.0, 0.0, 2.0, 1.0, 3.0, 0.0]).unwrap();
        let y = Array1::from_vec(vec![0.0, 0.0, 1.0, 1.0]);
        let model = LogisticPredictor::fit(&x, &y, &TrainingConfig::default());
        assert!(model.check().is_ok());
    }

    #[test]
    fn test_check_rejects_inconsistent_model() {
        let valid = LogisticPredictor {
            means: vec![0.0; 3],
            stds: vec![1.0; 3],
            weights: vec![0.5; 3],
            bias: 0.0,
        };
        assert!(valid.check().is_ok());

        let short_means = LogisticPredictor { means: vec![], stds: vec![], ..valid.clone() };
        assert!(short_means.check().is_err());

        let zero_std = LogisticPredictor { stds: vec![1.0, 0.0, 1.0], ..valid.clone() };
        assert!(zero_std.check().is_err());

        let nan_weight = LogisticPredictor { weights: vec![0.5, f64::NAN, 0.5], ..valid.clone() };
        assert!(nan_weight.check().is_err());

        let inf_bias = LogisticPredictor { bias: f64::INFINITY, ..valid };
        assert!(inf_bias.check().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let model = LogisticPredictor {
            means: vec![1.0, 2.0],
            stds: vec![0.5, 1.0],
            weights: vec![0.3, -0.2],
            bias: 0.1,
        };
        let json = serde_json::to_string(&model).unwrap();
        let loaded: LogisticPredictor = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, model);
    }
}
