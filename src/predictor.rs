// src/predictor.rs
// Loaded model + advice table, shared by the HTTP service and the CLI

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::Features;
use crate::error::Result;
use crate::model::TrainedModel;
use crate::risk::{AdviceTable, RiskCategory};
use crate::trainer::ArtifactPaths;

/// Outcome of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub input: Features,
    pub predicted_risk: RiskCategory,
    pub advice: String,
    /// Probability per category, rounded to three decimals
    pub confidence_scores: BTreeMap<RiskCategory, f64>,
}

/// Immutable inference context, built once and shared read-only
#[derive(Debug, Clone)]
pub struct Predictor {
    model: TrainedModel,
    advice: AdviceTable,
}

impl Predictor {
    pub fn new(model: TrainedModel, advice: AdviceTable) -> Self {
        let missing = model.missing_classes();
        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "Model was trained without some categories; they will always score 0"
            );
        }
        Self { model, advice }
    }

    /// Load both artifacts from disk
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let model = TrainedModel::load(&paths.model)?;
        let advice = AdviceTable::load(&paths.advice)?;
        info!(
            model = %paths.model.display(),
            advice = %paths.advice.display(),
            "Loaded predictor artifacts"
        );
        Ok(Self::new(model, advice))
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn advice(&self) -> &AdviceTable {
        &self.advice
    }

    pub fn predict(&self, features: Features) -> Result<PredictionResult> {
        let (predicted_risk, proba) = self.model.classify(&features)?;

        let mut confidence_scores: BTreeMap<RiskCategory, f64> =
            RiskCategory::ALL.iter().map(|c| (*c, 0.0)).collect();
        for (category, p) in proba {
            confidence_scores.insert(category, round3(p));
        }

        Ok(PredictionResult {
            input: features,
            predicted_risk,
            advice: self.advice.get(predicted_risk).to_string(),
            confidence_scores,
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::{self, TrainingConfig};
    use tempfile::TempDir;

    fn predictor() -> Predictor {
        let config = TrainingConfig {
            n_samples: 600,
            n_estimators: 15,
            ..TrainingConfig::default()
        };
        let outcome = trainer::train(&config).unwrap();
        Predictor::new(outcome.model, outcome.advice)
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.9996), 1.0);
        assert_eq!(round3(0.0), 0.0);
    }

    #[test]
    fn test_prediction_has_all_six_scores() {
        let result = predictor().predict(Features::default()).unwrap();
        assert_eq!(result.confidence_scores.len(), 6);
        assert!(result.confidence_scores.contains_key(&result.predicted_risk));
        let sum: f64 = result.confidence_scores.values().sum();
        assert!((sum - 1.0).abs() < 0.01, "sum was {sum}");
    }

    #[test]
    fn test_predicted_risk_has_highest_score() {
        let p = predictor();
        let features = Features::new(5.4, 18.0, 1600.0);
        let result = p.predict(features).unwrap();
        assert_eq!(result.predicted_risk, p.model().predict(&features).unwrap());
        let best = result.confidence_scores.values().cloned().fold(0.0, f64::max);
        assert_eq!(result.confidence_scores[&result.predicted_risk], best);
    }

    #[test]
    fn test_advice_matches_predicted_category() {
        let p = predictor();
        let result = p.predict(Features::new(9.0, 25.0, 1900.0)).unwrap();
        assert_eq!(result.advice, result.predicted_risk.advice());
        assert_eq!(result.input, Features::new(9.0, 25.0, 1900.0));
    }

    #[test]
    fn test_serializes_with_label_keys() {
        let result = predictor().predict(Features::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["predicted_risk"].is_string());
        assert_eq!(json["input"]["pH"], 7.0);
        assert!(json["confidence_scores"]["Safe"].is_number());
        assert!(json["confidence_scores"]["Metal_Leaching_Risk"].is_number());
    }

    #[test]
    fn test_load_missing_artifacts() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths {
            model: dir.path().join("water_model.json"),
            advice: dir.path().join("label_to_advice.json"),
        };
        assert!(Predictor::load(&paths).is_err());
    }
}
