// src/model.rs
// Trained model artifact: forest + class list + training metadata

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::Features;
use crate::error::{Result, RiskError};
use crate::forest::{argmax, RandomForest};
use crate::risk::RiskCategory;

/// Provenance recorded alongside the fitted forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub n_train: usize,
    pub n_test: usize,
    /// Accuracy on the held-out split, when one was evaluated
    pub test_accuracy: Option<f64>,
    pub version: String,
}

/// The persisted classifier.
///
/// `classes[i]` is the category for forest class id `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    classes: Vec<RiskCategory>,
    forest: RandomForest,
    metadata: ModelMetadata,
}

impl TrainedModel {
    pub fn new(
        classes: Vec<RiskCategory>,
        forest: RandomForest,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        let model = Self {
            classes,
            forest,
            metadata,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.classes.len() != self.forest.n_classes() {
            return Err(RiskError::InvalidInput(format!(
                "model lists {} classes but the forest was fitted on {}",
                self.classes.len(),
                self.forest.n_classes()
            )));
        }
        let mut seen = self.classes.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.classes.len() {
            return Err(RiskError::InvalidInput(
                "model class list contains duplicates".to_string(),
            ));
        }
        Ok(())
    }

    /// Categories the model can predict, in forest class-id order
    pub fn classes(&self) -> &[RiskCategory] {
        &self.classes
    }

    /// Categories absent from training; these always receive zero confidence
    pub fn missing_classes(&self) -> Vec<RiskCategory> {
        RiskCategory::ALL
            .iter()
            .copied()
            .filter(|c| !self.classes.contains(c))
            .collect()
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub(crate) fn metadata_mut(&mut self) -> &mut ModelMetadata {
        &mut self.metadata
    }

    /// Per-class probabilities, paired with their category
    pub fn predict_proba(&self, features: &Features) -> Result<Vec<(RiskCategory, f64)>> {
        let proba = self.forest.predict_proba(&features.to_array())?;
        Ok(self.classes.iter().copied().zip(proba).collect())
    }

    pub fn predict(&self, features: &Features) -> Result<RiskCategory> {
        let proba = self.forest.predict_proba(&features.to_array())?;
        Ok(self.classes[argmax(&proba)])
    }

    /// Predicted category and per-class probabilities from a single forest pass
    pub fn classify(&self, features: &Features) -> Result<(RiskCategory, Vec<(RiskCategory, f64)>)> {
        let proba = self.forest.predict_proba(&features.to_array())?;
        let predicted = self.classes[argmax(&proba)];
        Ok((predicted, self.classes.iter().copied().zip(proba).collect()))
    }

    /// Write the model as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        info!(
            path = %path.display(),
            trees = self.forest.trees().len(),
            "Saved model"
        );
        Ok(())
    }

    /// Read a model written by [`TrainedModel::save`]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RiskError::ModelNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let model: TrainedModel = serde_json::from_reader(reader)?;
        model.validate()?;
        debug!(
            path = %path.display(),
            classes = model.classes.len(),
            trained_at = %model.metadata.trained_at,
            "Loaded model"
        );
        Ok(model)
    }
}
