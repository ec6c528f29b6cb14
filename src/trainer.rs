// src/trainer.rs
// Training pipeline: generate -> stratified split -> fit -> evaluate -> persist

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::{self, Sample};
use crate::error::{Result, RiskError};
use crate::forest::{ClassWeight, ForestParams};
use crate::model::{ModelMetadata, TrainedModel};
use crate::risk::{AdviceTable, RiskCategory};

/// Knobs for a training run. Defaults reproduce the reference pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub n_samples: usize,
    pub seed: u64,
    pub test_fraction: f64,
    pub n_estimators: usize,
    pub class_weight: ClassWeight,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_samples: 2000,
            seed: 42,
            test_fraction: 0.2,
            n_estimators: 200,
            class_weight: ClassWeight::Balanced,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

impl TrainingConfig {
    fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            class_weight: self.class_weight,
            seed: self.seed,
        }
    }
}

/// Precision/recall for one category on the held-out split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub support: usize,
}

/// Held-out evaluation results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub per_class: BTreeMap<RiskCategory, ClassMetrics>,
}

/// Summary of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub class_distribution: BTreeMap<RiskCategory, usize>,
    pub n_train: usize,
    pub n_test: usize,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub advice: AdviceTable,
    pub report: TrainingReport,
}

/// Where the trained artifacts are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub advice: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("water_model.json"),
            advice: PathBuf::from("label_to_advice.json"),
        }
    }
}

/// Run the full pipeline on a freshly generated synthetic dataset
pub fn train(config: &TrainingConfig) -> Result<TrainingOutcome> {
    let samples = dataset::generate(config.n_samples, config.seed);
    train_on(&samples, config)
}

/// Split, fit and evaluate on the given samples.
///
/// Fails with [`RiskError::MissingClasses`] when the training split does not
/// cover every category, so the model's classes always match the advice table.
pub fn train_on(samples: &[Sample], config: &TrainingConfig) -> Result<TrainingOutcome> {
    let class_distribution = dataset::class_distribution(samples);
    let split = dataset::stratified_split(samples, config.test_fraction, config.seed)?;

    let train_counts = dataset::class_distribution(&split.train);
    let missing: Vec<RiskCategory> = train_counts
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(c, _)| *c)
        .collect();
    if !missing.is_empty() {
        return Err(RiskError::MissingClasses(missing));
    }

    let classes = RiskCategory::ALL.to_vec();
    let (x, y) = to_matrix(&split.train);

    info!(
        n_train = split.train.len(),
        n_test = split.test.len(),
        n_estimators = config.n_estimators,
        seed = config.seed,
        "Fitting random forest"
    );
    let forest = config.forest_params().fit(&x, &y, classes.len())?;

    let metadata = ModelMetadata {
        trained_at: Utc::now(),
        n_train: split.train.len(),
        n_test: split.test.len(),
        test_accuracy: None,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let mut model = TrainedModel::new(classes, forest, metadata)?;

    let evaluation = evaluate(&model, &split.test)?;
    if split.test.is_empty() {
        warn!("Held-out split is empty; skipping evaluation");
    } else {
        model.metadata_mut().test_accuracy = Some(evaluation.accuracy);
        info!(accuracy = evaluation.accuracy, "Held-out evaluation");
    }

    Ok(TrainingOutcome {
        model,
        advice: AdviceTable::standard(),
        report: TrainingReport {
            class_distribution,
            n_train: split.train.len(),
            n_test: split.test.len(),
            evaluation,
        },
    })
}

/// Write the model and advice table to their artifact paths
pub fn persist(outcome: &TrainingOutcome, paths: &ArtifactPaths) -> Result<()> {
    outcome.model.save(&paths.model)?;
    outcome.advice.save(&paths.advice)?;
    info!(
        model = %paths.model.display(),
        advice = %paths.advice.display(),
        "Model and advice mapping saved"
    );
    Ok(())
}

/// Accuracy and per-class precision/recall of `model` on `samples`
pub fn evaluate(model: &TrainedModel, samples: &[Sample]) -> Result<Evaluation> {
    let mut support: BTreeMap<RiskCategory, usize> = BTreeMap::new();
    let mut predicted: BTreeMap<RiskCategory, usize> = BTreeMap::new();
    let mut hits: BTreeMap<RiskCategory, usize> = BTreeMap::new();

    for sample in samples {
        let prediction = model.predict(&sample.features)?;
        *support.entry(sample.label).or_default() += 1;
        *predicted.entry(prediction).or_default() += 1;
        if prediction == sample.label {
            *hits.entry(sample.label).or_default() += 1;
        }
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let correct: usize = hits.values().sum();

    let per_class = RiskCategory::ALL
        .iter()
        .map(|c| {
            let tp = hits.get(c).copied().unwrap_or(0);
            let n = support.get(c).copied().unwrap_or(0);
            let metrics = ClassMetrics {
                precision: ratio(tp, predicted.get(c).copied().unwrap_or(0)),
                recall: ratio(tp, n),
                support: n,
            };
            (*c, metrics)
        })
        .collect();

    Ok(Evaluation {
        accuracy: ratio(correct, samples.len()),
        per_class,
    })
}

fn to_matrix(samples: &[Sample]) -> (Vec<Vec<f64>>, Vec<usize>) {
    samples
        .iter()
        .map(|s| (s.features.to_array().to_vec(), s.label.index()))
        .unzip()
}
