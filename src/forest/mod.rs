// src/forest/mod.rs
// Random forest classifier with bootstrap sampling and class weighting

pub mod tree;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RiskError};
use tree::{DecisionTree, TreeLimits};

/// How training samples are weighted by class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// Every sample weighs 1
    Uniform,
    /// Weight inversely proportional to class frequency:
    /// `n_samples / (n_present_classes * class_count)`
    #[default]
    Balanced,
}

/// Hyperparameters for fitting a [`RandomForest`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub class_weight: ClassWeight,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: None,
            min_samples_split: 2,
            class_weight: ClassWeight::Balanced,
            seed: 42,
        }
    }
}

impl ForestParams {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            ..Self::default()
        }
    }

    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit a forest on rows `x` with class ids `y` in `0..n_classes`.
    ///
    /// Tree `i` is grown from its own RNG seeded with `seed + i`, so results
    /// are reproducible for a given seed.
    pub fn fit(&self, x: &[Vec<f64>], y: &[usize], n_classes: usize) -> Result<RandomForest> {
        if x.is_empty() {
            return Err(RiskError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(RiskError::InvalidInput(format!(
                "feature rows ({}) and labels ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if self.n_estimators == 0 {
            return Err(RiskError::InvalidInput(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(RiskError::InvalidInput(
                "feature rows must share a non-zero width".to_string(),
            ));
        }
        if let Some(bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(RiskError::InvalidInput(format!(
                "class id {bad} out of range for {n_classes} classes"
            )));
        }

        let class_weights = self.class_weights(y, n_classes);
        let limits = TreeLimits {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: ((n_features as f64).sqrt().floor() as usize).max(1),
        };

        let n_samples = y.len();
        let mut trees = Vec::with_capacity(self.n_estimators);
        for i in 0..self.n_estimators {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(i as u64));

            let mut weights = vec![0.0; n_samples];
            for _ in 0..n_samples {
                let idx = rng.random_range(0..n_samples);
                weights[idx] += 1.0;
            }
            for (w, &class) in weights.iter_mut().zip(y) {
                *w *= class_weights[class];
            }

            trees.push(DecisionTree::fit(x, y, &weights, n_classes, limits, &mut rng));
        }

        debug!(
            n_estimators = self.n_estimators,
            n_samples,
            n_features,
            n_classes,
            "Fitted random forest"
        );

        Ok(RandomForest {
            params: self.clone(),
            n_classes,
            n_features,
            trees,
        })
    }

    fn class_weights(&self, y: &[usize], n_classes: usize) -> Vec<f64> {
        match self.class_weight {
            ClassWeight::Uniform => vec![1.0; n_classes],
            ClassWeight::Balanced => {
                let mut counts = vec![0usize; n_classes];
                for &c in y {
                    counts[c] += 1;
                }
                let present = counts.iter().filter(|&&c| c > 0).count() as f64;
                let n = y.len() as f64;
                counts
                    .iter()
                    .map(|&c| if c == 0 { 0.0 } else { n / (present * c as f64) })
                    .collect()
            }
        }
    }
}

/// A fitted ensemble of decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    n_classes: usize,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Mean of the per-tree leaf distributions, indexed by class id
    pub fn predict_proba(&self, sample: &[f64]) -> Result<Vec<f64>> {
        if sample.len() != self.n_features {
            return Err(RiskError::InvalidInput(format!(
                "expected {} features, got {}",
                self.n_features,
                sample.len()
            )));
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, v) in proba.iter_mut().zip(tree.predict_proba(sample)) {
                *p += v;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    /// Most probable class id; ties go to the lowest id
    pub fn predict(&self, sample: &[f64]) -> Result<usize> {
        let proba = self.predict_proba(sample)?;
        Ok(argmax(&proba))
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
