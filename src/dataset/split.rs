// src/dataset/split.rs
// Stratified train/test split

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::Sample;
use crate::error::{Result, RiskError};
use crate::risk::RiskCategory;

/// Train and test partitions of a dataset
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Vec<Sample>,
    pub test: Vec<Sample>,
}

/// Split samples so each category keeps its share in both partitions.
///
/// Each category contributes `round(count * test_fraction)` samples to the
/// test set. Both partitions are shuffled; output is determined by `seed`.
pub fn stratified_split(samples: &[Sample], test_fraction: f64, seed: u64) -> Result<Split> {
    if samples.is_empty() {
        return Err(RiskError::EmptyDataset);
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(RiskError::InvalidInput(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut by_class: BTreeMap<RiskCategory, Vec<Sample>> = BTreeMap::new();
    for sample in samples {
        by_class.entry(sample.label).or_default().push(*sample);
    }

    let mut train = Vec::with_capacity(samples.len());
    let mut test = Vec::new();
    for (_, mut group) in by_class {
        group.shuffle(&mut rng);
        let n_test = ((group.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.min(group.len());
        let rest = group.split_off(n_test);
        test.extend(group);
        train.extend(rest);
    }

    train.shuffle(&mut rng);
    test.shuffle(&mut rng);
    Ok(Split { train, test })
}
