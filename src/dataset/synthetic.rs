// src/dataset/synthetic.rs
// Seeded synthetic water-quality dataset

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{FeatureRanges, Features, Sample};
use crate::risk::RiskCategory;

/// Whether a sample falls inside the safe drinking-water box:
/// pH in [6.5, 8.5], turbidity below 5 NTU and TDS in [200, 800] mg/L.
pub fn is_safe(features: &Features) -> bool {
    (6.5..=8.5).contains(&features.ph)
        && features.turbidity < 5.0
        && (200.0..=800.0).contains(&features.tds)
}

/// Label a sample: Safe inside the safe box, otherwise a uniform pick among
/// the unsafe categories.
///
/// The unsafe pick ignores which thresholds were violated and by how much, so
/// the five unsafe classes are indistinguishable from the features alone. A
/// model trained on this data can separate Safe from unsafe but has no signal
/// for choosing between the unsafe categories.
pub fn label_for<R: Rng + ?Sized>(features: &Features, rng: &mut R) -> RiskCategory {
    if is_safe(features) {
        RiskCategory::Safe
    } else {
        RiskCategory::UNSAFE[rng.random_range(0..RiskCategory::UNSAFE.len())]
    }
}

/// Generate `n` samples with features drawn uniformly from the plausible ranges.
///
/// Output is fully determined by `seed`.
pub fn generate(n: usize, seed: u64) -> Vec<Sample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let ranges = FeatureRanges::PLAUSIBLE;

    // Draw every column first, then the labels, so the feature columns do
    // not depend on how many unsafe picks happened before them.
    let ph: Vec<f64> = (0..n)
        .map(|_| rng.random_range(*ranges.ph.start()..*ranges.ph.end()))
        .collect();
    let turbidity: Vec<f64> = (0..n)
        .map(|_| rng.random_range(*ranges.turbidity.start()..*ranges.turbidity.end()))
        .collect();
    let tds: Vec<f64> = (0..n)
        .map(|_| rng.random_range(*ranges.tds.start()..*ranges.tds.end()))
        .collect();

    let samples: Vec<Sample> = (0..n)
        .map(|i| {
            let features = Features::new(ph[i], turbidity[i], tds[i]);
            Sample {
                features,
                label: label_for(&features, &mut rng),
            }
        })
        .collect();

    debug!(n, seed, "Generated synthetic dataset");
    samples
}
