// src/dataset/mod.rs
// Water-quality samples, plausible ranges and dataset utilities

pub mod split;
pub mod synthetic;

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::risk::RiskCategory;

pub use split::{stratified_split, Split};
pub use synthetic::{generate, is_safe};

/// Number of features per sample
pub const N_FEATURES: usize = 3;

/// The three water-quality measurements fed to the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(rename = "pH")]
    pub ph: f64,
    /// Turbidity in NTU
    pub turbidity: f64,
    /// Total dissolved solids in mg/L
    pub tds: f64,
}

impl Features {
    pub fn new(ph: f64, turbidity: f64, tds: f64) -> Self {
        Self { ph, turbidity, tds }
    }

    /// Feature vector in model column order (pH, turbidity, tds)
    pub fn to_array(&self) -> [f64; N_FEATURES] {
        [self.ph, self.turbidity, self.tds]
    }

    /// Measurements outside the documented plausible ranges
    pub fn out_of_range(&self) -> Vec<RangeWarning> {
        let ranges = FeatureRanges::PLAUSIBLE;
        let mut warnings = Vec::new();
        if !ranges.ph.contains(&self.ph) {
            warnings.push(RangeWarning::Ph);
        }
        if !ranges.turbidity.contains(&self.turbidity) {
            warnings.push(RangeWarning::Turbidity);
        }
        if !ranges.tds.contains(&self.tds) {
            warnings.push(RangeWarning::Tds);
        }
        warnings
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::new(7.0, 1.0, 300.0)
    }
}

/// A soft range violation on one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeWarning {
    Ph,
    Turbidity,
    Tds,
}

impl RangeWarning {
    pub fn message(&self) -> &'static str {
        match self {
            RangeWarning::Ph => "pH value should be between 5.0 and 9.5",
            RangeWarning::Turbidity => "Turbidity should be between 0 and 30 NTU",
            RangeWarning::Tds => "TDS should be between 100 and 2000 mg/L",
        }
    }
}

/// Value ranges for each measurement
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRanges {
    pub ph: RangeInclusive<f64>,
    pub turbidity: RangeInclusive<f64>,
    pub tds: RangeInclusive<f64>,
}

impl FeatureRanges {
    /// Ranges the synthetic data is drawn from; inputs outside them are only warned about.
    pub const PLAUSIBLE: FeatureRanges = FeatureRanges {
        ph: 5.0..=9.5,
        turbidity: 0.0..=30.0,
        tds: 100.0..=2000.0,
    };
}

/// A labelled training sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub features: Features,
    pub label: RiskCategory,
}

/// Count of samples per category, including categories with zero samples
pub fn class_distribution(samples: &[Sample]) -> BTreeMap<RiskCategory, usize> {
    let mut counts: BTreeMap<RiskCategory, usize> =
        RiskCategory::ALL.iter().map(|c| (*c, 0)).collect();
    for sample in samples {
        *counts.entry(sample.label).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_features_match_service_defaults() {
        let f = Features::default();
        assert_eq!(f.to_array(), [7.0, 1.0, 300.0]);
    }

    #[test]
    fn test_features_serialize_with_ph_key() {
        let json = serde_json::to_value(Features::new(7.5, 2.0, 450.0)).unwrap();
        assert_eq!(json["pH"], 7.5);
        assert_eq!(json["turbidity"], 2.0);
        assert_eq!(json["tds"], 450.0);
    }

    #[test]
    fn test_out_of_range_flags_each_measurement() {
        assert!(Features::new(7.0, 1.0, 300.0).out_of_range().is_empty());
        assert_eq!(
            Features::new(100.0, 1.0, 300.0).out_of_range(),
            vec![RangeWarning::Ph]
        );
        assert_eq!(
            Features::new(4.0, -1.0, 5000.0).out_of_range(),
            vec![RangeWarning::Ph, RangeWarning::Turbidity, RangeWarning::Tds]
        );
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(Features::new(5.0, 0.0, 100.0).out_of_range().is_empty());
        assert!(Features::new(9.5, 30.0, 2000.0).out_of_range().is_empty());
    }

    #[test]
    fn test_class_distribution_includes_empty_classes() {
        let samples = vec![
            Sample {
                features: Features::default(),
                label: RiskCategory::Safe,
            },
            Sample {
                features: Features::default(),
                label: RiskCategory::Safe,
            },
        ];
        let counts = class_distribution(&samples);
        assert_eq!(counts.len(), 6);
        assert_eq!(counts[&RiskCategory::Safe], 2);
        assert_eq!(counts[&RiskCategory::MetalLeachingRisk], 0);
    }
}
