// src/lib.rs
// hydrorisk - water-quality disease-risk classification

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod forest;
pub mod model;
pub mod predictor;
pub mod risk;
pub mod server;
pub mod trainer;

pub use dataset::Features;
pub use error::{Result, RiskError};
pub use predictor::{PredictionResult, Predictor};
pub use risk::{AdviceTable, RiskCategory};
