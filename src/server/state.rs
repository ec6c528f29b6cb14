// src/server/state.rs
// Web server state: the immutable inference context shared by all handlers

use std::sync::Arc;

use crate::predictor::Predictor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Model and advice table, loaded once at startup and never mutated
    pub predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }
}
