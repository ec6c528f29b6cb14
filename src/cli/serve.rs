// src/cli/serve.rs
// Start the prediction API

use anyhow::{Context, Result};
use tracing::info;

use super::ServeArgs;
use crate::config::HydroriskConfig;
use crate::predictor::Predictor;
use crate::server;

/// Load the artifacts, then serve. A failed load aborts startup.
pub async fn run_serve(args: &ServeArgs, config: &HydroriskConfig) -> Result<()> {
    let paths = args.artifacts.resolve(config);
    let predictor = Predictor::load(&paths).with_context(|| {
        format!(
            "failed to load model artifacts ({}, {})",
            paths.model.display(),
            paths.advice.display()
        )
    })?;

    let host = args.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    info!(
        classes = predictor.model().classes().len(),
        test_accuracy = ?predictor.model().metadata().test_accuracy,
        "Model ready"
    );

    server::serve(predictor, &host, port).await
}
