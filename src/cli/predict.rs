// src/cli/predict.rs
// One-shot prediction from the terminal

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use super::PredictArgs;
use crate::config::HydroriskConfig;
use crate::dataset::Features;
use crate::error::RiskError;
use crate::predictor::Predictor;

/// Print range warnings, then the prediction, advice and confidence scores.
///
/// Missing artifacts are reported on `out` and are not an error.
pub fn run_predict<W: Write>(args: &PredictArgs, config: &HydroriskConfig, out: &mut W) -> Result<()> {
    let features = Features::new(args.ph, args.turbidity, args.tds);
    for warning in features.out_of_range() {
        writeln!(out, "Warning: {}", warning.message())?;
    }

    let paths = args.artifacts.resolve(config);
    let predictor = match Predictor::load(&paths) {
        Ok(predictor) => predictor,
        Err(RiskError::ModelNotFound(path)) => {
            debug!(path = %path.display(), "Artifact missing");
            writeln!(
                out,
                "Error: Model files not found. Please run the train command first."
            )?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let result = predictor.predict(features)?;

    writeln!(out)?;
    writeln!(out, "Predicted Disease Risk: {}", result.predicted_risk)?;
    writeln!(out, "Advice: {}", result.advice)?;
    writeln!(out)?;
    writeln!(out, "Confidence Scores:")?;
    for (label, score) in &result.confidence_scores {
        writeln!(out, "  {}: {:.3}", label, score)?;
    }
    Ok(())
}
