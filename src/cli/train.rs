// src/cli/train.rs
// Train the classifier and write its artifacts

use std::io::Write;

use anyhow::Result;

use super::TrainArgs;
use crate::config::HydroriskConfig;
use crate::trainer::{self, TrainingConfig, TrainingReport};

/// Training configuration with command-line flags layered over the config file
pub fn training_config(args: &TrainArgs, config: &HydroriskConfig) -> TrainingConfig {
    let mut training = config.training.clone();
    if let Some(n) = args.samples {
        training.n_samples = n;
    }
    if let Some(seed) = args.seed {
        training.seed = seed;
    }
    if let Some(n) = args.estimators {
        training.n_estimators = n;
    }
    if let Some(fraction) = args.test_fraction {
        training.test_fraction = fraction;
    }
    if args.max_depth.is_some() {
        training.max_depth = args.max_depth;
    }
    training
}

pub fn run_train<W: Write>(args: &TrainArgs, config: &HydroriskConfig, out: &mut W) -> Result<()> {
    let training = training_config(args, config);
    let paths = args.artifacts.resolve(config);

    let outcome = trainer::train(&training)?;
    trainer::persist(&outcome, &paths)?;

    writeln!(out, "Model and advice mapping saved successfully!")?;
    writeln!(out, "  model:  {}", paths.model.display())?;
    writeln!(out, "  advice: {}", paths.advice.display())?;
    print_report(&outcome.report, out)?;
    Ok(())
}

fn print_report<W: Write>(report: &TrainingReport, out: &mut W) -> Result<()> {
    writeln!(out, "Class distribution:")?;
    for (label, count) in &report.class_distribution {
        writeln!(out, "  {label}: {count}")?;
    }

    writeln!(
        out,
        "Held-out evaluation ({} train / {} test): accuracy {:.3}",
        report.n_train, report.n_test, report.evaluation.accuracy
    )?;
    for (label, m) in &report.evaluation.per_class {
        writeln!(
            out,
            "  {label}: precision {:.3} recall {:.3} support {}",
            m.precision, m.recall, m.support
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ArtifactArgs;

    #[test]
    fn test_flags_override_file_training_config() {
        let mut config = HydroriskConfig::default();
        config.training.n_estimators = 10;
        config.training.seed = 5;

        let args = TrainArgs {
            samples: Some(100),
            seed: None,
            estimators: Some(3),
            test_fraction: None,
            max_depth: Some(4),
            artifacts: ArtifactArgs::default(),
        };
        let training = training_config(&args, &config);
        assert_eq!(training.n_samples, 100);
        assert_eq!(training.n_estimators, 3);
        assert_eq!(training.seed, 5);
        assert_eq!(training.max_depth, Some(4));
    }
}
