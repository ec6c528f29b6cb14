// src/cli/mod.rs
// CLI module for hydrorisk commands

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::config::HydroriskConfig;
use crate::trainer::ArtifactPaths;

pub mod predict;
pub mod serve;
pub mod train;

pub use predict::run_predict;
pub use serve::run_serve;
pub use train::run_train;

#[derive(Parser, Debug)]
#[command(name = "hydrorisk")]
#[command(about = "Water-quality disease-risk classifier")]
#[command(version)]
pub struct Cli {
    /// Config file (default: $HYDRORISK_CONFIG or ~/.hydrorisk/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic data, train the classifier and save the artifacts
    Train(TrainArgs),

    /// Run the prediction HTTP API
    Serve(ServeArgs),

    /// Predict disease risk for one set of measurements
    Predict(PredictArgs),
}

/// Artifact location overrides shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// Model file path
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Label-to-advice JSON path
    #[arg(long)]
    pub advice: Option<PathBuf>,
}

impl ArtifactArgs {
    /// Flags win over configuration
    pub fn resolve(&self, config: &HydroriskConfig) -> ArtifactPaths {
        let base = config.artifacts.paths();
        ArtifactPaths {
            model: self.model.clone().unwrap_or(base.model),
            advice: self.advice.clone().unwrap_or(base.advice),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Number of synthetic samples
    #[arg(long)]
    pub samples: Option<usize>,

    /// Random seed for generation, splitting and fitting
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of trees in the forest
    #[arg(long)]
    pub estimators: Option<usize>,

    /// Fraction of samples held out for evaluation
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Maximum tree depth (default: unlimited)
    #[arg(long)]
    pub max_depth: Option<usize>,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    /// pH value (5.0-9.5)
    #[arg(long = "pH", allow_negative_numbers = true)]
    pub ph: f64,

    /// Turbidity in NTU (0-30)
    #[arg(long, allow_negative_numbers = true)]
    pub turbidity: f64,

    /// TDS in mg/L (100-2000)
    #[arg(long, allow_negative_numbers = true)]
    pub tds: f64,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl Commands {
    /// Log level used when HYDRORISK_LOG is not set
    pub fn default_log_level(&self) -> Level {
        match self {
            Commands::Train(_) | Commands::Serve(_) => Level::INFO,
            // Keep terminal output clean for one-shot predictions
            Commands::Predict(_) => Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_predict_flags() {
        let cli = Cli::try_parse_from([
            "hydrorisk",
            "predict",
            "--pH",
            "7.2",
            "--turbidity",
            "1",
            "--tds",
            "300",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict(args) => {
                assert_eq!(args.ph, 7.2);
                assert_eq!(args.turbidity, 1.0);
                assert_eq!(args.tds, 300.0);
                assert!(args.artifacts.model.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_predict_requires_all_measurements() {
        assert!(Cli::try_parse_from(["hydrorisk", "predict", "--pH", "7"]).is_err());
        assert!(
            Cli::try_parse_from(["hydrorisk", "predict", "--pH", "x", "--turbidity", "1", "--tds", "2"])
                .is_err()
        );
    }

    #[test]
    fn test_predict_accepts_negative_values() {
        let cli = Cli::try_parse_from([
            "hydrorisk",
            "predict",
            "--pH",
            "7",
            "--turbidity",
            "-1",
            "--tds",
            "300",
        ])
        .unwrap();
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.turbidity, -1.0);
    }

    #[test]
    fn test_parse_train_and_serve() {
        let cli = Cli::try_parse_from([
            "hydrorisk",
            "--config",
            "cfg.toml",
            "train",
            "--samples",
            "500",
            "--model",
            "out/model.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
        let Commands::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.samples, Some(500));
        assert_eq!(args.artifacts.model, Some(PathBuf::from("out/model.json")));

        let cli = Cli::try_parse_from(["hydrorisk", "serve", "-p", "8080"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(8080));
    }

    #[test]
    fn test_artifact_flags_override_config() {
        let config = HydroriskConfig::default();
        let args = ArtifactArgs {
            model: Some(PathBuf::from("m.json")),
            advice: None,
        };
        let paths = args.resolve(&config);
        assert_eq!(paths.model, PathBuf::from("m.json"));
        assert_eq!(paths.advice, PathBuf::from("label_to_advice.json"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
