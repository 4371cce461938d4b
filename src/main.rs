use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use ga_connect_four::config::AppConfig;
use ga_connect_four::export::{write_summary, write_weights, RunSummary};
use ga_connect_four::logging::{init_logging, Verbosity};
use ga_connect_four::training::trainer::Trainer;

const DEFAULT_CONFIG: &str = "ga-connect-four.toml";

/// Train a Connect Four network with a genetic algorithm.
#[derive(Parser, Debug)]
#[command(
    name = "ga-connect-four",
    about = "Train a Connect Four network with a genetic algorithm"
)]
struct Cli {
    /// Number of generations to train
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    rounds: u64,

    /// Exploration percentage at the first generation (0-100)
    #[arg(value_parser = clap::value_parser!(u32).range(0..=100))]
    start_percent: u32,

    /// Percentage of the run after which exploration reaches zero (1-100)
    #[arg(value_parser = clap::value_parser!(u32).range(1..=100))]
    stop_percent: u32,

    /// Log every move with its network outputs and the resulting board
    #[arg(short, long, conflicts_with = "silent")]
    verbose: bool,

    /// Only report warnings and errors; no progress bar
    #[arg(short, long)]
    silent: bool,

    /// Path to TOML configuration file [default: ga-connect-four.toml]
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the best agent's weights
    #[arg(long)]
    output: Option<PathBuf>,

    /// Play the matches of each sub-round in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
    }

    /// Apply command-line values on top of the file configuration.
    fn apply_overrides(&self, config: &mut AppConfig) -> Result<()> {
        config.training.rounds =
            usize::try_from(self.rounds).context("rounds does not fit in memory on this platform")?;
        config.training.start_percent = self.start_percent;
        config.training.stop_percent = self.stop_percent;
        if let Some(seed) = self.seed {
            config.training.seed = Some(seed);
        }
        if let Some(output) = &self.output {
            config.export.weights_path = output.clone();
        }
        if self.parallel {
            config.training.parallel = true;
        }
        Ok(())
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_flags(cli.verbose, cli.silent);

    let progress = if verbosity == Verbosity::Normal {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} generations {msg}",
            )
            .context("building progress bar style")?,
        );
        bar
    } else {
        ProgressBar::hidden()
    };
    init_logging(verbosity, &progress).context("installing log subscriber")?;

    // Load configuration; validation waits until the CLI values are in
    let config_path = cli.config_path();
    if cli.config.is_some() && !config_path.exists() {
        warn!("config file '{}' not found, using defaults", config_path.display());
    }
    let mut app_config = AppConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    cli.apply_overrides(&mut app_config)?;

    let trainer = Trainer::new(app_config.clone()).context("invalid training configuration")?;
    progress.set_length(trainer.rounds() as u64);

    let outcome = trainer
        .train_with(|summary| {
            progress.set_message(format!("best fitness {}", summary.best_fitness));
            progress.inc(1);
        })
        .context("training failed")?;
    progress.finish_and_clear();

    let weights_path = &app_config.export.weights_path;
    write_weights(weights_path, outcome.best.weights())
        .with_context(|| format!("writing weights to {}", weights_path.display()))?;
    info!(
        path = %weights_path.display(),
        seed = outcome.seed,
        best_fitness = outcome.best.fitness(),
        "weights written"
    );

    if let Some(summary_path) = &app_config.export.summary_path {
        let summary = RunSummary::new(&app_config, &outcome);
        write_summary(summary_path, &summary)
            .with_context(|| format!("writing run summary to {}", summary_path.display()))?;
        info!(path = %summary_path.display(), "run summary written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ga-connect-four").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positionals_and_defaults() {
        let cli = parse(&["25", "80", "40"]).unwrap();
        assert_eq!(cli.rounds, 25);
        assert_eq!(cli.start_percent, 80);
        assert_eq!(cli.stop_percent, 40);
        assert!(!cli.verbose && !cli.silent && !cli.parallel);
        assert_eq!(cli.config_path(), PathBuf::from(DEFAULT_CONFIG));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_verbose_and_silent_conflict() {
        let err = parse(&["3", "50", "50", "-v", "-s"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(parse(&["3", "50", "50", "-v"]).unwrap().verbose);
        assert!(parse(&["3", "50", "50", "--silent"]).unwrap().silent);
    }

    #[test]
    fn test_ranges_are_enforced() {
        for args in [
            ["0", "50", "50"],
            ["3", "101", "50"],
            ["3", "50", "0"],
            ["3", "50", "101"],
            ["3", "abc", "50"],
        ] {
            let err = parse(&args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{args:?}");
        }
        assert!(parse(&["1", "0", "1"]).is_ok());
        assert!(parse(&["1", "100", "100"]).is_ok());
    }

    #[test]
    fn test_missing_positionals_rejected() {
        let err = parse(&["3", "50"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_overrides_land_in_config() {
        let cli = parse(&[
            "7", "30", "60", "--seed", "99", "--output", "best.txt", "--parallel",
        ])
        .unwrap();
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config).unwrap();

        assert_eq!(config.training.rounds, 7);
        assert_eq!(config.training.start_percent, 30);
        assert_eq!(config.training.stop_percent, 60);
        assert_eq!(config.training.seed, Some(99));
        assert!(config.training.parallel);
        assert_eq!(config.export.weights_path, PathBuf::from("best.txt"));
        config.validate().unwrap();
    }

    #[test]
    fn test_cli_values_replace_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[training]\nstop_percent = 0\nseed = 5\n").unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = parse(&["3", "50", "50", "--config", path_arg]).unwrap();
        assert_eq!(cli.config_path(), path);
        let mut config = AppConfig::load_or_default(&cli.config_path()).unwrap();
        cli.apply_overrides(&mut config).unwrap();

        assert_eq!(config.training.stop_percent, 50);
        assert_eq!(config.training.seed, Some(5), "unset flags keep file values");
        assert!(Trainer::new(config).is_ok());
    }
}
