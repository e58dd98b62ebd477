//! CLI entry point for the knapsack checker.
//!
//! Usage:
//!   knapsack-checker optimize [FILE] [options]
//!   knapsack-checker verify <CLAIMED_VALUE> [INDICES]... [options]
//!   knapsack-checker benchmark [FILE] [options]
//!
//! Both commands read the problem instance from standard input unless a file
//! is given. The text format is `n capacity` followed by `n` lines of
//! `value weight`. `--output` writes what would go to stdout into a file.
//!
//! Exit codes: 0 success, 1 candidate rejected, 2 bad input or limits.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use knapsack_checker::optimizer::DEFAULT_MAX_TABLE_CELLS;
use knapsack_checker::{
    optimize_with_config, run_benchmark, verify_with_config, Accept, BenchmarkConfig, Candidate,
    OptimizerConfig, ProblemInstance, RejectReason, VerifierConfig,
};

#[derive(Parser)]
#[command(name = "knapsack-checker")]
#[command(about = "0/1 knapsack optimizer and solution verifier")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write results to this file instead of stdout
    #[arg(short, long, global = true, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the maximum value that fits in the knapsack
    Optimize {
        /// Path to the problem instance (reads stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Input format of the problem instance
        #[arg(long, value_enum, default_value = "text")]
        format: InputFormat,

        /// Largest DP table to allocate, in cells
        #[arg(long, default_value_t = DEFAULT_MAX_TABLE_CELLS)]
        max_table_cells: usize,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a claimed value and item selection against an instance
    Verify {
        /// Value the candidate claims to reach
        #[arg(value_name = "CLAIMED_VALUE")]
        claimed_value: u64,

        /// Indices of the selected items
        #[arg(value_name = "INDICES")]
        indices: Vec<usize>,

        /// Path to the problem instance (reads stdin when omitted)
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Input format of the problem instance
        #[arg(long, value_enum, default_value = "text")]
        format: InputFormat,

        /// Accept candidates that pick an item more than once
        #[arg(long)]
        allow_duplicates: bool,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Time repeated optimizer runs and print statistics as JSON
    Benchmark {
        /// Path to the problem instance (reads stdin when omitted)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Input format of the problem instance
        #[arg(long, value_enum, default_value = "text")]
        format: InputFormat,

        /// Number of timed runs
        #[arg(long, default_value = "100")]
        iterations: usize,

        /// Number of untimed runs before sampling
        #[arg(long, default_value = "3")]
        warmup: usize,

        /// Largest DP table to allocate, in cells
        #[arg(long, default_value_t = DEFAULT_MAX_TABLE_CELLS)]
        max_table_cells: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputFormat {
    Text,
    Json,
}

/// Output format for verification result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerificationOutput {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_weight: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_value: Option<u64>,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    setup_logging(cli.verbose)?;
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Optimize {
            file,
            format,
            max_table_cells,
            json,
        } => {
            let instance = load_instance(file.as_deref(), format)?;
            let config = OptimizerConfig { max_table_cells };

            let result = optimize_with_config(&instance, &config)
                .context("Failed to optimize instance")?;
            info!(
                max_value = result.max_value,
                items = instance.len(),
                skipped = result.items_skipped,
                cells = result.table_cells,
                elapsed_ms = result.time_elapsed_ms,
                "Optimization finished"
            );

            if json {
                emit(output, &serde_json::to_string_pretty(&result)?)?;
            } else {
                emit(output, &result.max_value.to_string())?;
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Verify {
            claimed_value,
            indices,
            input,
            format,
            allow_duplicates,
            json,
        } => {
            let instance = load_instance(input.as_deref(), format)?;
            let candidate = Candidate::new(claimed_value, indices);
            let config = VerifierConfig { allow_duplicates };

            let verdict = verify_with_config(&instance, &candidate, &config);
            let formatted = format_verdict(&verdict);

            if json {
                emit(output, &serde_json::to_string_pretty(&formatted)?)?;
            } else if let Some(message) = &formatted.message {
                emit(output, message)?;
            }

            match verdict {
                Ok(accept) => {
                    info!(
                        weight = accept.total_weight,
                        value = accept.total_value,
                        "Candidate accepted"
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(reason) => {
                    info!(reason = reason.tag(), "Candidate rejected");
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Benchmark {
            file,
            format,
            iterations,
            warmup,
            max_table_cells,
        } => {
            let instance = load_instance(file.as_deref(), format)?;
            let config = BenchmarkConfig {
                iterations,
                warmup,
                optimizer: OptimizerConfig { max_table_cells },
            };

            let result = run_benchmark(&instance, &config).context("Benchmark failed")?;
            info!(
                iterations,
                mean_ns = result.timing.mean_ns,
                median_ns = result.timing.median_ns,
                "Benchmark finished"
            );

            emit(output, &serde_json::to_string_pretty(&result)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print a result line to stdout, or write it to the output file
fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{text}\n"))
            .with_context(|| format!("Failed to write output to {:?}", path)),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn load_instance(path: Option<&Path>, format: InputFormat) -> Result<ProblemInstance> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("Failed to open instance file {:?}", path))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let instance = match format {
        InputFormat::Text => ProblemInstance::from_reader(reader),
        InputFormat::Json => ProblemInstance::from_json_reader(reader),
    }
    .context("Failed to load problem instance")?;

    Ok(instance)
}

fn format_verdict(verdict: &std::result::Result<Accept, RejectReason>) -> VerificationOutput {
    match verdict {
        Ok(accept) => VerificationOutput {
            valid: true,
            reason: None,
            message: None,
            total_weight: Some(accept.total_weight),
            total_value: Some(accept.total_value),
        },
        Err(reason) => VerificationOutput {
            valid: false,
            reason: Some(reason.tag()),
            message: Some(reason.to_string()),
            total_weight: match reason {
                RejectReason::WeightLimitExceeded(weight) => Some(*weight),
                _ => None,
            },
            total_value: match reason {
                RejectReason::ValueMismatch { actual, .. } => Some(*actual),
                _ => None,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_accepted_verdict() {
        let verdict = Ok(Accept {
            total_weight: 50,
            total_value: 220,
            items: 2,
        });
        let json = serde_json::to_value(format_verdict(&verdict)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"valid": true, "totalWeight": 50, "totalValue": 220})
        );
    }

    #[test]
    fn test_format_weight_rejection() {
        let verdict = Err(RejectReason::WeightLimitExceeded(60));
        let json = serde_json::to_value(format_verdict(&verdict)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": false,
                "reason": "weight_limit_exceeded",
                "message": "Weight limit exceeded: 60",
                "totalWeight": 60
            })
        );
    }

    #[test]
    fn test_format_value_rejection() {
        let verdict = Err(RejectReason::ValueMismatch {
            claimed: 200,
            actual: 220,
        });
        let json = serde_json::to_value(format_verdict(&verdict)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "valid": false,
                "reason": "value_mismatch",
                "message": "Incorrect value",
                "totalValue": 220
            })
        );
    }

    #[test]
    fn test_format_index_rejection() {
        let verdict = Err(RejectReason::IndexOutOfRange { index: 7, len: 3 });
        let output = format_verdict(&verdict);
        assert!(!output.valid);
        assert_eq!(output.reason, Some("index_out_of_range"));
        assert_eq!(output.total_weight, None);
        assert_eq!(output.total_value, None);
    }

    #[test]
    fn test_cli_parses_verify_arguments() {
        let cli = Cli::try_parse_from([
            "knapsack-checker",
            "verify",
            "220",
            "1",
            "2",
            "--allow-duplicates",
            "-o",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        match cli.command {
            Commands::Verify {
                claimed_value,
                indices,
                allow_duplicates,
                ..
            } => {
                assert_eq!(claimed_value, 220);
                assert_eq!(indices, vec![1, 2]);
                assert!(allow_duplicates);
            }
            _ => panic!("expected verify command"),
        }
    }
}
