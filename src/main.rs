use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use spotlight::config::{LoggingConfig, ResolvedConfig, SpotlightConfig};
use spotlight::demo::{self, ScriptEntry};
use spotlight::stats::QueueStats;

#[derive(Parser)]
#[command(
    name = "spotlight",
    about = "Priority-ordered presentation queue with a single-active orchestrator",
    version,
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file (default: $SPOTLIGHT_CONFIG, then /etc/spotlight/spotlight.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dequeue order of a list of `tier:label` submissions
    Order {
        /// Submissions, e.g. `high:saved normal:synced deferred:tip`
        #[arg(required = true)]
        entries: Vec<ScriptEntry>,

        /// Queue capacity (overrides config)
        #[arg(long)]
        capacity: Option<usize>,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Play a script through the orchestrator with a console renderer
    Demo {
        /// Submissions to play (default: a mixed-tier script)
        entries: Vec<ScriptEntry>,

        /// How long each presentation stays up, in milliseconds
        #[arg(long, default_value = "200")]
        hold_ms: u64,

        /// Settle delay between presentations (overrides config)
        #[arg(long)]
        settle_ms: Option<u64>,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_stats(stats: &QueueStats) {
    println!("{:<10} | Pending", "Tier");
    println!("{:-<10}-|-{:-<7}", "", "");
    for (tier, count) in stats.by_tier.iter().rev() {
        println!("{:<10} | {}", tier, count);
    }
    println!(
        "Total: {} / {}{}",
        stats.total,
        stats.capacity,
        if stats.at_capacity { " (at capacity)" } else { "" }
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let resolved = match &cli.config {
        Some(path) => ResolvedConfig::explicit(path)?,
        None => SpotlightConfig::resolve(),
    };
    init_tracing(&resolved.config.logging);
    resolved.log();
    let config = resolved.config;

    match cli.command {
        Commands::Order {
            entries,
            capacity,
            json,
        } => {
            let capacity = capacity.unwrap_or(config.orchestrator.capacity);
            tracing::debug!(count = entries.len(), capacity, "ordering submissions");
            let report = demo::order(&entries, capacity).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for entry in &report.rejected {
                    println!("rejected (queue full): {}", entry);
                }
                println!("Dequeue order:");
                for (i, entry) in report.order.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, entry);
                }
            }
        }
        Commands::Demo {
            entries,
            hold_ms,
            settle_ms,
            json,
        } => {
            let mut orchestrator = config.orchestrator.clone();
            if let Some(ms) = settle_ms {
                orchestrator.settle_delay_ms = ms;
            }
            let script = if entries.is_empty() {
                demo::default_script()
            } else {
                entries
            };

            tracing::info!(
                items = script.len(),
                hold_ms,
                settle_ms = orchestrator.settle_delay_ms,
                "starting demo"
            );
            let report =
                demo::run(&orchestrator, &script, Duration::from_millis(hold_ms)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n=== Queue after submission ===");
                print_stats(&report.peak);
                for entry in &report.rejected {
                    println!("rejected (queue full): {}", entry);
                }
                println!("\n=== Presentation order ===");
                for (i, entry) in report.presented.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, entry);
                }
                println!();
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
