//! CLI for port-bot.
//!
//! Handles a single `pull_request` webhook event: review chores when a pull
//! request is opened, backports and forward-ports when one is merged.

use clap::Parser;
use port_bot::{load_config, PullRequestEvent, RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// port-bot - Port merged pull requests to maintenance branches.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `pull_request` event payload.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// GitHub token used for API calls and pushes.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Path to port-bot.toml. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for working copies. Overrides the config file.
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Print the planned ports without creating branches or pull requests.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    // octocrab's rustls needs a process-wide crypto provider.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let settings = load_config(args.config.as_deref())?;
    let event = PullRequestEvent::from_path(&args.event_path)?;

    let mut config = RunnerConfig::new(settings, args.token, args.dry_run);
    if let Some(work_dir) = args.work_dir {
        config = config.with_work_dir(work_dir);
    }

    let runner = Runner::new(config)?;
    runner.run(&event).await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );

    if summary.ignored {
        println!("  Event ignored");
        return;
    }

    if summary.dry_run {
        println!("  Ports planned: {}", summary.ports_planned);
        return;
    }

    println!("  Ports attempted: {}", summary.ports_attempted);
    println!("  PRs created: {}", summary.prs_created);
    println!("  Conflicted ports: {}", summary.conflicted_ports);
    println!("  Ports failed: {}", summary.ports_failed);
    println!("  Follow-up failures: {}", summary.follow_up_failures);
    println!("  Rejected port labels: {}", summary.rejected_labels);
    println!("  Chore failures: {}", summary.chore_failures);

    if summary.has_failures() {
        println!("  Result: failed");
    } else if summary.all_success() {
        println!("  Result: success");
    } else {
        println!("  Result: completed with warnings");
    }
}
