use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use runwatch_core::app::DEFAULT_POLL_INTERVAL_MS;
use runwatch_core::domain::{ErrorKind, PollerError};
use runwatch_core::impls::{ConsolePresenter, GithubJobsSource, HttpSettings, HttpStatusSource};
use runwatch_core::{AppBuilder, PollerConfig, StatusSource};
use tracing_subscriber::EnvFilter;

/// Watch a job until it finishes and print the outcome.
#[derive(Debug, Parser)]
#[command(name = "runwatch", version)]
struct Cli {
    /// Status endpoint returning `{status, conclusion, job_url}`.
    #[arg(required_unless_present = "github", conflicts_with = "github")]
    url: Option<String>,

    /// Watch a GitHub Actions run instead (`owner/repo`).
    #[arg(long, requires = "run_id")]
    github: Option<String>,

    /// Workflow run id, used with `--github`.
    #[arg(long, requires = "github")]
    run_id: Option<u64>,

    /// Bearer token sent with every status query.
    #[arg(long, env = "RUNWATCH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Milliseconds between scheduled queries.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    interval_ms: u64,

    /// Log every poll.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "runwatch_core=debug,runwatch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_source(cli: &Cli) -> Result<Arc<dyn StatusSource>> {
    let settings = HttpSettings {
        token: cli.token.clone(),
        ..HttpSettings::default()
    };

    match (&cli.url, &cli.github, cli.run_id) {
        (Some(url), None, _) => {
            let source = HttpStatusSource::new(url.clone(), settings)
                .context("failed to set up HTTP client")?;
            Ok(Arc::new(source))
        }
        (None, Some(repo), Some(run_id)) => {
            let source = GithubJobsSource::new(repo, run_id, settings)
                .context("failed to set up GitHub client")?;
            tracing::debug!(url = source.url(), "watching GitHub run");
            Ok(Arc::new(source))
        }
        _ => bail!("pass either a status URL or --github with --run-id"),
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let app = AppBuilder::new()
        .source(build_source(&cli)?)
        .presenter(Arc::new(
            ConsolePresenter::stdout().with_revoke_hint(cli.token.is_some()),
        ))
        .config(PollerConfig::from_millis(cli.interval_ms))
        .build()?;

    let outcome = app.start()?.wait().await?;
    tracing::debug!(status = ?app.poller.status(), "poller finished");
    Ok(outcome.is_success())
}

/// 2 for setup errors and misuse, 3 when the poller stopped without an outcome.
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<PollerError>().map(PollerError::kind) {
        Some(ErrorKind::Transient) => 3,
        Some(ErrorKind::Misuse) | None => 2,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("runwatch: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
