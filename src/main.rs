use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use jarvis::inputs::{PayloadFormat, UtteranceSource};
use jarvis::kernel::intent::Catalog;
use jarvis::kernel::{drive, SessionEnd};
use jarvis::outputs::speech;
use jarvis::services::llm::LlmService;
use jarvis::{Config, Dispatcher};

/// Jarvis - voice command dispatcher with a local language-model fallback
#[derive(Parser)]
#[command(name = "jarvis", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "JARVIS_CONFIG")]
    config: Option<PathBuf>,

    /// OpenAI-compatible backend root, overrides the config file
    #[arg(long, env = "JARVIS_BACKEND_URL")]
    backend_url: Option<String>,

    /// Read utterances from a file instead of stdin
    #[arg(short, long, env = "JARVIS_INPUT")]
    input: Option<PathBuf>,

    /// Utterance payload format
    #[arg(long, value_enum, default_value = "text", env = "JARVIS_FORMAT")]
    format: PayloadFormat,

    /// Echo replies to the console without speaking them
    #[arg(long, env = "JARVIS_SILENT")]
    silent: bool,

    /// Seed response selection for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(end) => {
            tracing::info!(?end, "jarvis stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<SessionEnd> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).context("loading configuration")?,
        None => Config::default(),
    };
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
        config.validate().context("applying --backend-url")?;
    }

    let catalog = Catalog::builtin().context("building intent catalog")?;
    let backend = LlmService::new(&config.backend).context("building backend client")?;
    tracing::info!(
        intents = catalog.len(),
        backend = %config.backend.base_url,
        model = %config.backend.model,
        "jarvis booting"
    );

    let mut source = UtteranceSource::open(cli.input.as_deref(), cli.format)
        .await
        .context("opening utterance source")?;
    let mut sink =
        speech::from_config(&config.speech, cli.silent).context("starting speech output")?;

    let mut dispatcher = Dispatcher::new(&config, catalog, Arc::new(backend));
    if let Some(seed) = cli.seed {
        dispatcher = dispatcher.with_rng(StdRng::seed_from_u64(seed));
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            on_interrupt.cancel();
        }
    });

    let end = drive(
        &mut dispatcher,
        &mut source,
        sink.as_mut(),
        &config.session.assistant_name,
        cancel,
    )
    .await?;
    Ok(end)
}
