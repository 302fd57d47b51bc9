use std::process::ExitCode;

use clap::Parser;
use findingnorm::cli::Cli;
use findingnorm::config::{AppConfig, LogFormat};
use findingnorm::errors::NormalizerError;
use findingnorm::services::pipeline;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or_default(),
    );

    let config = match config {
        Ok(config) => config,
        Err(err) => return report(&err),
    };

    let invocation = cli.invocation(&config);
    match pipeline::run(&config, &invocation).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Diagnostics go to stderr so stdout stays machine-readable JSON.
fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "findingnorm=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_target(false)
                    .without_time(),
            )
            .init(),
    }
}

fn report(err: &NormalizerError) -> ExitCode {
    if err.is_soft() {
        tracing::warn!("{err}");
    } else {
        tracing::error!("{err}");
    }
    ExitCode::from(err.exit_code())
}
