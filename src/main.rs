use anyhow::Result;
use inboundsync::{config::Config, pipeline};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) run the pipeline ─────────────────────────────────────────
    // Operational outcomes are reported through the log lines; an
    // unexpected error here is logged and the process still exits normally.
    let cfg = Config::default();
    if let Err(err) = pipeline::run(&cfg).await {
        error!("❌ error in main process: {err:?}");
    }

    Ok(())
}
