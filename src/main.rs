use anyhow::Context;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; variables may come from the environment.
    let dotenv = dotenvy::dotenv();

    ai_llm_service::telemetry::init("info").context("failed to install tracing subscriber")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => info!("no .env file, using process environment"),
        Err(e) => warn!(error = %e, "failed to read .env, using process environment"),
    }

    api::start().await.context("HappyFares backend failed")?;

    Ok(())
}
