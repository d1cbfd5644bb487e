//! Zodiac Readings standalone save handler
//!
//! Reads one function event from stdin, saves the reading it carries, and
//! writes one function response to stdout. Logs go to stderr.

mod function;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use zodiac_common::{
    config::AppConfig,
    telemetry::{self, LogTarget},
};

use function::FunctionEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    telemetry::init_tracing(&config.observability, LogTarget::Stderr)?;

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    let event: FunctionEvent = serde_json::from_str(&input)?;

    tracing::info!(method = %event.http_method, "Handling function event");
    let response = function::handle(event, &config.database).await;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(serde_json::to_string(&response)?.as_bytes())
        .await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;

    Ok(())
}
