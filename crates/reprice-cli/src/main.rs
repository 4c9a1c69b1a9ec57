mod reprice;

use reprice_shopify::{AdminClient, WriteThrottle};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = reprice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(store = %config.store, api_version = %config.api_version, "starting repricing run");

    let client = AdminClient::new(
        &config.store,
        &config.access_token,
        &config.api_version,
        config.request_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Admin API client: {e}"))?;
    let throttle = WriteThrottle::from_millis(config.write_delay_ms);

    match reprice::run_repricing(&client, &config.price_policy, &throttle).await {
        Ok(summary) => {
            tracing::info!(
                pages = summary.pages,
                variants = summary.variants,
                updated = summary.updated,
                skipped = summary.skipped,
                failed = summary.failed,
                "all prices processed"
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "catalog traversal failed; run aborted");
            Err(e.into())
        }
    }
}
