use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use recipe_core::config::rest_addr_from_env_value;
use recipe_core::constants::ENV_REST_ADDR;
use recipe_core::{resolve_core_config, MealDbClient, SharedSource};

/// Main entry point for the recipe application
///
/// Resolves configuration once, builds the HTTP client for the recipe database and serves the
/// REST API (with OpenAPI/Swagger UI) until the process is stopped.
///
/// # Environment Variables
/// - `RECIPE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RECIPE_API_BASE_URL`: Base URL of the recipe database
/// - `RECIPE_SUGGEST_DEBOUNCE_MS`, `RECIPE_SUGGEST_MIN_CHARS`, `RECIPE_SUGGEST_LIMIT`:
///   suggestion tuning
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid, the address cannot be bound or the
///   server fails while running
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recipe_core=info".parse()?)
                .add_directive("recipe_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = resolve_core_config(|key| std::env::var(key).ok())?;
    let rest_addr = rest_addr_from_env_value(std::env::var(ENV_REST_ADDR).ok())?;

    tracing::info!("++ Starting recipe REST on {}", rest_addr);
    tracing::info!("++ Using recipe database at {}", cfg.api_base_url());

    let source: SharedSource = Arc::new(MealDbClient::new(&cfg)?);
    let app = router(AppState {
        source,
        cfg: Arc::new(cfg),
    });

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
