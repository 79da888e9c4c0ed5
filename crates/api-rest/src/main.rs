//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging of the HTTP layer. The workspace's main `medico-run`
//! binary serves the same router and also loads a `.env` file.

use api_rest::{router, AppState};
use medico_core::{load_seed, seed_source_from_env_values, ClinicStore, CoreConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Médico REST API server
///
/// # Environment Variables
/// - `MEDICO_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `MEDICO_SEED_FILE`: optional YAML seed file
/// - `MEDICO_RNG_SEED` / `MEDICO_SEED_APPOINTMENTS`: built-in seed generator settings
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the seed configuration is invalid or the seed cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medico_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDICO_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let seed_source = seed_source_from_env_values(
        std::env::var("MEDICO_SEED_FILE").ok(),
        std::env::var("MEDICO_RNG_SEED").ok(),
        std::env::var("MEDICO_SEED_APPOINTMENTS").ok(),
    )?;
    let cfg = CoreConfig::new(seed_source)?;
    match cfg.seed_file() {
        Some(path) => tracing::info!("++ Seeding from {}", path.display()),
        None => tracing::info!("++ Seeding the built-in clinic"),
    }
    let seed = load_seed(&cfg, chrono::Utc::now().date_naive())?;
    let app = router(AppState::new(ClinicStore::from_seed(seed)));

    tracing::info!("-- Starting Médico REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
