use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use medico_core::{ClinicStore, CoreConfig, load_seed, seed_source_from_env_values};

/// Main entry point for the Médico application
///
/// Loads `.env`, seeds the in-memory clinic and serves the REST API with Swagger UI.
///
/// # Environment Variables
/// - `MEDICO_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDICO_SEED_FILE`: YAML seed file; when unset the built-in clinic is generated
/// - `MEDICO_RNG_SEED`: seed for the appointment generator (default: 42)
/// - `MEDICO_SEED_APPOINTMENTS`: number of generated appointments (default: 25)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, seeding, or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medico_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("MEDICO_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

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
    let today = chrono::Utc::now().date_naive();
    let store = ClinicStore::from_seed(load_seed(&cfg, today)?);

    tracing::info!(
        patients = store.patients().len(),
        appointments = store.appointments().len(),
        "++ Clinic seeded"
    );
    tracing::info!("++ Starting Médico REST on {}", rest_addr);

    let app = router(AppState::new(store));
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
