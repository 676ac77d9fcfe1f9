use std::error::Error;

use rx_server::alternatives::{AlternativesCacheConfig, CachedAlternatives, RxNavClient, RxNavConfig};
use rx_server::analysis::{GeminiClient, GeminiConfig, GenericNameTable};
use rx_server::config::AppConfig;
use rx_server::export::ExportConfig;
use rx_server::facilities::{FacilitySource, OverpassClient, OverpassConfig, StaticFacilities};
use rx_server::routing::RoutingConfig;
use rx_server::store::{MedicationCache, Store};
use rx_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Brand → generic lookup table, read from the data directory.
const GENERIC_NAMES_FILE: &str = "generic_names.json";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rx_server=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    if config.gemini_api_key.is_empty() {
        warn!("GEMINI_API_KEY not set. Prescription analysis will fail.");
    }

    // Facility source: fixture file for offline use, Overpass otherwise
    let facilities = match &config.facility_fixture {
        Some(path) => {
            let fixture = StaticFacilities::load(path)?;
            info!(path = %path.display(), facilities = fixture.len(), "Using facility fixture");
            FacilitySource::Static(fixture)
        }
        None => {
            let mut overpass = OverpassConfig::new();
            if let Some(url) = &config.overpass_url {
                overpass = overpass.with_base_url(url);
            }
            FacilitySource::Overpass(OverpassClient::new(overpass)?)
        }
    };

    let mut rxnav = RxNavConfig::new();
    if let Some(url) = &config.rxnorm_url {
        rxnav = rxnav.with_base_url(url);
    }
    let alternatives = CachedAlternatives::new(
        RxNavClient::new(rxnav)?,
        &AlternativesCacheConfig::default(),
    );

    let gemini = GeminiClient::new(GeminiConfig::new(&config.gemini_api_key))?;
    let generic_names = GenericNameTable::load(config.data_dir.join(GENERIC_NAMES_FILE));
    info!(entries = generic_names.len(), "Loaded generic name table");

    let store = Store::open(&config.data_dir);
    let medications = store.medications.load().await?;
    let medication_cache =
        MedicationCache::load_checked(store.medication_cache_path(), &medications).await;
    info!(names = medication_cache.len(), "Medication cache ready");

    let export = ExportConfig {
        collapse_symmetric: config.collapse_symmetric_links,
    };

    let state = AppState::new(
        facilities,
        RoutingConfig::default(),
        export,
        store,
        medication_cache,
        alternatives,
        gemini,
        generic_names,
        &config.upload_dir,
    );

    let app = create_router(state.clone());

    info!(addr = %config.bind_addr, "Starting server");
    info!("  POST /upload              - Analyse a prescription");
    info!("  GET  /medications         - List medications");
    info!("  GET  /reminders           - List reminders");
    info!("  GET  /alternatives        - Drug alternatives");
    info!("  GET  /dashboard           - Dashboard summary");
    info!("  GET  /get-hospital-graph  - Nearby hospitals");

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let path = state.store.medication_cache_path();
    state.medication_cache.read().await.save(&path).await?;
    info!(path = %path.display(), "Saved medication cache");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down");
}
