//! Application state for the web layer.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::alternatives::CachedAlternatives;
use crate::analysis::{GeminiClient, GenericNameTable};
use crate::export::ExportConfig;
use crate::facilities::FacilitySource;
use crate::routing::RoutingConfig;
use crate::store::{MedicationCache, Store};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Where nearby hospitals come from
    pub facilities: Arc<FacilitySource>,

    /// Travel model for the hospital graph
    pub routing: Arc<RoutingConfig>,

    pub export: ExportConfig,

    /// JSON collections on disk
    pub store: Arc<Store>,

    /// Lower-cased medication name → ids, rebuilt after each write
    pub medication_cache: Arc<RwLock<MedicationCache>>,

    /// Cached drug alternatives lookup
    pub alternatives: Arc<CachedAlternatives>,

    /// OCR and structuring
    pub gemini: Arc<GeminiClient>,

    pub generic_names: Arc<GenericNameTable>,

    /// Uploaded files are saved here
    pub upload_dir: Arc<PathBuf>,
}

impl AppState {
    /// Create a new app state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        facilities: FacilitySource,
        routing: RoutingConfig,
        export: ExportConfig,
        store: Store,
        medication_cache: MedicationCache,
        alternatives: CachedAlternatives,
        gemini: GeminiClient,
        generic_names: GenericNameTable,
        upload_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            facilities: Arc::new(facilities),
            routing: Arc::new(routing),
            export,
            store: Arc::new(store),
            medication_cache: Arc::new(RwLock::new(medication_cache)),
            alternatives: Arc::new(alternatives),
            gemini: Arc::new(gemini),
            generic_names: Arc::new(generic_names),
            upload_dir: Arc::new(upload_dir.into()),
        }
    }
}
