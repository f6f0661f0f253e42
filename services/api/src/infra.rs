use madison_intake::config::{StorageConfig, StoreBackend};
use madison_intake::inquiries::{
    InMemoryInquiryStore, Inquiry, InquiryStore, NewInquiry, SqliteInquiryStore, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store selected at startup from `APP_STORE`.
pub(crate) enum ConfiguredStore {
    Memory(InMemoryInquiryStore),
    Sqlite(SqliteInquiryStore),
}

impl ConfiguredStore {
    pub(crate) fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackend::Memory => {
                info!("using in-memory inquiry store");
                Ok(Self::Memory(InMemoryInquiryStore::new()))
            }
            StoreBackend::Sqlite => {
                info!(path = %config.database_path.display(), "opening sqlite inquiry store");
                Ok(Self::Sqlite(SqliteInquiryStore::open(&config.database_path)?))
            }
        }
    }
}

impl InquiryStore for ConfiguredStore {
    fn create(&self, inquiry: NewInquiry) -> Result<Inquiry, StoreError> {
        match self {
            ConfiguredStore::Memory(store) => store.create(inquiry),
            ConfiguredStore::Sqlite(store) => store.create(inquiry),
        }
    }

    fn list(&self) -> Result<Vec<Inquiry>, StoreError> {
        match self {
            ConfiguredStore::Memory(store) => store.list(),
            ConfiguredStore::Sqlite(store) => store.list(),
        }
    }
}
