//! Application state and dependency injection.

use crate::Result;
use crate::service::{ServiceConfig, StorageService};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    storage: StorageService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Validates the configuration and opens the object store session.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let service_state = Self {
            storage: config.connect_storage()?,
        };

        Ok(service_state)
    }

    /// Creates application state around an existing storage backend.
    pub fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    /// Returns the storage service.
    pub fn storage(&self) -> &StorageService {
        &self.storage
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(storage: StorageService);
