//! HTTP API over the submission pipeline and history store
//!
//! Routes live in [`routes`], handlers in [`handlers`]. All handlers share
//! one [`AppState`], which owns the batch runner and the history database.

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use crate::config::{load_vendor_credentials, Config};
use crate::storage::{SqliteStorage, Storage, StorageResult};
use crate::submit::{BatchReport, BatchRunner, VendorCredentials};
use crate::{ConfigError, CourierError};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<BatchRunner>,
    pub storage: Arc<Mutex<SqliteStorage>>,
    pub config_hash: String,
    /// Substituted when a request carries no protocol key
    pub default_protocol_key: Option<String>,
    /// Substituted when a request carries no vendor credentials
    pub default_vendor_credentials: Option<VendorCredentials>,
}

impl AppState {
    pub fn new(runner: Arc<BatchRunner>, storage: SqliteStorage, config_hash: String) -> Self {
        Self {
            runner,
            storage: Arc::new(Mutex::new(storage)),
            config_hash,
            default_protocol_key: None,
            default_vendor_credentials: None,
        }
    }

    /// Builds the state for a loaded configuration
    ///
    /// Opens the history database and reads the configured credentials file,
    /// if any.
    pub fn from_config(config: &Config, config_hash: String) -> Result<Self, CourierError> {
        let runner = Arc::new(BatchRunner::from_config(config)?);
        let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

        let default_vendor_credentials = match &config.vendor.credentials_path {
            Some(path) => Some(load_vendor_credentials(Path::new(path))?),
            None => None,
        };

        Ok(Self {
            default_protocol_key: config.indexnow.key.clone(),
            default_vendor_credentials,
            ..Self::new(runner, storage, config_hash)
        })
    }

    /// Runs a closure against the history database on the blocking pool
    pub async fn with_storage<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteStorage) -> StorageResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let result = tokio::task::spawn_blocking(move || f(&mut lock_storage(&storage)))
            .await
            .map_err(|e| {
                tracing::error!("Storage task failed: {}", e);
                ApiError::Internal("Internal server error".to_string())
            })?;

        Ok(result?)
    }

    /// Appends a batch to history in the background, logging instead of failing
    ///
    /// The returned handle may be dropped; the write still completes.
    pub fn persist(&self, report: BatchReport) -> JoinHandle<()> {
        let storage = Arc::clone(&self.storage);
        let config_hash = self.config_hash.clone();

        tokio::task::spawn_blocking(move || {
            match lock_storage(&storage).record_batch(&config_hash, &report) {
                Ok(batch_id) => tracing::debug!("Recorded batch {}", batch_id),
                Err(e) => tracing::warn!("Failed to save results to history: {}", e),
            }
        })
    }
}

fn lock_storage(storage: &Mutex<SqliteStorage>) -> MutexGuard<'_, SqliteStorage> {
    storage
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Serves the API on the configured bind address until the process stops
pub async fn serve(config: &Config, config_hash: String) -> Result<(), CourierError> {
    let addr: SocketAddr = config.server.bind_address.parse().map_err(|_| {
        ConfigError::Validation(format!(
            "invalid bind address '{}'",
            config.server.bind_address
        ))
    })?;

    let state = AppState::from_config(config, config_hash)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
