//! Dataset acquisition: the remote archive first, the bundled snapshot on
//! any remote failure.

mod remote;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::catalog::{Catalog, Dataset};
use crate::config::ExplorerConfig;
use crate::models::DataSource;

pub use remote::{looks_like_markup, RemoteError, RemoteSource};

/// A load that could not produce a dataset from either source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        /// Why the remote archive was not used, if it was tried.
        remote: Option<RemoteError>,
    },
}

/// Summary of a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub source: DataSource,
    pub records: usize,
    pub years: usize,
    pub methods: usize,
    pub hosts: usize,
    pub facilities: usize,
}

impl LoadReport {
    fn of(dataset: &Dataset, source: DataSource) -> Self {
        let options = dataset.options();
        Self {
            source,
            records: dataset.len(),
            years: options.disc_year.len(),
            methods: options.discoverymethod.len(),
            hosts: options.hostname.len(),
            facilities: options.disc_facility.len(),
        }
    }
}

/// Loads datasets and publishes them into a [`Catalog`].
///
/// Loads are serialized: a second `load()` waits for the one in flight and
/// then runs its own acquisition, so the last one to finish is what readers
/// see.
#[derive(Debug)]
pub struct DatasetLoader {
    remote: Option<RemoteSource>,
    snapshot_path: PathBuf,
    catalog: Catalog,
    in_flight: Mutex<()>,
}

impl DatasetLoader {
    pub fn new(config: &ExplorerConfig, catalog: Catalog) -> Self {
        let remote = if config.offline {
            tracing::info!("Offline mode, the remote archive will not be queried");
            None
        } else {
            match RemoteSource::new(config.remote_url.clone(), config.timeout) {
                Ok(remote) => Some(remote),
                Err(e) => {
                    tracing::warn!("Could not build archive client, using snapshot only: {}", e);
                    None
                }
            }
        };

        Self {
            remote,
            snapshot_path: config.snapshot_path.clone(),
            catalog,
            in_flight: Mutex::new(()),
        }
    }

    /// Acquire, normalize, index and publish a fresh dataset.
    ///
    /// Fails only when the snapshot cannot be read after the remote archive
    /// was unavailable (or skipped). On failure the previously published
    /// dataset stays in place.
    pub async fn load(&self) -> Result<LoadReport, LoadError> {
        let _guard = self.in_flight.lock().await;
        tracing::info!("Starting exoplanet data load");

        let fetched = match &self.remote {
            Some(remote) => remote.fetch().await.map_err(Some),
            None => Err(None),
        };

        let (raw, source) = match fetched {
            Ok(raw) => (raw, DataSource::Remote),
            Err(remote_error) => {
                if let Some(e) = &remote_error {
                    tracing::warn!("Remote archive unavailable: {}", e);
                }
                tracing::info!(
                    "Loading from local snapshot {}",
                    self.snapshot_path.display()
                );

                let raw = tokio::fs::read_to_string(&self.snapshot_path)
                    .await
                    .map_err(|source| LoadError::Snapshot {
                        path: self.snapshot_path.clone(),
                        source,
                        remote: remote_error,
                    })?;
                (raw, DataSource::Local)
            }
        };

        let dataset = Dataset::from_raw(&raw, source);
        let report = LoadReport::of(&dataset, source);
        self.catalog.publish(dataset);

        tracing::info!(
            "Loaded {} exoplanets from {} source",
            report.records,
            report.source
        );
        tracing::info!(
            "Years: {} | Methods: {} | Hosts: {} | Facilities: {}",
            report.years,
            report.methods,
            report.hosts,
            report.facilities
        );

        Ok(report)
    }

    /// Reload every `every` in the background. The first reload happens one
    /// full period from now; a failed reload is logged and the current
    /// dataset kept.
    pub fn spawn_refresh(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = self.load().await {
                    tracing::error!("Scheduled reload failed, keeping current dataset: {}", e);
                }
            }
        })
    }
}
