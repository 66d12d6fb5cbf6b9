use std::sync::{Arc, PoisonError, RwLock};

use spdlog::{error, info, warn};
use tokio::sync::Mutex;

use crate::asset_source::AssetSource;
use crate::error::ManifestError;
use crate::manifest::Manifest;

/// Shared cache of the post manifest.
///
/// The first [`load`](ManifestStore::load) fetches the manifest and keeps it
/// until [`invalidate`](ManifestStore::invalidate) or
/// [`refresh`](ManifestStore::refresh) is called. A failed fetch is logged
/// and yields an empty manifest which is never cached, so the next load
/// tries again. Concurrent first loads share a single fetch.
pub struct ManifestStore<S> {
    source: S,
    manifest_path: String,
    cache: RwLock<Option<Arc<Manifest>>>,
    load_lock: Mutex<()>,
}

impl<S: AssetSource> ManifestStore<S> {
    pub fn new(source: S, manifest_path: &str) -> Self {
        ManifestStore {
            source,
            manifest_path: manifest_path.to_string(),
            cache: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches and parses the manifest, bypassing the cache.
    pub async fn fetch(&self) -> Result<Manifest, ManifestError> {
        let json = self.source.fetch_text(&self.manifest_path).await?;
        let manifest = Manifest::parse(&json)?;
        for issue in manifest.validate() {
            warn!("Manifest {}: {}", self.manifest_path, issue);
        }
        Ok(manifest)
    }

    pub async fn load(&self) -> Arc<Manifest> {
        if let Some(manifest) = self.cached() {
            return manifest;
        }

        let _loading = self.load_lock.lock().await;
        // filled while we waited
        if let Some(manifest) = self.cached() {
            return manifest;
        }

        match self.fetch().await {
            Ok(manifest) => {
                info!("Loaded manifest {} with {} posts", self.manifest_path, manifest.len());
                let manifest = Arc::new(manifest);
                let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
                *cache = Some(manifest.clone());
                manifest
            }
            Err(e) => {
                error!("Error loading manifest {}: {}", self.manifest_path, e);
                Arc::new(Manifest::default())
            }
        }
    }

    pub async fn refresh(&self) -> Arc<Manifest> {
        self.invalidate();
        self.load().await
    }

    pub fn invalidate(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
    }

    pub fn cached(&self) -> Option<Arc<Manifest>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.clone()
    }
}
