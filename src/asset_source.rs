use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use spdlog::debug;

use crate::error::FetchError;

/// Where the archive's static assets (manifest and post markdown) come from.
pub trait AssetSource {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Reads assets from a content directory on disk.
pub struct DirSource {
    root_dir: PathBuf,
}

impl DirSource {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        DirSource {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let rel = Path::new(path);
        let escapes = rel.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(FetchError::Forbidden(path.to_string()));
        }
        Ok(self.root_dir.join(rel))
    }
}

impl AssetSource for DirSource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let full_path = self.resolve(path)?;
        debug!("Reading asset {}", full_path.display());
        match tokio::fs::read_to_string(&full_path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(FetchError::NotFound(path.to_string())),
            Err(e) => Err(FetchError::Io(path.to_string(), e)),
        }
    }
}

/// Assets held in memory, keyed by their path.
#[derive(Default, Clone)]
pub struct MemorySource {
    assets: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        MemorySource::default()
    }

    pub fn with(mut self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: &str, content: &str) {
        self.assets.insert(path.to_string(), content.to_string());
    }
}

impl AssetSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        match self.assets.get(path) {
            Some(content) => Ok(content.clone()),
            None => Err(FetchError::NotFound(path.to_string())),
        }
    }
}
