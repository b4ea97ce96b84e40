//! Liked products and their durable client-side store.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CatalogError;
use crate::ids::ProductId;

/// Set of liked product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikedSet {
    ids: BTreeSet<ProductId>,
}

impl LikedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    /// Flip the like state. Returns `true` if the product is now liked.
    pub fn toggle(&mut self, id: &ProductId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn remove(&mut self, id: &ProductId) -> bool {
        self.ids.remove(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for LikedSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Durable storage for the liked set.
pub trait LikedStore: Send + Sync {
    /// Load the stored set. A store that was never written loads as empty.
    fn load(&self) -> Result<LikedSet, CatalogError>;

    /// Replace the stored set.
    fn save(&self, liked: &LikedSet) -> Result<(), CatalogError>;
}

/// Liked set kept in a JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileLikedStore {
    path: PathBuf,
}

impl JsonFileLikedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LikedStore for JsonFileLikedStore {
    fn load(&self) -> Result<LikedSet, CatalogError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(LikedSet::new()),
            Err(e) => {
                return Err(CatalogError::LikedStore(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let ids: Vec<ProductId> = serde_json::from_slice(&bytes)?;
        Ok(ids.into_iter().collect())
    }

    fn save(&self, liked: &LikedSet) -> Result<(), CatalogError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CatalogError::LikedStore(e.to_string()))?;
            }
        }
        let ids: Vec<&ProductId> = liked.iter().collect();
        let bytes = serde_json::to_vec(&ids)?;
        std::fs::write(&self.path, bytes)
            .map_err(|e| CatalogError::LikedStore(format!("{}: {}", self.path.display(), e)))
    }
}

/// Liked set kept in memory (for tests and ephemeral sessions).
#[derive(Debug, Default)]
pub struct MemoryLikedStore {
    saved: Mutex<LikedSet>,
}

impl MemoryLikedStore {
    pub fn new(initial: LikedSet) -> Self {
        Self {
            saved: Mutex::new(initial),
        }
    }
}

impl LikedStore for MemoryLikedStore {
    fn load(&self) -> Result<LikedSet, CatalogError> {
        self.saved
            .lock()
            .map(|s| s.clone())
            .map_err(|e| CatalogError::LikedStore(e.to_string()))
    }

    fn save(&self, liked: &LikedSet) -> Result<(), CatalogError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| CatalogError::LikedStore(e.to_string()))?;
        *saved = liked.clone();
        Ok(())
    }
}
