//! Persistent fallback store for guest favorites.
//!
//! Signed-out visitors keep their favorites on the local machine. The
//! store holds minimal product snapshots so the favorites page renders
//! without refetching the catalog. On login the entries are migrated to
//! the account and the store is cleared.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

use ecom_market_core::ProductId;

use crate::api::types::ProductSummary;

/// Errors from the guest store backends.
#[derive(Debug, Error)]
pub enum GuestStoreError {
    /// Reading or writing the backing file failed.
    #[error("guest store I/O error: {0}")]
    Io(#[from] io::Error),

    /// The persisted payload did not parse.
    #[error("guest store parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Synchronous key-value persistence capability backing [`GuestFavorites`].
///
/// Implementations give no transactional guarantees: concurrent writers
/// (another tab, another process) race and the last write wins.
pub trait GuestStorage: Send + Sync {
    /// Read the stored favorites, empty when nothing was ever stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self) -> Result<Vec<ProductSummary>, GuestStoreError>;

    /// Replace the stored favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write(&self, items: &[ProductSummary]) -> Result<(), GuestStoreError>;

    /// Destroy the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be removed.
    fn clear(&self) -> Result<(), GuestStoreError>;
}

// =============================================================================
// Backends
// =============================================================================

/// JSON-file backend, the persistent store of a real installation.
///
/// Writes are whole-file replacements; last write wins across processes.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file backend at the given path. The file and its parent
    /// directory are created lazily on first write.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl GuestStorage for FileStorage {
    fn read(&self) -> Result<Vec<ProductSummary>, GuestStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, items: &[ProductSummary]) -> Result<(), GuestStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string(items)?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), GuestStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<Vec<ProductSummary>>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ProductSummary>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl GuestStorage for MemoryStorage {
    fn read(&self) -> Result<Vec<ProductSummary>, GuestStoreError> {
        Ok(self.lock().clone())
    }

    fn write(&self, items: &[ProductSummary]) -> Result<(), GuestStoreError> {
        *self.lock() = items.to_vec();
        Ok(())
    }

    fn clear(&self) -> Result<(), GuestStoreError> {
        self.lock().clear();
        Ok(())
    }
}

// =============================================================================
// GuestFavorites
// =============================================================================

/// The guest favorites store.
///
/// A thin facade over a [`GuestStorage`] backend that enforces product-id
/// uniqueness and keeps insertion order.
pub struct GuestFavorites {
    backend: Box<dyn GuestStorage>,
}

impl GuestFavorites {
    /// Create a guest store over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn GuestStorage>) -> Self {
        Self { backend }
    }

    /// Create a guest store persisted at the given file path.
    #[must_use]
    pub fn file(path: PathBuf) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    /// Create an ephemeral in-memory guest store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Read all stored favorites.
    ///
    /// A corrupted store is treated as empty rather than breaking the
    /// favorites page; the condition is logged.
    #[must_use]
    pub fn items(&self) -> Vec<ProductSummary> {
        match self.backend.read() {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to read guest favorites, treating as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Whether the store holds the given product.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items().iter().any(|item| item.id == product_id)
    }

    /// Flip the membership of one product and return the new membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    pub fn toggle(&self, product: &ProductSummary) -> Result<bool, GuestStoreError> {
        let mut items = self.items();
        let is_favorite = if let Some(pos) = items.iter().position(|item| item.id == product.id) {
            items.remove(pos);
            false
        } else {
            items.push(product.clone());
            true
        };
        self.backend.write(&items)?;
        Ok(is_favorite)
    }

    /// Destroy the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be removed.
    pub fn clear(&self) -> Result<(), GuestStoreError> {
        self.backend.clear()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecom_market_core::Price;

    fn product(id: i32) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_kopecks(10_000),
            main_image: None,
            part_number: format!("PN-{id:05}"),
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let store = GuestFavorites::in_memory();
        assert!(store.toggle(&product(1)).unwrap());
        assert!(store.contains(ProductId::new(1)));
        assert!(!store.toggle(&product(1)).unwrap());
        assert!(!store.contains(ProductId::new(1)));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let store = GuestFavorites::in_memory();
        store.toggle(&product(3)).unwrap();
        store.toggle(&product(1)).unwrap();
        store.toggle(&product(2)).unwrap();
        let ids: Vec<i32> = store.items().iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_clear_empties_store() {
        let store = GuestFavorites::in_memory();
        store.toggle(&product(1)).unwrap();
        store.toggle(&product(2)).unwrap();
        store.clear().unwrap();
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "ecom-guest-test-{}.json",
            std::process::id()
        ));
        let store = GuestFavorites::file(path.clone());
        store.clear().unwrap();

        store.toggle(&product(7)).unwrap();
        assert!(store.contains(ProductId::new(7)));

        // A second store over the same file sees the write
        let reopened = GuestFavorites::file(path);
        assert!(reopened.contains(ProductId::new(7)));
        reopened.clear().unwrap();
        assert!(reopened.items().is_empty());
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = GuestFavorites::file(std::env::temp_dir().join("ecom-guest-never-written.json"));
        assert!(store.items().is_empty());
    }
}
