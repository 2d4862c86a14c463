pub mod json;

use crate::app::Result;
use crate::domain::Snapshot;

pub use json::JsonStore;

pub trait Store {
    /// Read the persisted snapshot. A store that has never been written
    /// returns `Ok(None)`.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the persisted snapshot with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Load the snapshot, starting over from an empty one on any failure.
///
/// A broken or unreadable file must not keep the reader from starting.
pub fn load_or_empty(store: &dyn Store) -> Snapshot {
    match store.load() {
        Ok(Some(snapshot)) => {
            tracing::info!(
                "Loaded {} items and {} dismissed ids",
                snapshot.total_items(),
                snapshot.removed_guids.len()
            );
            snapshot
        }
        Ok(None) => {
            tracing::info!("No saved state yet, starting empty");
            Snapshot::new()
        }
        Err(e) => {
            tracing::warn!("Error reading saved state, starting empty: {}", e);
            Snapshot::new()
        }
    }
}

/// Persist the snapshot, logging instead of failing.
pub fn save_or_warn(store: &dyn Store, snapshot: &Snapshot) -> bool {
    match store.save(snapshot) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Error writing saved state: {}", e);
            false
        }
    }
}
