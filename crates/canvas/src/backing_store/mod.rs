pub mod indexed;
pub mod scan;

use crate::types::{Pixel, Upsert};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Scan,
    Indexed,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Scan => f.write_str("scan"),
            StoreKind::Indexed => f.write_str("indexed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub kind: StoreKind,
    pub len: usize,
}

/// Holds the claimed pixels of a canvas.
///
/// Implementations are plain data structures without internal locking; the
/// [`Canvas`](crate::Canvas) serializes access to them. Every implementation
/// keeps pixels in the order their coordinate pair was first claimed, and an
/// upsert on an existing pair never moves it.
pub trait BackingStore: Send + Sync {
    fn describe(&self) -> StoreDescriptor;
    fn list(&self) -> Vec<Pixel>;
    fn get(&self, x: i64, y: i64) -> Option<Pixel>;
    fn upsert(&mut self, pixel: Pixel) -> Upsert;
    /// Removes the pixel at `(x, y)`. `None` means nothing was stored there.
    fn delete(&mut self, x: i64, y: i64) -> Option<Pixel>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn build(kind: StoreKind) -> Box<dyn BackingStore> {
    match kind {
        StoreKind::Scan => Box::new(scan::ScanStore::new()),
        StoreKind::Indexed => Box::new(indexed::IndexedStore::new()),
    }
}
