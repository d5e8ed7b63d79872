use crate::backing_store::{self, BackingStore, StoreDescriptor, StoreKind};
use crate::types::{Owner, Pixel, Standing, Upsert};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// Shared handle to a backing store.
///
/// All access goes through one reader/writer lock, so each operation sees
/// and leaves the store in a consistent state: concurrent upserts on the same
/// coordinate pair never produce two records and never lose a write.
pub struct Canvas {
    store: RwLock<Box<dyn BackingStore>>,
}

impl Canvas {
    pub fn new(store: Box<dyn BackingStore>) -> Self {
        let descriptor = store.describe();
        info!(
            "Canvas backed by {} store ({} pixels)",
            descriptor.kind, descriptor.len
        );
        Self {
            store: RwLock::new(store),
        }
    }

    pub fn with_kind(kind: StoreKind) -> Self {
        Self::new(backing_store::build(kind))
    }

    pub fn describe(&self) -> StoreDescriptor {
        self.store.read().describe()
    }

    pub fn list(&self) -> Vec<Pixel> {
        let pixels = self.store.read().list();
        debug!("Listing {} pixels", pixels.len());
        pixels
    }

    pub fn pixel_at(&self, x: i64, y: i64) -> Option<Pixel> {
        self.store.read().get(x, y)
    }

    pub fn upsert(&self, pixel: Pixel) -> Upsert {
        let outcome = self.store.write().upsert(pixel);
        match &outcome {
            Upsert::Created(p) => debug!("{} claimed {} with {}", p.owner, p.loc(), p.color),
            Upsert::Updated(p) => debug!("{} recolored {} with {}", p.owner, p.loc(), p.color),
        }
        outcome
    }

    pub fn delete(&self, x: i64, y: i64) -> Option<Pixel> {
        let removed = self.store.write().delete(x, y);
        match &removed {
            Some(p) => debug!("Deleted pixel {} owned by {}", p.loc(), p.owner),
            None => debug!("No pixel at ({}, {}) to delete", x, y),
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    /// Pixel counts per owner, highest first.
    ///
    /// Owners with equal counts stay in the order their first pixel appears
    /// in [`Canvas::list`].
    pub fn leaderboard(&self) -> Vec<Standing> {
        let pixels = self.store.read().list();
        let mut slots: HashMap<&Owner, usize> = HashMap::new();
        let mut standings: Vec<Standing> = Vec::new();
        for pixel in &pixels {
            match slots.get(&pixel.owner) {
                Some(&idx) => standings[idx].pixels += 1,
                None => {
                    slots.insert(&pixel.owner, standings.len());
                    standings.push(Standing {
                        owner: pixel.owner.clone(),
                        pixels: 1,
                    });
                }
            }
        }
        // stable, keeps first-claim order among ties
        standings.sort_by(|a, b| b.pixels.cmp(&a.pixels));
        standings
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::with_kind(StoreKind::default())
    }
}
