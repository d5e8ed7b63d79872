use crate::backing_store::{BackingStore, StoreDescriptor, StoreKind};
use crate::types::{Pixel, PixelLoc, Upsert};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Pixels keyed by coordinate, listed by claim order.
///
/// Every newly claimed coordinate pair gets the next sequence number. `index`
/// maps the pair to its sequence number and `ordered` holds the pixels sorted
/// by it, so lookups are hashed and listing still walks the pixels in the
/// order they were first claimed. Sequence numbers are never reused.
#[derive(Debug, Default)]
pub struct IndexedStore {
    index: HashMap<PixelLoc, u64>,
    ordered: BTreeMap<u64, Pixel>,
    next_seq: u64,
}

impl IndexedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingStore for IndexedStore {
    fn describe(&self) -> StoreDescriptor {
        StoreDescriptor {
            kind: StoreKind::Indexed,
            len: self.ordered.len(),
        }
    }

    fn list(&self) -> Vec<Pixel> {
        self.ordered.values().cloned().collect()
    }

    fn get(&self, x: i64, y: i64) -> Option<Pixel> {
        let seq = self.index.get(&PixelLoc { x, y })?;
        self.ordered.get(seq).cloned()
    }

    fn upsert(&mut self, pixel: Pixel) -> Upsert {
        let loc = pixel.loc();
        if let Some(slot) = self.index.get(&loc).and_then(|seq| self.ordered.get_mut(seq)) {
            trace!("Replacing pixel {}", loc);
            slot.color = pixel.color;
            slot.owner = pixel.owner;
            return Upsert::Updated(slot.clone());
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        trace!("Claiming pixel {} with sequence {}", loc, seq);
        self.index.insert(loc, seq);
        self.ordered.insert(seq, pixel.clone());
        Upsert::Created(pixel)
    }

    fn delete(&mut self, x: i64, y: i64) -> Option<Pixel> {
        let seq = self.index.remove(&PixelLoc { x, y })?;
        trace!("Removing pixel ({}, {}) with sequence {}", x, y, seq);
        self.ordered.remove(&seq)
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }
}
