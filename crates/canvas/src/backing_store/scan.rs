use crate::backing_store::{BackingStore, StoreDescriptor, StoreKind};
use crate::types::{Pixel, Upsert};
use tracing::trace;

/// Pixels in a flat vector, looked up by linear scan.
#[derive(Debug, Default)]
pub struct ScanStore {
    pixels: Vec<Pixel>,
}

impl ScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, x: i64, y: i64) -> Option<usize> {
        self.pixels.iter().position(|p| p.x == x && p.y == y)
    }
}

impl BackingStore for ScanStore {
    fn describe(&self) -> StoreDescriptor {
        StoreDescriptor {
            kind: StoreKind::Scan,
            len: self.pixels.len(),
        }
    }

    fn list(&self) -> Vec<Pixel> {
        self.pixels.clone()
    }

    fn get(&self, x: i64, y: i64) -> Option<Pixel> {
        let idx = self.position(x, y)?;
        Some(self.pixels[idx].clone())
    }

    fn upsert(&mut self, pixel: Pixel) -> Upsert {
        match self.position(pixel.x, pixel.y) {
            Some(idx) => {
                trace!("Replacing pixel {} at slot {}", pixel.loc(), idx);
                let slot = &mut self.pixels[idx];
                slot.color = pixel.color;
                slot.owner = pixel.owner;
                Upsert::Updated(slot.clone())
            }
            None => {
                trace!("Appending pixel {} at slot {}", pixel.loc(), self.pixels.len());
                self.pixels.push(pixel.clone());
                Upsert::Created(pixel)
            }
        }
    }

    fn delete(&mut self, x: i64, y: i64) -> Option<Pixel> {
        let idx = self.position(x, y)?;
        trace!("Removing pixel ({}, {}) from slot {}", x, y, idx);
        Some(self.pixels.remove(idx))
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }
}
