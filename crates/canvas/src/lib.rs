//! Pixel storage for a shared "place"-style canvas.
//!
//! A [`Canvas`] owns one [`BackingStore`] and serializes every operation on
//! it. Pixels are keyed by their `(x, y)` pair; the last write to a pair wins
//! and nothing about earlier states is retained.

pub mod backing_store;
pub mod canvas;
pub mod types;

pub use backing_store::{BackingStore, StoreDescriptor, StoreKind};
pub use canvas::Canvas;
pub use types::{HexColor, Owner, Pixel, PixelError, PixelLoc, Standing, Upsert};
