//! Backend-neutral 2D primitives for map views: local-to-map placement, the
//! approach smoothing rule, and an owned list of draw tokens.

pub mod app;
mod sprite_keys;

pub use app::{
    approach, approach_scalar, DrawHandle, DrawHandleAllocator, DrawList, DrawSink, DrawToken,
    MapPlacement, RecordingSink, Vec2, APPROACH_FACTOR, OPAQUE_ALPHA,
};
pub use sprite_keys::{SpriteKey, SpriteKeyError};
