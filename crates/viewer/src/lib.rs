//! Farm snapshot viewer core.
//!
//! Turns the periodic state reports of a farming simulation into animated
//! draw tokens: workers glide between locations, crops shrink as they are
//! watered, climate events and soups play short transient effects. Drawing
//! goes through [`engine::DrawSink`] so any backend can consume the output.

pub mod config;
pub mod farm;
pub mod map;
pub mod replay;
pub mod snapshot;

pub use config::{ConfigError, LayoutConfig, MapConfig, SpriteSet, ViewerConfig, CONFIG_ENV_VAR};
pub use farm::{Farm, Location, LocationTable, VisualEntity};
pub use map::{ring_layout, FarmMap, MAX_FARMS};
pub use replay::{load_replay, parse_replay, ReplayError};
pub use snapshot::{FarmSnapshot, FieldSnapshot, MapSnapshot, SoupFactorySnapshot, WorkerSnapshot};
