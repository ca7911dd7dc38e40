//! Wire shape of the state reports sent by the simulation.
//!
//! Location and crop names stay as strings here; they are resolved during
//! reconciliation so one unexpected value only degrades the entity carrying it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmSnapshot {
    pub blocked: bool,
    pub soup_factory: SoupFactorySnapshot,
    pub employees: Vec<WorkerSnapshot>,
    pub tractors: Vec<WorkerSnapshot>,
    pub fields: Vec<FieldSnapshot>,
    /// Free-text log lines emitted during this tick.
    pub events: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoupFactorySnapshot {
    pub days_off: u32,
}

/// An employee or a tractor: stable id plus where the simulation put it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub id: u64,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub location: String,
    #[serde(default = "empty_field_content")]
    pub content: String,
    #[serde(default)]
    pub needed_water: i64,
}

fn empty_field_content() -> String {
    "NONE".to_string()
}

/// One tick for every farm on the map, in player-slot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSnapshot {
    pub day: Option<u32>,
    pub farms: Vec<FarmSnapshot>,
}
