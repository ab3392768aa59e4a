//! Fire effects, their per-face placement table and the repeating igniter.

pub mod effect;
pub mod igniter;
pub mod table;

pub use effect::{FireEffect, AMBIENT_FIRE_EXTENTS, DEFAULT_FIRE_SCALE, IGNITED_FIRE_EXTENTS};
pub use igniter::{IgnitionTimer, DEFAULT_IGNITE_INTERVAL};
pub use table::FirePlacementTable;
