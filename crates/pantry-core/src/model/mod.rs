// ── Domain model ──

pub mod entity;
pub mod entry;
pub mod unit;

pub use entity::{Entity, EntitySnapshot, EntityState, PantrySensor};
pub use entry::{ConfigEntry, EntryData, ResolveStrategy};
pub use unit::normalize_unit;
