// ── Fetch cache ──
//
// Single-writer, many-reader storage for the latest inventory snapshot.

mod cache;

pub use cache::{CacheHandle, Snapshot, UpdateStatus};
pub(crate) use cache::FetchCache;
