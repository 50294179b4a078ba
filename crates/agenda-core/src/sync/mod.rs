//! Cross-display synchronization.
//!
//! A leader display publishes its status as a small JSON snapshot into a
//! shared channel once a second; follower displays read the newest snapshot,
//! drop it if it is stale or their own, and force their engine to match.

pub mod broadcaster;
pub mod channel;
pub mod types;


pub use broadcaster::SyncBroadcaster;
pub use channel::{FileChannel, MemoryChannel, SyncChannel};
pub use types::{new_display_id, SyncError, SyncMode, SyncSnapshot, DEFAULT_STALENESS_MS};
