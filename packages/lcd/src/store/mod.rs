//! Typed caches, the composite `LcdStore`, and the pending-lookups table
//! (§4.1, §4.2, §4.3).

pub mod cache;
pub mod lcd_store;
pub mod pending;

pub use cache::{CachingStore, Store};
pub use lcd_store::{LcdStore, RemovedEntry, SweepResult};
pub use pending::{PendingLookupsTable, Waiter};
