//! GCD client adapter (§4.4).

pub mod client;
pub mod testing;

pub use client::{validate_gbids, GcdClient, GcdRemoveOutcome};
pub use testing::{InMemoryGcdClient, RecordedCall};
