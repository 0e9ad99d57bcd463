//! Local Capabilities Directory core -- value types, QoS, errors, and the
//! routing-address variant shared between the directory runtime and its
//! RPC surface.
//!
//! - **Clock** ([`clock`]): `ClockSource`/`SystemClock`/`VirtualClock` time
//!   abstraction for deterministic testing of expiry and freshness logic.
//! - **Model** ([`model`]): `DiscoveryEntry`, `GlobalDiscoveryEntry`,
//!   `DiscoveryEntryWithMetaInfo`, `ProviderQos`, `ProviderVersion`.
//! - **Query** ([`query`]): `DiscoveryScope`, `DiscoveryQos` (the query-side
//!   lookup parameters, distinct from `ProviderQos`).
//! - **Error** ([`error`]): `DiscoveryError`, `ProviderRuntimeException`.
//! - **Address** ([`address`]): `RoutingAddress`, the tagged routing-address
//!   variant.

pub mod address;
pub mod clock;
pub mod error;
pub mod model;
pub mod query;

pub use address::RoutingAddress;
pub use clock::{ClockSource, SystemClock, VirtualClock};
pub use error::{DiscoveryError, ProviderRuntimeException};
pub use model::{
    CustomParameter, DiscoveryEntry, DiscoveryEntryWithMetaInfo, GlobalDiscoveryEntry,
    ProviderQos, ProviderScope, ProviderVersion, INTERNAL_PROVIDER_PARAMETER,
};
pub use query::{DiscoveryQos, DiscoveryScope, NO_MAX_AGE};
