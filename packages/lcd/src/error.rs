//! Per-operation-family error enums (§7), each convertible into the
//! caller-facing `DiscoveryError`/`ProviderRuntimeException` pair from
//! `lcd-core`. Mirrors the teacher's per-domain `OperationError`/
//! `ClassifyError` split (`service/operation.rs`): one `thiserror` enum per
//! failure domain, `anyhow` reserved for process/IO boundaries.

use lcd_core::{DiscoveryError, ProviderRuntimeException};
use thiserror::Error;

/// The GCD call itself failed at the transport layer, or returned a mapped
/// `DiscoveryError` app-error. Corresponds to `JoynrRuntimeException` /
/// `DiscoveryError` in §7.
#[derive(Debug, Clone, Error)]
pub enum GcdCallError {
    #[error(transparent)]
    App(#[from] DiscoveryError),
    #[error("{0}")]
    Runtime(String),
}

impl GcdCallError {
    /// Maps a failed `gcd.add` into the caller-facing error for §4.5 point 5:
    /// app errors propagate verbatim, runtime errors become a
    /// `ProviderRuntimeException` with the literal wrapped in the message.
    #[must_use]
    pub fn into_add_error(self, participant_id: &str) -> AddError {
        match self {
            GcdCallError::App(e) => AddError::Discovery(e),
            GcdCallError::Runtime(msg) => {
                AddError::Permission(ProviderRuntimeException::new(format!(
                    "Error registering provider {participant_id} in default backend: {msg}"
                )))
            }
        }
    }
}

/// Error surface of [`crate::directory::LocalCapabilitiesDirectory::add`] /
/// `add_to_all`.
#[derive(Debug, Clone, Error)]
pub enum AddError {
    #[error(transparent)]
    Permission(#[from] ProviderRuntimeException),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Error surface of [`crate::directory::LocalCapabilitiesDirectory::remove`].
#[derive(Debug, Clone, Error)]
pub enum RemoveError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Error surface of the `lookup` overloads.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error(transparent)]
    Permission(#[from] ProviderRuntimeException),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcd_runtime_error_becomes_permission_error_with_literal() {
        let err = GcdCallError::Runtime("connection refused".to_string());
        let add_err = err.into_add_error("p1");
        match add_err {
            AddError::Permission(e) => {
                assert!(e.to_string().contains("p1"));
                assert!(e.to_string().contains("connection refused"));
            }
            AddError::Discovery(_) => panic!("expected Permission variant"),
        }
    }

    #[test]
    fn gcd_app_error_propagates_verbatim() {
        let err = GcdCallError::App(DiscoveryError::InvalidGbid);
        let add_err = err.into_add_error("p1");
        assert!(matches!(add_err, AddError::Discovery(DiscoveryError::InvalidGbid)));
    }
}
