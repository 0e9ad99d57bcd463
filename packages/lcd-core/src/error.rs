//! Error taxonomy (§7): `DiscoveryError` for remote-directory outcomes,
//! `ProviderRuntimeException` for local precondition/permission failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote-directory outcome codes, returned verbatim from a failed GCD call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryError {
    #[error("invalid GBID")]
    InvalidGbid,
    #[error("unknown GBID")]
    UnknownGbid,
    #[error("internal error")]
    InternalError,
    #[error("no entry for participant")]
    NoEntryForParticipant,
    #[error("no entry for the selected backends")]
    NoEntryForSelectedBackends,
}

/// Local precondition or permission failure (never a remote-directory
/// outcome). Carries a human-readable message, matching the joynr
/// `ProviderRuntimeException` constructor taking a free-form string.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ProviderRuntimeException(pub String);

impl ProviderRuntimeException {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_error_serde_round_trip() {
        for err in [
            DiscoveryError::InvalidGbid,
            DiscoveryError::UnknownGbid,
            DiscoveryError::InternalError,
            DiscoveryError::NoEntryForParticipant,
            DiscoveryError::NoEntryForSelectedBackends,
        ] {
            let json = serde_json::to_string(&err).unwrap();
            let decoded: DiscoveryError = serde_json::from_str(&json).unwrap();
            assert_eq!(err, decoded);
        }
    }

    #[test]
    fn provider_runtime_exception_displays_message() {
        let err = ProviderRuntimeException::new("provider does not have permissions");
        assert_eq!(err.to_string(), "provider does not have permissions");
    }
}
