//! Access controller collaborator (§6 "Consumed from collaborators").
//!
//! Trait-only contract with no bundled policy engine, the same way
//! `cluster::traits::MembershipService` is a pure contract implemented
//! elsewhere by the concrete cluster node. Per the design note "Global
//! mutable call context" (§9), the caller's `user_id` is threaded explicitly
//! through every call site that needs it -- there is deliberately no
//! process-wide `CallContext` type in this crate.

use async_trait::async_trait;

/// Trust level at which access is checked. The LCD always checks at `High`
/// (§4.5 point 1); the variant exists so a richer policy engine elsewhere
/// can still implement this trait against a shared vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustLevel {
    Low,
    Mid,
    High,
}

#[async_trait]
pub trait AccessController: Send + Sync {
    /// Returns `true` if `user_id` may register a provider on `(domain,
    /// interface_name)` at the given trust level.
    async fn has_provider_permission(
        &self,
        user_id: &str,
        trust_level: TrustLevel,
        domain: &str,
        interface_name: &str,
    ) -> bool;
}

/// Permissive policy used when `enable_access_controller = false`, and in
/// tests that don't exercise the permission path.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAllAccessController;

#[async_trait]
impl AccessController for AllowAllAccessController {
    async fn has_provider_permission(
        &self,
        _user_id: &str,
        _trust_level: TrustLevel,
        _domain: &str,
        _interface_name: &str,
    ) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allow_all_grants_any_request() {
        let controller = AllowAllAccessController;
        assert!(controller.has_provider_permission("alice", TrustLevel::High, "d", "I").await);
    }
}
