//! Request authorization core
//!
//! Decides, for every inbound request, whether it is authenticated, which
//! tenant and role it belongs to, whether the role permits the requested
//! action, and whether the caller is within its request rate:
//! - Token codec: compact signed identity tokens (HS256, 7-day expiry)
//! - Identity extractor: auth cookie and proxy-header client address
//! - Request gate: public / protected / auth-entry route policy
//! - RBAC table: closed action set mapped to permitted roles
//! - Tenant directory: status enforcement and atomic usage counters
//! - Rate limiter: per-key fixed-window accept/reject
//!
//! The surrounding product (page rendering, admin CRUD, dashboards) calls
//! into this crate and renders whatever it returns.

pub mod config;
pub mod error;
pub mod extract;
pub mod gate;
pub mod ratelimit;
pub mod rbac;
pub mod tenant;
pub mod token;

use std::sync::Arc;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use gate::{gate_middleware, AuthUser, GateConfig, GateDecision, RequestGate, RouteTable};
pub use ratelimit::RateLimiter;
pub use rbac::{Action, PermissionTable};
pub use tenant::{TenantDirectory, TenantRecord};
pub use token::{Claims, Role, TokenCodec};

/// Shared authorization state for an axum application
///
/// One codec instance backs both the gate middleware and handler-side
/// signing, so the two verification paths cannot drift.
pub struct AuthState {
    /// Token codec shared by gate and handlers
    pub codec: Arc<TokenCodec>,
    /// Request gate
    pub gate: Arc<RequestGate>,
    /// Tenant directory
    pub tenants: Arc<TenantDirectory>,
    /// Permission table
    pub permissions: Arc<PermissionTable>,
}

impl AuthState {
    /// Assemble the full authorization state from configuration
    pub fn new(config: AuthConfig, routes: RouteTable) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.jwt_secret));
        let gate = Arc::new(RequestGate::new(
            codec.clone(),
            routes,
            config.gate.clone(),
            config.cookie_name.clone(),
        ));

        Self {
            codec,
            gate,
            tenants: Arc::new(TenantDirectory::new()),
            permissions: Arc::new(PermissionTable::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_shares_codec() {
        let state = AuthState::new(
            AuthConfig::default(),
            RouteTable::new().protect("/admin", Role::Admin),
        );

        // A token signed through the shared codec passes the gate
        let token = state.codec.sign("u", "a@b.c", Role::Admin).unwrap();
        match state.gate.evaluate("/admin", Some(&token)) {
            GateDecision::Allow { claims: Some(_) } => {}
            other => panic!("expected allow, got {:?}", other),
        }
    }
}
