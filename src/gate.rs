//! Request gate
//!
//! Classifies each inbound path as public, protected, or auth-entry and
//! turns the token state into an allow or redirect decision before any
//! downstream handler runs. Verification failures are treated as "no
//! identity", never as errors.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::extract::token_from_cookie;
use crate::token::{Claims, Role, TokenCodec};

/// Route classification for gate decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a valid token whose role satisfies `required`
    Protected {
        /// Role the route demands
        required: Role,
    },
    /// Login/signup pages that redirect authenticated users away
    AuthEntry,
}

#[derive(Debug, Clone)]
struct RouteRule {
    prefix: String,
    class: RouteClass,
}

/// Ordered path-prefix rules; first match wins, unmatched paths are public
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Empty table (everything public)
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a protected prefix
    pub fn protect(mut self, prefix: &str, required: Role) -> Self {
        self.rules.push(RouteRule {
            prefix: prefix.to_string(),
            class: RouteClass::Protected { required },
        });
        self
    }

    /// Append an auth-entry prefix
    pub fn auth_entry(mut self, prefix: &str) -> Self {
        self.rules.push(RouteRule {
            prefix: prefix.to_string(),
            class: RouteClass::AuthEntry,
        });
        self
    }

    /// Classify a path; `None` means public
    pub fn classify(&self, path: &str) -> Option<RouteClass> {
        self.rules
            .iter()
            .find(|rule| path.starts_with(&rule.prefix))
            .map(|rule| rule.class)
    }
}

/// Redirect targets used by the gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Where unauthenticated protected-route requests go
    pub login_path: String,
    /// Landing page for insufficient role and client sign-ins
    pub default_path: String,
    /// Landing page for admin sign-ins
    pub admin_home: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            default_path: "/".to_string(),
            admin_home: "/admin".to_string(),
        }
    }
}

/// Terminal gate outcomes
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Forward to the downstream handler, with decoded claims when present
    Allow {
        /// Verified identity, forwarded so handlers do not re-verify
        claims: Option<Claims>,
    },
    /// Redirect instead of handling
    Redirect {
        /// Redirect target
        location: String,
    },
}

/// Per-request authorization gate
///
/// Shares one [`TokenCodec`] with the rest of the application so the
/// middleware path and handler path cannot drift.
pub struct RequestGate {
    codec: Arc<TokenCodec>,
    routes: RouteTable,
    config: GateConfig,
    cookie_name: String,
}

impl RequestGate {
    /// Build a gate over a route table
    pub fn new(
        codec: Arc<TokenCodec>,
        routes: RouteTable,
        config: GateConfig,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            codec,
            routes,
            config,
            cookie_name: cookie_name.into(),
        }
    }

    /// Cookie the gate reads the token from
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Evaluate one request
    ///
    /// Protected: no or invalid token redirects to login, insufficient role
    /// redirects to the default page, otherwise allow with claims attached.
    /// Auth-entry: a valid token redirects to the role landing page,
    /// otherwise allow. Public: always allow.
    pub fn evaluate(&self, path: &str, token: Option<&str>) -> GateDecision {
        let claims = token.and_then(|t| self.codec.verify(t));

        match self.routes.classify(path) {
            Some(RouteClass::Protected { required }) => match claims {
                None => GateDecision::Redirect {
                    location: self.config.login_path.clone(),
                },
                Some(claims) if claims.role.satisfies(required) => GateDecision::Allow {
                    claims: Some(claims),
                },
                Some(_) => GateDecision::Redirect {
                    location: self.config.default_path.clone(),
                },
            },
            Some(RouteClass::AuthEntry) => match claims {
                Some(claims) => GateDecision::Redirect {
                    location: match claims.role {
                        Role::Admin => self.config.admin_home.clone(),
                        Role::Client => self.config.default_path.clone(),
                    },
                },
                None => GateDecision::Allow { claims: None },
            },
            None => GateDecision::Allow { claims },
        }
    }
}

/// Gate middleware for `axum::middleware::from_fn_with_state`
///
/// Evaluated once per request, before the downstream handler. Verified
/// claims ride request extensions; redirects short-circuit the handler.
pub async fn gate_middleware(
    State(gate): State<Arc<RequestGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = token_from_cookie(request.headers(), gate.cookie_name());

    match gate.evaluate(request.uri().path(), token.as_deref()) {
        GateDecision::Allow { claims } => {
            if let Some(claims) = claims {
                request.extensions_mut().insert(claims);
            }
            next.run(request).await
        }
        GateDecision::Redirect { location } => {
            tracing::debug!(path = %request.uri().path(), location = %location, "gate redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}

/// Verified identity extractor for downstream handlers
///
/// Reads the claims the gate forwarded; handlers never re-verify the token.
/// Rejects with 401 when the gate attached no identity (public route, no
/// cookie).
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AuthError::Authentication("no identity on request".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> (RequestGate, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new("gate-secret"));
        let routes = RouteTable::new()
            .protect("/admin", Role::Admin)
            .protect("/account", Role::Client)
            .auth_entry("/login")
            .auth_entry("/signup");
        (
            RequestGate::new(codec.clone(), routes, GateConfig::default(), "auth_token"),
            codec,
        )
    }

    fn is_redirect_to(decision: &GateDecision, target: &str) -> bool {
        matches!(decision, GateDecision::Redirect { location } if location == target)
    }

    #[test]
    fn test_protected_without_token_redirects_to_login() {
        let (gate, _) = gate();
        let decision = gate.evaluate("/admin/tenants", None);
        assert!(is_redirect_to(&decision, "/login"));
    }

    #[test]
    fn test_protected_with_invalid_token_redirects_to_login() {
        let (gate, _) = gate();
        let decision = gate.evaluate("/admin/tenants", Some("not-a-token"));
        assert!(is_redirect_to(&decision, "/login"));

        let other = TokenCodec::new("other-secret");
        let forged = other.sign("u", "a@b.c", Role::Admin).unwrap();
        let decision = gate.evaluate("/admin/tenants", Some(&forged));
        assert!(is_redirect_to(&decision, "/login"));
    }

    #[test]
    fn test_protected_with_sufficient_role_allows() {
        let (gate, codec) = gate();
        let token = codec.sign("u", "staff@platform.example", Role::Admin).unwrap();

        match gate.evaluate("/admin/tenants", Some(&token)) {
            GateDecision::Allow { claims: Some(claims) } => {
                assert_eq!(claims.role, Role::Admin);
                assert_eq!(claims.email, "staff@platform.example");
            }
            other => panic!("expected allow with claims, got {:?}", other),
        }
    }

    #[test]
    fn test_protected_with_insufficient_role_redirects_to_default() {
        let (gate, codec) = gate();
        let token = codec.sign("u", "ops@acme.example", Role::Client).unwrap();

        let decision = gate.evaluate("/admin/tenants", Some(&token));
        assert!(is_redirect_to(&decision, "/"));
    }

    #[test]
    fn test_auth_entry_redirects_by_role() {
        let (gate, codec) = gate();

        let admin = codec.sign("u", "a@b.c", Role::Admin).unwrap();
        assert!(is_redirect_to(&gate.evaluate("/login", Some(&admin)), "/admin"));

        let client = codec.sign("u", "a@b.c", Role::Client).unwrap();
        assert!(is_redirect_to(&gate.evaluate("/login", Some(&client)), "/"));
        assert!(is_redirect_to(&gate.evaluate("/signup", Some(&client)), "/"));
    }

    #[test]
    fn test_auth_entry_without_token_allows() {
        let (gate, _) = gate();
        assert_eq!(
            gate.evaluate("/login", None),
            GateDecision::Allow { claims: None }
        );
        assert_eq!(
            gate.evaluate("/login", Some("garbage")),
            GateDecision::Allow { claims: None }
        );
    }

    #[test]
    fn test_public_always_allows() {
        let (gate, codec) = gate();
        assert_eq!(
            gate.evaluate("/pricing", None),
            GateDecision::Allow { claims: None }
        );

        // A valid token on a public path is forwarded, not required
        let token = codec.sign("u", "a@b.c", Role::Client).unwrap();
        match gate.evaluate("/pricing", Some(&token)) {
            GateDecision::Allow { claims: Some(_) } => {}
            other => panic!("expected allow with claims, got {:?}", other),
        }
    }

    #[test]
    fn test_auth_user_extractor_reads_forwarded_claims() {
        use axum::extract::FromRequestParts;

        let (_, codec) = gate();
        let token = codec.sign("u", "a@b.c", Role::Client).unwrap();
        let claims = codec.verify(&token).unwrap();

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/account")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(claims.clone());

        let AuthUser(got) =
            tokio_test::block_on(AuthUser::from_request_parts(&mut parts, &())).unwrap();
        assert_eq!(got, claims);
    }

    #[test]
    fn test_auth_user_extractor_rejects_without_identity() {
        use axum::extract::FromRequestParts;

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/account")
            .body(())
            .unwrap()
            .into_parts();

        let err = tokio_test::block_on(AuthUser::from_request_parts(&mut parts, &()))
            .unwrap_err();
        assert!(matches!(err, AuthError::Authentication(_)));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let codec = Arc::new(TokenCodec::new("gate-secret"));
        let routes = RouteTable::new()
            .protect("/admin/login", Role::Admin)
            .auth_entry("/admin");
        let gate = RequestGate::new(codec, routes, GateConfig::default(), "auth_token");

        assert!(is_redirect_to(&gate.evaluate("/admin/login", None), "/login"));
        assert_eq!(
            gate.evaluate("/admin", None),
            GateDecision::Allow { claims: None }
        );
    }
}
