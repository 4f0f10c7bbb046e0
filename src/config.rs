//! Process configuration

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::gate::GateConfig;

/// Environment variable holding the signing secret
pub const SECRET_ENV: &str = "AUTHGATE_JWT_SECRET";

/// Environment variable overriding the auth cookie name
pub const COOKIE_ENV: &str = "AUTHGATE_COOKIE_NAME";

/// Development placeholder secret; tokens signed with it are forgeable
const INSECURE_SECRET: &str = "dev-secret-change-me";

/// Authorization core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Cookie carrying the identity token
    pub cookie_name: String,
    /// Redirect targets for the gate
    pub gate: GateConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: INSECURE_SECRET.to_string(),
            cookie_name: "auth_token".to_string(),
            gate: GateConfig::default(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from the environment
    ///
    /// A missing or empty secret is rejected. The development placeholder
    /// is accepted but flagged loudly.
    pub fn from_env() -> Result<Self, AuthError> {
        let jwt_secret = std::env::var(SECRET_ENV)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthError::Configuration(format!("{} is not set", SECRET_ENV)))?;

        if jwt_secret == INSECURE_SECRET {
            tracing::warn!(
                "signing secret is the development placeholder; tokens are forgeable"
            );
        }

        let cookie_name =
            std::env::var(COOKIE_ENV).unwrap_or_else(|_| "auth_token".to_string());

        Ok(Self {
            jwt_secret,
            cookie_name,
            gate: GateConfig::default(),
        })
    }
}
