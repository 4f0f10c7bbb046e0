//! Identity token signing and verification
//!
//! A single HS256 codec bound to the process secret, shared by the gate
//! middleware and handler-side extractors so both paths stay behaviorally
//! identical.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Token lifetime, fixed at issuance
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Subject role carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform staff
    Admin,
    /// Tenant operator
    Client,
}

impl Role {
    /// Whether this role satisfies a route requirement
    pub fn satisfies(self, required: Role) -> bool {
        self == required || self == Role::Admin
    }
}

/// Signed identity claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject id
    pub sub: String,
    /// Subject email
    pub email: String,
    /// Subject role
    pub role: Role,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// HS256 token codec bound to the process secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the signing secret
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign claims with a 7-day expiry from now
    ///
    /// The same claims signed at different instants yield different tokens.
    pub fn sign(&self, sub: &str, email: &str, role: Role) -> Result<String, AuthError> {
        self.sign_at(sub, email, role, Utc::now().timestamp())
    }

    fn sign_at(&self, sub: &str, email: &str, role: Role, iat: i64) -> Result<String, AuthError> {
        let claims = Claims {
            sub: sub.to_string(),
            email: email.to_string(),
            role,
            iat,
            exp: iat + Duration::days(TOKEN_TTL_DAYS).num_seconds(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Decode and validate a token
    ///
    /// Returns `Some` only when the signature matches the process secret and
    /// the token is unexpired. Malformed, truncated, tampered,
    /// differently-signed, expired, or empty input all yield `None`; this
    /// never errors.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        if token.is_empty() {
            return None;
        }
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                tracing::debug!(error = %err, "token rejected");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_round_trip() {
        let codec = TokenCodec::new("test-secret");
        let token = codec
            .sign("user_1", "ops@acme.example", Role::Client)
            .unwrap();

        let claims = codec.verify(&token).expect("fresh token must verify");
        assert_eq!(claims.sub, "user_1");
        assert_eq!(claims.email, "ops@acme.example");
        assert_eq!(claims.role, Role::Client);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 86_400);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = TokenCodec::new("secret-a");
        let verifier = TokenCodec::new("secret-b");
        let token = signer.sign("user_1", "a@b.c", Role::Admin).unwrap();

        assert!(verifier.verify(&token).is_none());
    }

    #[test]
    fn test_truncated_token_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec.sign("user_1", "a@b.c", Role::Admin).unwrap();
        let truncated = &token[..token.len() - 5];

        assert!(codec.verify(truncated).is_none());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = TokenCodec::new("test-secret");
        let token = codec.sign("user_1", "a@b.c", Role::Client).unwrap();
        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = format!("x{}", &parts[1][1..]);
        let tampered = parts.join(".");

        assert!(codec.verify(&tampered).is_none());
    }

    #[test]
    fn test_empty_token_rejected() {
        let codec = TokenCodec::new("test-secret");
        assert!(codec.verify("").is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new("test-secret");
        // Issued 8 days ago, so the 7-day expiry has passed
        let iat = Utc::now().timestamp() - 8 * 86_400;
        let token = codec.sign_at("user_1", "a@b.c", Role::Admin, iat).unwrap();

        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn test_admin_satisfies_client_routes() {
        assert!(Role::Admin.satisfies(Role::Client));
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Client.satisfies(Role::Client));
        assert!(!Role::Client.satisfies(Role::Admin));
    }
}
