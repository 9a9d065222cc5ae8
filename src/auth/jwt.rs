//! JWT issuance and verification
//!
//! Two token classes share one claims shape:
//!
//! - **Session tokens** carry the user id plus name/email/avatar, expire
//!   after a short TTL, and are reissued on every authenticated query
//!   (sliding expiration).
//! - **Reset tokens** carry only the user id with a shorter TTL, travel as
//!   a URL parameter in the emailed reset link, and are only accepted by
//!   the resetPassword mutation.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::schemas::UserDoc;
use crate::types::DevLinkError;

/// JWT claims for both session and reset tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (ObjectId hex)
    pub sub: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Issued-at (seconds since epoch)
    pub iat: u64,

    /// Expiry (seconds since epoch)
    pub exp: u64,
}

/// Signs and verifies session and reset tokens with the server secret
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    session_ttl_seconds: u64,
    reset_ttl_seconds: u64,
}

impl TokenService {
    pub fn new(secret: String, session_ttl_seconds: u64, reset_ttl_seconds: u64) -> Self {
        Self {
            secret,
            session_ttl_seconds,
            reset_ttl_seconds,
        }
    }

    /// Issue a session token embedding the user's public identity fields
    pub fn issue_session(&self, user: &UserDoc) -> Result<String, DevLinkError> {
        let now = now_seconds();
        self.sign(Claims {
            sub: user.id_hex(),
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            avatar: Some(user.avatar.clone()),
            iat: now,
            exp: now + self.session_ttl_seconds,
        })
    }

    /// Issue a single-purpose password-reset token (user id only)
    pub fn issue_reset(&self, user_id: &str) -> Result<String, DevLinkError> {
        let now = now_seconds();
        self.sign(Claims {
            sub: user_id.to_string(),
            name: None,
            email: None,
            avatar: None,
            iat: now,
            exp: now + self.reset_ttl_seconds,
        })
    }

    /// Verify a token, failing on signature mismatch or expiry
    pub fn verify(&self, token: &str) -> Result<Claims, DevLinkError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| DevLinkError::Authentication("Invalid or expired token".into()))
    }

    fn sign(&self, claims: Claims) -> Result<String, DevLinkError> {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DevLinkError::Internal(format!("Failed to sign token: {e}")))
    }
}

fn now_seconds() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn service() -> TokenService {
        TokenService::new("test-secret".to_string(), 1800, 600)
    }

    fn user() -> UserDoc {
        let mut u = UserDoc::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$fake".to_string(),
            "https://example.com/a.png".to_string(),
        );
        u._id = Some(ObjectId::new());
        u
    }

    #[test]
    fn session_token_round_trips_identity() {
        let svc = service();
        let u = user();
        let token = svc.issue_session(&u).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, u.id_hex());
        assert_eq!(claims.name.as_deref(), Some("Alice"));
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn reset_token_carries_only_user_id() {
        let svc = service();
        let token = svc.issue_reset("507f1f77bcf86cd799439011").unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, "507f1f77bcf86cd799439011");
        assert!(claims.name.is_none());
        assert!(claims.email.is_none());
        assert!(claims.avatar.is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "x".to_string(),
            name: None,
            email: None,
            avatar: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = svc.sign(claims).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue_reset("abc").unwrap();
        let other = TokenService::new("other-secret".to_string(), 1800, 600);
        assert!(other.verify(&token).is_err());
    }
}
