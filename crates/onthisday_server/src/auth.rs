//! Admin authentication: salted password digests and HS256 bearer tokens.

use std::collections::HashSet;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use jwt_simple::prelude::{Claims, Duration, HS256Key, JWTClaims, MACLike, VerificationOptions};
use onthisday_archive::config::{AdminAccount, JwtConfig};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_ROLE: &str = "Admin";

type HmacSha256 = Hmac<Sha256>;

fn keyed_mac(salt: &str) -> Result<HmacSha256, ApiError> {
    HmacSha256::new_from_slice(salt.as_bytes()).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Hex-encoded HMAC-SHA256 of `password` keyed by `salt`.
pub fn hash_password(salt: &str, password: &str) -> Result<String, ApiError> {
    let mut mac = keyed_mac(salt)?;
    mac.update(password.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison against a stored hex digest.
pub fn verify_password(salt: &str, password: &str, expected_hex: &str) -> bool {
    let Ok(expected) = hex::decode(expected_hex.trim()) else {
        return false;
    };
    match keyed_mac(salt) {
        Ok(mut mac) => {
            mac.update(password.as_bytes());
            mac.verify_slice(&expected).is_ok()
        }
        Err(_) => false,
    }
}

/// Check login credentials against the configured admin account.
///
/// `username_or_email` is matched case-insensitively after trimming.
pub fn authenticate(
    admin: &AdminAccount,
    username_or_email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let normalized = username_or_email.trim().to_uppercase();
    let known = normalized == admin.username.to_uppercase()
        || normalized == admin.email.to_uppercase();
    if !known || !admin.is_active {
        return Err(ApiError::Unauthorized(
            "Admin user not found or inactive.".into(),
        ));
    }

    let valid = verify_password(
        admin.password_salt.expose_secret(),
        password,
        admin.password_hash.expose_secret(),
    );
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username/email or password.".into(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminClaims {
    pub username: String,
    pub email: String,
    pub role: String,
}

#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TokenService {
    key: HS256Key,
    issuer: String,
    audience: String,
    lifetime_minutes: u64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            key: HS256Key::from_bytes(config.key.expose_secret().as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime_minutes: config.expiry_minutes,
        }
    }

    pub fn issue(&self, admin: &AdminAccount) -> Result<IssuedToken, ApiError> {
        let custom = AdminClaims {
            username: admin.username.clone(),
            email: admin.email.clone(),
            role: ADMIN_ROLE.into(),
        };
        let claims = Claims::with_custom_claims(custom, Duration::from_mins(self.lifetime_minutes))
            .with_issuer(&self.issuer)
            .with_audience(&self.audience)
            .with_subject(admin.id)
            .with_jwt_id(Uuid::new_v4());

        let expires_secs = claims
            .expires_at
            .map(|ts| ts.as_secs())
            .ok_or_else(|| ApiError::Internal("token has no expiry".into()))?;
        let expires_at = i64::try_from(expires_secs)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| ApiError::Internal("token expiry out of range".into()))?;

        let token = self
            .key
            .authenticate(claims)
            .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> Result<JWTClaims<AdminClaims>, ApiError> {
        let options = VerificationOptions {
            allowed_issuers: Some(HashSet::from([self.issuer.clone()])),
            allowed_audiences: Some(HashSet::from([self.audience.clone()])),
            ..Default::default()
        };
        self.key
            .verify_token::<AdminClaims>(token, Some(options))
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                ApiError::admin_required()
            })
    }
}

/// An authenticated administrator, extracted from `Authorization: Bearer <jwt>`.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(ApiError::admin_required)?;

        let claims = state.tokens.verify(token)?;
        if claims.custom.role != ADMIN_ROLE {
            return Err(ApiError::admin_required());
        }
        let id = claims
            .subject
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or_else(ApiError::admin_required)?;

        Ok(AdminUser {
            id,
            username: claims.custom.username,
            email: claims.custom.email,
        })
    }
}
