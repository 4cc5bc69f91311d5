//! Signed, time-limited session tokens.
//!
//! A token is `base64url(claims) "." base64url(hmac)`, where the claims are
//! a JSON object `{sub, role, iat, exp}` and the MAC is HMAC-SHA256 over the
//! encoded claims segment. Timestamps are Unix seconds.

use crate::identity::domain::{AccessRole, Identity, UserId};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default validity window for issued tokens.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;

/// Longest accepted validity window: one leap year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 366 * 24;

/// Errors raised while configuring the codec or issuing tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The signing secret was empty.
    #[error("token signing secret must not be empty")]
    EmptySecret,

    /// The validity window was zero or negative.
    #[error("token lifetime must be positive")]
    NonPositiveTtl,

    /// The validity window exceeds [`MAX_TOKEN_TTL_HOURS`].
    #[error("token lifetime must not exceed {max} hours", max = MAX_TOKEN_TTL_HOURS)]
    TtlTooLong,

    /// The expiry instant falls outside the representable range.
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    /// The claims could not be serialized.
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// An issued session token and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Returns the opaque token string handed to the client.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Consumes the token, returning the opaque string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.value
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: UserId,
    role: AccessRole,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HMAC-signed session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    mac: HmacSha256,
    ttl: TimeDelta,
}

impl TokenCodec {
    /// Creates a codec signing with `secret` and issuing tokens valid for
    /// `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::EmptySecret`] for an empty secret,
    /// [`TokenError::NonPositiveTtl`] for a zero or negative lifetime, and
    /// [`TokenError::TtlTooLong`] past [`MAX_TOKEN_TTL_HOURS`].
    pub fn new(secret: &[u8], ttl: TimeDelta) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        if ttl <= TimeDelta::zero() {
            return Err(TokenError::NonPositiveTtl);
        }
        if ttl.num_hours() > MAX_TOKEN_TTL_HOURS {
            return Err(TokenError::TtlTooLong);
        }
        let mac = HmacSha256::new_from_slice(secret).map_err(|_| TokenError::EmptySecret)?;
        Ok(Self { mac, ttl })
    }

    /// Returns the validity window of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issues a token for `identity`, valid from `now` for the configured
    /// lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::ExpiryOutOfRange`] when `now` plus the lifetime
    /// overflows and [`TokenError::Encoding`] if the claims cannot be
    /// serialized.
    pub fn issue(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: identity.user_id(),
            role: identity.role(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let json =
            serde_json::to_vec(&claims).map_err(|err| TokenError::Encoding(err.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes()));

        Ok(SessionToken {
            value: format!("{payload}.{signature}"),
            expires_at,
        })
    }

    /// Verifies a token and returns the identity it was issued for.
    ///
    /// Returns `None` for malformed, tampered, or expired tokens; callers
    /// cannot tell these cases apart.
    #[must_use]
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
        let (payload, signature) = token.split_once('.')?;
        let signature_bytes = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature_bytes).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let claims: Claims = serde_json::from_slice(&json).ok()?;
        if claims.exp <= now.timestamp() || claims.iat > claims.exp {
            return None;
        }
        Some(Identity::new(claims.sub, claims.role))
    }

    fn sign(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}
