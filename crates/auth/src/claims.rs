use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use instawrite_core::UserId;

/// JWT claims model (transport-agnostic).
///
/// This is the minimal set of claims the blog API expects once a token has
/// been decoded and its signature verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClaims")]
pub struct JwtClaims {
    /// Subject / author identifier. Older tokens carry it as `id`.
    pub sub: UserId,

    /// Issued-at timestamp (seconds since epoch), if the issuer set one.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub iat: Option<DateTime<Utc>>,

    /// Expiration timestamp (seconds since epoch), if the issuer set one.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub exp: Option<DateTime<Utc>>,
}

/// Wire shape: `sub` and the legacy `id` are separate claims, and a token
/// may carry either or both. `sub` wins.
#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<UserId>,
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    iat: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    exp: Option<DateTime<Utc>>,
}

impl TryFrom<RawClaims> for JwtClaims {
    type Error = &'static str;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let sub = raw.sub.or(raw.id).ok_or("token carries neither `sub` nor `id`")?;
        Ok(Self {
            sub,
            iat: raw.iat,
            exp: raw.exp,
        })
    }
}

impl JwtClaims {
    pub fn new(sub: UserId) -> Self {
        Self {
            sub,
            iat: None,
            exp: None,
        }
    }

    pub fn with_window(mut self, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        self.iat = Some(issued_at);
        self.exp = Some(expires_at);
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Only the time window is checked, and only the bounds the issuer actually
/// set. Signature verification happens in [`crate::jwt`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if let (Some(iat), Some(exp)) = (claims.iat, claims.exp) {
        if exp <= iat {
            return Err(TokenValidationError::InvalidTimeWindow);
        }
    }
    if let Some(iat) = claims.iat {
        if now < iat {
            return Err(TokenValidationError::NotYetValid);
        }
    }
    if let Some(exp) = claims.exp {
        if now >= exp {
            return Err(TokenValidationError::Expired);
        }
    }
    Ok(())
}
