//! Error types for token signing, decoding and claims validation

use thiserror::Error;

/// Result alias used throughout the crate
pub type JwtResult<T> = Result<T, JwtError>;

/// Everything that can go wrong while issuing or accepting a token.
///
/// The structural kinds (`MalformedToken`), the key kinds (`InvalidKey`) and
/// the cryptographic kinds (`SignatureMismatch`) are kept apart so callers
/// can tell a garbage token from a forged one from a configuration mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// The key's family does not match what the algorithm requires
    #[error("{key} key cannot be used with {alg}")]
    InvalidKey {
        /// Algorithm that rejected the key
        alg: &'static str,
        /// Kind of key that was supplied
        key: &'static str,
    },
    /// Wrong segment count, bad base64url, or an unreadable header
    #[error("malformed token: {0}")]
    MalformedToken(&'static str),
    /// The token is well formed but its signature does not verify
    #[error("token signature mismatch")]
    SignatureMismatch,
    /// The underlying primitive could not produce a signature
    #[error("signing failed: {0}")]
    SigningFailed(String),
    /// The token header names an algorithm this crate does not know
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// The token header names a known algorithm other than the verifying one
    #[error("algorithm mismatch: expected {expected}, token uses {found}")]
    AlgorithmMismatch {
        /// Algorithm the caller verifies with
        expected: &'static str,
        /// Algorithm named by the token header
        found: String,
    },
    /// `exp` is in the past
    #[error("token expired")]
    Expired,
    /// `nbf` is in the future
    #[error("token not valid yet")]
    NotValidYet,
    /// `iat` is in the future
    #[error("token issued in the future")]
    IssuedInTheFuture,
    /// `iat` is older than the configured maximum age
    #[error("token is older than the allowed maximum age")]
    TokenTooOld,
    /// A claim required by the validation options is absent
    #[error("missing required claim: {0}")]
    MissingClaim(String),
    /// `iss` does not match the expected issuer
    #[error("unexpected token issuer")]
    InvalidIssuer,
    /// `sub` does not match the expected subject
    #[error("unexpected token subject")]
    InvalidSubject,
    /// `jti` does not match the expected id
    #[error("unexpected token id")]
    InvalidId,
    /// `aud` does not contain any of the expected audiences
    #[error("unexpected token audience")]
    InvalidAudience,
    /// A caller-supplied validator rejected the claims
    #[error("claims rejected: {0}")]
    InvalidClaims(String),
    /// JSON serialization or deserialization of header or claims failed
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl JwtError {
    /// Create an invalid key error
    #[inline]
    #[must_use]
    pub fn invalid_key(alg: &'static str, key: &'static str) -> Self {
        JwtError::InvalidKey { alg, key }
    }

    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(reason: &'static str) -> Self {
        JwtError::MalformedToken(reason)
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing_failed(msg: impl std::fmt::Display) -> Self {
        JwtError::SigningFailed(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl std::fmt::Display) -> Self {
        JwtError::Serialization(msg.to_string())
    }

    /// Create an invalid claims error
    #[inline]
    #[must_use]
    pub fn invalid_claims(msg: impl std::fmt::Display) -> Self {
        JwtError::InvalidClaims(msg.to_string())
    }

    /// True for the validity-window failures (`Expired`, `NotValidYet`,
    /// `IssuedInTheFuture`, `TokenTooOld`)
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            JwtError::Expired
                | JwtError::NotValidYet
                | JwtError::IssuedInTheFuture
                | JwtError::TokenTooOld
        )
    }

    /// True when the token could not even be taken apart
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            JwtError::MalformedToken(_)
                | JwtError::UnsupportedAlgorithm(_)
                | JwtError::AlgorithmMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::serialization(err)
    }
}
