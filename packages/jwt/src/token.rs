//! Issuing and accepting tokens with standard claims

use chrono::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::algorithms::Algorithm;
use crate::claims::{Claims, merge};
use crate::clock::Clock;
use crate::codec::{decode_token, encode, encode_raw};
use crate::error::JwtResult;
use crate::header::Header;
use crate::key::Key;
use crate::validation::Validation;

/// Extra settings applied when issuing a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Standard claims merged after the caller's claims.
    pub claims: Claims,
    /// When set, `iat` becomes now and `exp` now plus this duration.
    pub max_age: Option<Duration>,
}

impl SignOptions {
    /// Empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge these standard claims into the payload.
    #[must_use]
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.claims = claims;
        self
    }

    /// Stamp `iat` and `exp` from the signing clock.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }
}

/// Sign `claims` as they are.
///
/// # Errors
/// See [`encode`].
pub fn sign<'k, C>(alg: &dyn Algorithm, key: impl Into<Key<'k>>, claims: &C) -> JwtResult<String>
where
    C: Serialize + ?Sized,
{
    encode(alg, key, claims)
}

/// Sign `claims` merged with the standard claims from `options`.
///
/// # Errors
/// `Serialization` when the claims are not a JSON object, otherwise see
/// [`encode`].
pub fn sign_with<'k, C>(
    alg: &dyn Algorithm,
    key: impl Into<Key<'k>>,
    claims: &C,
    options: &SignOptions,
    clock: &dyn Clock,
) -> JwtResult<String>
where
    C: Serialize + ?Sized,
{
    let mut standard = options.claims.clone();
    if let Some(max_age) = options.max_age {
        standard.set_max_age(clock.now(), max_age);
    }
    let payload = merge(claims, &standard)?;
    encode_raw(alg, key, &payload)
}

/// A token whose signature verified and whose claims passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    token: String,
    header: Header,
    payload: Vec<u8>,
    standard: Claims,
}

impl VerifiedToken {
    /// The compact token as received.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Decoded header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decoded payload bytes (JSON).
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Registered claims found in the payload.
    #[must_use]
    pub fn standard(&self) -> &Claims {
        &self.standard
    }

    /// Deserialize the payload into a caller type.
    ///
    /// # Errors
    /// `Serialization` when the payload does not fit `T`.
    pub fn claims<T: DeserializeOwned>(&self) -> JwtResult<T> {
        Ok(serde_json::from_slice(&self.payload)?)
    }
}

/// Decode a token, verify its signature, then validate its claims.
///
/// # Errors
/// Any codec error (see [`crate::decode`]), `Serialization` when the payload
/// does not hold well-typed standard claims, or the first failing check of
/// `validation`.
pub fn verify<'k>(
    alg: &dyn Algorithm,
    key: impl Into<Key<'k>>,
    token: &str,
    validation: &Validation,
    clock: &dyn Clock,
) -> JwtResult<VerifiedToken> {
    let (header, payload) = decode_token(alg, key.into(), token)?;
    let standard: Claims = serde_json::from_slice(&payload)?;

    let verified = VerifiedToken {
        token: token.to_string(),
        header,
        payload,
        standard,
    };
    if let Err(err) = validation.check(clock.now(), &verified) {
        tracing::debug!(alg = alg.name(), error = %err, "token rejected");
        return Err(err);
    }
    Ok(verified)
}
