//! Claims validation: the temporal window check and configurable
//! expectations applied after a signature has been verified.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::claims::{Claims, asserted};
use crate::error::{JwtError, JwtResult};
use crate::token::VerifiedToken;

/// Check the `nbf`, `iat` and `exp` claims against `now`.
///
/// `now` is floored to whole seconds. Unset, zero or negative timestamps
/// are skipped. The first failing check wins, in the order `nbf`, `iat`,
/// `exp`. A token expiring at `T` is still valid at `T`.
///
/// # Errors
/// `NotValidYet`, `IssuedInTheFuture` or `Expired`.
pub fn validate(now: DateTime<Utc>, claims: &Claims) -> JwtResult<()> {
    validate_window(now, claims, Duration::zero())
}

/// [`validate`] with `leeway` of tolerated clock skew in both directions.
///
/// # Errors
/// Same as [`validate`].
pub fn validate_window(now: DateTime<Utc>, claims: &Claims, leeway: Duration) -> JwtResult<()> {
    let now = now.timestamp();
    let leeway = leeway.num_seconds().max(0);

    if asserted(claims.nbf).is_some_and(|nbf| now.saturating_add(leeway) < nbf) {
        return Err(JwtError::NotValidYet);
    }
    if asserted(claims.iat).is_some_and(|iat| now.saturating_add(leeway) < iat) {
        return Err(JwtError::IssuedInTheFuture);
    }
    if asserted(claims.exp).is_some_and(|exp| now.saturating_sub(leeway) > exp) {
        return Err(JwtError::Expired);
    }
    Ok(())
}

/// Custom check run against a verified token
pub type Validator = Arc<dyn Fn(&VerifiedToken) -> JwtResult<()> + Send + Sync>;

/// Token validation options.
///
/// The default checks only the validity window, with no leeway.
#[derive(Clone, Default)]
pub struct Validation {
    /// Tolerated clock skew for the time-based claims.
    pub leeway: Duration,
    /// Maximum age measured from `iat`; requires `iat` when set.
    pub max_age: Option<Duration>,
    /// Claim names that must be present (and not null) in the payload.
    pub required_claims: Vec<String>,
    /// Expected issuer.
    pub expected_issuer: Option<String>,
    /// Expected subject.
    pub expected_subject: Option<String>,
    /// Expected token id.
    pub expected_id: Option<String>,
    /// Accepted audiences; the token must name at least one of them.
    pub expected_audience: Option<Vec<String>>,
    validators: Vec<Validator>,
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("leeway", &self.leeway)
            .field("max_age", &self.max_age)
            .field("required_claims", &self.required_claims)
            .field("expected_issuer", &self.expected_issuer)
            .field("expected_subject", &self.expected_subject)
            .field("expected_id", &self.expected_id)
            .field("expected_audience", &self.expected_audience)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl Validation {
    /// Options that check only the validity window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time leeway for validation.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Reject tokens issued more than `max_age` ago.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Add a required claim.
    #[must_use]
    pub fn require_claim(mut self, claim: impl Into<String>) -> Self {
        self.required_claims.push(claim.into());
        self
    }

    /// Set expected issuer.
    #[must_use]
    pub fn expect_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Set expected subject.
    #[must_use]
    pub fn expect_subject(mut self, subject: impl Into<String>) -> Self {
        self.expected_subject = Some(subject.into());
        self
    }

    /// Set expected token id.
    #[must_use]
    pub fn expect_id(mut self, id: impl Into<String>) -> Self {
        self.expected_id = Some(id.into());
        self
    }

    /// Set accepted audiences.
    #[must_use]
    pub fn expect_audience<I, S>(mut self, audience: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_audience = Some(audience.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a custom check, run after the built-in ones.
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&VerifiedToken) -> JwtResult<()> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Run every configured check against a verified token.
    ///
    /// # Errors
    /// The first failing check's error.
    pub fn check(&self, now: DateTime<Utc>, token: &VerifiedToken) -> JwtResult<()> {
        let claims = token.standard();
        validate_window(now, claims, self.leeway)?;

        if let Some(max_age) = self.max_age {
            let iat = asserted(claims.iat).ok_or_else(|| JwtError::MissingClaim("iat".into()))?;
            let age = now.timestamp().saturating_sub(iat);
            if age > max_age.num_seconds().saturating_add(self.leeway.num_seconds().max(0)) {
                return Err(JwtError::TokenTooOld);
            }
        }

        expect(&self.expected_issuer, &claims.iss, JwtError::InvalidIssuer)?;
        expect(&self.expected_subject, &claims.sub, JwtError::InvalidSubject)?;
        expect(&self.expected_id, &claims.jti, JwtError::InvalidId)?;

        if let Some(accepted) = &self.expected_audience {
            if !accepted.iter().any(|aud| claims.has_audience(aud)) {
                return Err(JwtError::InvalidAudience);
            }
        }

        if !self.required_claims.is_empty() {
            let payload: serde_json::Map<String, serde_json::Value> =
                serde_json::from_slice(token.payload())?;
            if let Some(missing) = self
                .required_claims
                .iter()
                .find(|name| payload.get(name.as_str()).is_none_or(|v| v.is_null()))
            {
                return Err(JwtError::MissingClaim(missing.clone()));
            }
        }

        self.validators.iter().try_for_each(|validator| validator(token))
    }
}

fn expect(expected: &Option<String>, actual: &Option<String>, err: JwtError) -> JwtResult<()> {
    match expected {
        Some(expected) if actual.as_deref() != Some(expected.as_str()) => Err(err),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_700_000_000;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims {
            exp: Some(T),
            ..Claims::default()
        };
        assert_eq!(validate(at(T - 1), &claims), Ok(()));
        assert_eq!(validate(at(T), &claims), Ok(()));
        assert_eq!(validate(at(T + 1), &claims), Err(JwtError::Expired));
    }

    #[test]
    fn test_not_before_boundary() {
        let claims = Claims {
            nbf: Some(T),
            ..Claims::default()
        };
        assert_eq!(validate(at(T - 1), &claims), Err(JwtError::NotValidYet));
        assert_eq!(validate(at(T), &claims), Ok(()));
    }

    #[test]
    fn test_issued_in_the_future() {
        let claims = Claims {
            iat: Some(T),
            ..Claims::default()
        };
        assert_eq!(validate(at(T - 1), &claims), Err(JwtError::IssuedInTheFuture));
        assert_eq!(validate(at(T), &claims), Ok(()));
    }

    #[test]
    fn test_subsecond_now_is_floored() {
        let claims = Claims {
            exp: Some(T),
            ..Claims::default()
        };
        let now = DateTime::from_timestamp(T, 999_000_000).unwrap();
        assert_eq!(validate(now, &claims), Ok(()));
    }

    #[test]
    fn test_unset_claims_always_pass() {
        let zeroes = Claims {
            nbf: Some(0),
            iat: Some(0),
            exp: Some(0),
            ..Claims::default()
        };
        for now in [at(1), at(T), at(i64::from(i32::MAX) * 4)] {
            assert_eq!(validate(now, &Claims::default()), Ok(()));
            assert_eq!(validate(now, &zeroes), Ok(()));
        }
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // nbf in the future and exp in the past: nbf is reported
        let claims = Claims {
            nbf: Some(T + 10),
            iat: Some(T + 10),
            exp: Some(T - 10),
            ..Claims::default()
        };
        assert_eq!(validate(at(T), &claims), Err(JwtError::NotValidYet));

        let claims = Claims {
            iat: Some(T + 10),
            exp: Some(T - 10),
            ..Claims::default()
        };
        assert_eq!(validate(at(T), &claims), Err(JwtError::IssuedInTheFuture));
    }

    #[test]
    fn test_leeway_widens_window() {
        let claims = Claims {
            nbf: Some(T),
            exp: Some(T + 100),
            ..Claims::default()
        };
        let leeway = Duration::seconds(30);
        assert_eq!(validate_window(at(T - 30), &claims, leeway), Ok(()));
        assert_eq!(
            validate_window(at(T - 31), &claims, leeway),
            Err(JwtError::NotValidYet)
        );
        assert_eq!(validate_window(at(T + 130), &claims, leeway), Ok(()));
        assert_eq!(
            validate_window(at(T + 131), &claims, leeway),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_negative_leeway_is_ignored() {
        let claims = Claims {
            exp: Some(T),
            ..Claims::default()
        };
        assert_eq!(validate_window(at(T), &claims, Duration::seconds(-60)), Ok(()));
    }

    #[test]
    fn test_validation_debug_hides_closures() {
        let validation = Validation::new()
            .expect_issuer("auth")
            .with_validator(|_| Ok(()));
        let debug = format!("{validation:?}");
        assert!(debug.contains("expected_issuer: Some(\"auth\")"));
        assert!(debug.contains("validators: 1"));
    }
}
