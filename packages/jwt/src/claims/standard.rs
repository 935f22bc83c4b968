//! Standard registered claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Standard JWT claims.
///
/// Every field is optional and omitted from the JSON when unset, zero or
/// empty. Timestamps are seconds since the Unix epoch; a value of zero or
/// less counts as "not asserted".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Not before (unix seconds).
    #[serde(default, skip_serializing_if = "timestamp_unset")]
    pub nbf: Option<i64>,
    /// Issued-at (unix seconds).
    #[serde(default, skip_serializing_if = "timestamp_unset")]
    pub iat: Option<i64>,
    /// Expiry (unix seconds).
    #[serde(default, skip_serializing_if = "timestamp_unset")]
    pub exp: Option<i64>,
    /// JWT ID.
    #[serde(default, skip_serializing_if = "string_unset")]
    pub jti: Option<String>,
    /// Issuer.
    #[serde(default, skip_serializing_if = "string_unset")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(default, skip_serializing_if = "string_unset")]
    pub sub: Option<String>,
    /// Audience. Accepts a single string or an array when deserializing.
    #[serde(
        default,
        skip_serializing_if = "audience_unset",
        deserialize_with = "deserialize_audience"
    )]
    pub aud: Option<Vec<String>>,
}

fn timestamp_unset(value: &Option<i64>) -> bool {
    asserted(*value).is_none()
}

fn string_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn audience_unset(value: &Option<Vec<String>>) -> bool {
    value.as_ref().map_or(true, Vec::is_empty)
}

/// A timestamp claim only counts when it is strictly positive.
pub(crate) fn asserted(value: Option<i64>) -> Option<i64> {
    value.filter(|t| *t > 0)
}

fn deserialize_audience<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|aud| match aud {
            OneOrMany::One(single) => vec![single],
            OneOrMany::Many(many) => many,
        }),
    )
}

fn to_datetime(value: Option<i64>) -> Option<DateTime<Utc>> {
    asserted(value).and_then(|secs| DateTime::from_timestamp(secs, 0))
}

impl Claims {
    /// Create empty claims.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims issued at `now` and expiring `max_age` later.
    #[must_use]
    pub fn with_max_age(now: DateTime<Utc>, max_age: Duration) -> Self {
        let mut claims = Self::default();
        claims.set_max_age(now, max_age);
        claims
    }

    /// Set `iat` to `now` and `exp` to `now + max_age`.
    pub fn set_max_age(&mut self, now: DateTime<Utc>, max_age: Duration) {
        let iat = now.timestamp();
        self.iat = Some(iat);
        self.exp = Some(iat.saturating_add(max_age.num_seconds()));
    }

    /// Set the subject (sub) claim.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the issuer (iss) claim.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set the JWT ID (jti) claim.
    #[must_use]
    pub fn id(mut self, jti: impl Into<String>) -> Self {
        self.jti = Some(jti.into());
        self
    }

    /// Set the audience (aud) claim.
    #[must_use]
    pub fn audience<I, S>(mut self, aud: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aud = Some(aud.into_iter().map(Into::into).collect());
        self
    }

    /// Set the not-before (nbf) claim.
    #[must_use]
    pub fn not_before(mut self, nbf: DateTime<Utc>) -> Self {
        self.nbf = Some(nbf.timestamp());
        self
    }

    /// Set the expiry (exp) claim.
    #[must_use]
    pub fn expires(mut self, exp: DateTime<Utc>) -> Self {
        self.exp = Some(exp.timestamp());
        self
    }

    /// Set the issued-at (iat) claim.
    #[must_use]
    pub fn issued(mut self, iat: DateTime<Utc>) -> Self {
        self.iat = Some(iat.timestamp());
        self
    }

    /// `nbf` as a point in time, when asserted.
    #[must_use]
    pub fn valid_from(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.nbf)
    }

    /// `iat` as a point in time, when asserted.
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.iat)
    }

    /// `exp` as a point in time, when asserted.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.exp)
    }

    /// Time remaining until expiry, zero once expired; `None` without `exp`.
    #[must_use]
    pub fn timeleft(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at()
            .map(|exp| (exp - now).max(Duration::zero()))
    }

    /// Time elapsed since issue; `None` without `iat`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.issued_at().map(|iat| now - iat)
    }

    /// Whether `aud` lists `audience`.
    #[must_use]
    pub fn has_audience(&self, audience: &str) -> bool {
        self.aud
            .as_ref()
            .is_some_and(|aud| aud.iter().any(|a| a == audience))
    }
}
