//! Compact signed tokens (JWS compact serialization)
//!
//! This crate provides:
//! - A pluggable [`Algorithm`] trait with HMAC, RSA PKCS#1 v1.5, RSA-PSS,
//!   ECDSA and EdDSA implementations
//! - The token codec: [`encode`] and [`decode`]
//! - Standard [`Claims`], merged flat with caller claims
//! - Temporal validation and configurable [`Validation`] on verify
//!
//! ```
//! use tessera_jwt::{HS256, decode, encode};
//!
//! let token = encode(&HS256, "secret", &serde_json::json!({"username": "alice"}))?;
//! assert_eq!(decode(&HS256, "secret", &token)?, br#"{"username":"alice"}"#);
//! # Ok::<(), tessera_jwt::JwtError>(())
//! ```

pub mod algorithms;
pub mod claims;
mod clock;
mod codec;
mod error;
mod header;
mod key;
mod token;
mod validation;

pub use algorithms::{
    ALGORITHMS, Algorithm, EDDSA, ES256, ES384, HS256, HS384, HS512, HashAlg, PS256, PS384, PS512,
    RS256, RS384, RS512, algorithm_by_name,
};
pub use claims::{Claims, merge};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{decode, encode, encode_raw};
pub use error::{JwtError, JwtResult};
pub use header::{Header, TOKEN_TYPE};
pub use key::Key;
pub use token::{SignOptions, VerifiedToken, sign, sign_with, verify};
pub use validation::{Validation, Validator, validate, validate_window};
