//! ECDSA algorithms (ES256, ES384)
//!
//! Signatures use the fixed-width `r || s` encoding required by JWS, not
//! DER. Nonces are hedged with fresh OS randomness on every call.

use p256::elliptic_curve::rand_core::OsRng;

use super::Algorithm;
use crate::error::{JwtError, JwtResult};
use crate::key::Key;

/// Curve (and implied hash) used by an [`EcdsaAlgorithm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    /// NIST P-256 with SHA-256
    P256,
    /// NIST P-384 with SHA-384
    P384,
}

impl Curve {
    /// Length of an `r || s` signature on this curve.
    #[must_use]
    pub fn signature_len(self) -> usize {
        match self {
            Curve::P256 => 64,
            Curve::P384 => 96,
        }
    }
}

/// Elliptic curve signing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcdsaAlgorithm {
    name: &'static str,
    curve: Curve,
}

impl EcdsaAlgorithm {
    /// Create an ECDSA algorithm with the given header name and curve.
    #[must_use]
    pub const fn new(name: &'static str, curve: Curve) -> Self {
        Self { name, curve }
    }

    /// Curve this algorithm signs on.
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }
}

macro_rules! ecdsa_sign {
    ($curve:ident, $signing_key:expr, $input:expr) => {{
        use $curve::ecdsa::signature::RandomizedSigner;
        let signature: $curve::ecdsa::Signature = $signing_key
            .try_sign_with_rng(&mut OsRng, $input)
            .map_err(JwtError::signing_failed)?;
        Ok(signature.to_bytes().to_vec())
    }};
}

macro_rules! ecdsa_verify {
    ($curve:ident, $verifying_key:expr, $input:expr, $signature:expr) => {{
        use $curve::ecdsa::signature::Verifier;
        let signature = $curve::ecdsa::Signature::from_slice($signature)
            .map_err(|_| JwtError::SignatureMismatch)?;
        $verifying_key
            .verify($input, &signature)
            .map_err(|_| JwtError::SignatureMismatch)
    }};
}

fn key_fits(curve: Curve, key: Key<'_>) -> bool {
    matches!(
        (curve, key),
        (Curve::P256, Key::EcdsaP256Private(_) | Key::EcdsaP256Public(_))
            | (Curve::P384, Key::EcdsaP384Private(_) | Key::EcdsaP384Public(_))
    )
}

impl Algorithm for EcdsaAlgorithm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: Key<'_>) -> JwtResult<Vec<u8>> {
        match (self.curve, key) {
            (Curve::P256, Key::EcdsaP256Private(signing_key)) => {
                ecdsa_sign!(p256, signing_key, signing_input)
            }
            (Curve::P384, Key::EcdsaP384Private(signing_key)) => {
                ecdsa_sign!(p384, signing_key, signing_input)
            }
            (_, other) => Err(JwtError::invalid_key(self.name, other.kind())),
        }
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: Key<'_>) -> JwtResult<()> {
        if signature.len() != self.curve.signature_len() && key_fits(self.curve, key) {
            return Err(JwtError::SignatureMismatch);
        }
        match (self.curve, key) {
            (Curve::P256, Key::EcdsaP256Public(verifying_key)) => {
                ecdsa_verify!(p256, verifying_key, signing_input, signature)
            }
            (Curve::P256, Key::EcdsaP256Private(signing_key)) => {
                ecdsa_verify!(p256, signing_key.verifying_key(), signing_input, signature)
            }
            (Curve::P384, Key::EcdsaP384Public(verifying_key)) => {
                ecdsa_verify!(p384, verifying_key, signing_input, signature)
            }
            (Curve::P384, Key::EcdsaP384Private(signing_key)) => {
                ecdsa_verify!(p384, signing_key.verifying_key(), signing_input, signature)
            }
            (_, other) => Err(JwtError::invalid_key(self.name, other.kind())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{ES256, ES384};

    fn p256_key() -> p256::ecdsa::SigningKey {
        p256::ecdsa::SigningKey::random(&mut OsRng)
    }

    fn p384_key() -> p384::ecdsa::SigningKey {
        p384::ecdsa::SigningKey::random(&mut OsRng)
    }

    #[test]
    fn test_es256_signature_is_fixed_width() {
        let key = p256_key();
        let signature = ES256.sign(b"input", Key::from(&key)).unwrap();
        assert_eq!(signature.len(), Curve::P256.signature_len());
    }

    #[test]
    fn test_es384_roundtrip_with_public_key() {
        let key = p384_key();
        let public = *key.verifying_key();
        let signature = ES384.sign(b"input", Key::from(&key)).unwrap();

        assert_eq!(signature.len(), Curve::P384.signature_len());
        assert_eq!(ES384.verify(b"input", &signature, Key::from(&public)), Ok(()));
        assert_eq!(ES384.verify(b"input", &signature, Key::from(&key)), Ok(()));
    }

    #[test]
    fn test_signatures_are_randomized() {
        let key = p256_key();
        let a = ES256.sign(b"input", Key::from(&key)).unwrap();
        let b = ES256.sign(b"input", Key::from(&key)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_signature_is_a_mismatch() {
        let key = p256_key();
        assert_eq!(
            ES256.verify(b"input", &[0u8; 64], Key::from(&key)),
            Err(JwtError::SignatureMismatch)
        );
        assert_eq!(
            ES256.verify(b"input", &[1u8; 10], Key::from(&key)),
            Err(JwtError::SignatureMismatch)
        );
    }

    #[test]
    fn test_wrong_length_signature_is_a_mismatch() {
        let key = p384_key();
        let signature = ES384.sign(b"input", Key::from(&key)).unwrap();
        assert_eq!(
            ES384.verify(b"input", &signature[..64], Key::from(&key)),
            Err(JwtError::SignatureMismatch)
        );
        let mut padded = signature.clone();
        padded.push(0);
        assert_eq!(
            ES384.verify(b"input", &padded, Key::from(&key)),
            Err(JwtError::SignatureMismatch)
        );
        // a short signature with a foreign key still reports the key
        assert_eq!(
            ES384.verify(b"input", &[0u8; 3], Key::from("secret")),
            Err(JwtError::invalid_key("ES384", "secret"))
        );
    }

    #[test]
    fn test_curve_mismatch_is_invalid_key() {
        let key = p384_key();
        assert_eq!(
            ES256.sign(b"input", Key::from(&key)),
            Err(JwtError::invalid_key("ES256", "P-384 private"))
        );
        let other = p256_key();
        let public = *other.verifying_key();
        assert_eq!(
            ES384.verify(b"input", &[0u8; 96], Key::from(&public)),
            Err(JwtError::invalid_key("ES384", "P-256 public"))
        );
    }
}
