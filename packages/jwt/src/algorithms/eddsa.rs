//! EdDSA over Ed25519

use ed25519_dalek::{Signature, Signer};

use super::Algorithm;
use crate::error::{JwtError, JwtResult};
use crate::key::Key;

/// Ed25519 signing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdDsaAlgorithm {
    name: &'static str,
}

impl EdDsaAlgorithm {
    /// Create an EdDSA algorithm with the given header name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Algorithm for EdDsaAlgorithm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: Key<'_>) -> JwtResult<Vec<u8>> {
        match key {
            Key::Ed25519Private(signing_key) => signing_key
                .try_sign(signing_input)
                .map(|signature| signature.to_bytes().to_vec())
                .map_err(JwtError::signing_failed),
            other => Err(JwtError::invalid_key(self.name, other.kind())),
        }
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: Key<'_>) -> JwtResult<()> {
        let verifying_key = match key {
            Key::Ed25519Public(verifying_key) => *verifying_key,
            Key::Ed25519Private(signing_key) => signing_key.verifying_key(),
            other => return Err(JwtError::invalid_key(self.name, other.kind())),
        };

        let signature =
            Signature::from_slice(signature).map_err(|_| JwtError::SignatureMismatch)?;
        verifying_key
            .verify_strict(signing_input, &signature)
            .map_err(|_| JwtError::SignatureMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::EDDSA;

    // RFC 8032, section 7.1, test 1
    const SECRET: [u8; 32] = [
        0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
        0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
        0x7f, 0x60,
    ];

    #[test]
    fn test_rfc8032_empty_message() {
        let key = ed25519_dalek::SigningKey::from_bytes(&SECRET);
        let signature = EDDSA.sign(b"", Key::from(&key)).unwrap();
        assert_eq!(signature[..4], [0xe5, 0x56, 0x43, 0x00]);
        assert_eq!(signature[60..], [0x8e, 0x7a, 0x10, 0x0b]);
    }

    #[test]
    fn test_verify_with_public_and_private_key() {
        let key = ed25519_dalek::SigningKey::from_bytes(&SECRET);
        let public = key.verifying_key();
        let signature = EDDSA.sign(b"input", Key::from(&key)).unwrap();

        assert_eq!(EDDSA.verify(b"input", &signature, Key::from(&public)), Ok(()));
        assert_eq!(EDDSA.verify(b"input", &signature, Key::from(&key)), Ok(()));
        assert_eq!(
            EDDSA.verify(b"tampered", &signature, Key::from(&public)),
            Err(JwtError::SignatureMismatch)
        );
        assert_eq!(
            EDDSA.verify(b"input", &signature[..63], Key::from(&public)),
            Err(JwtError::SignatureMismatch)
        );
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let public = ed25519_dalek::SigningKey::from_bytes(&SECRET).verifying_key();
        assert_eq!(
            EDDSA.sign(b"input", Key::from(&public)),
            Err(JwtError::invalid_key("EdDSA", "Ed25519 public"))
        );
    }
}
