//! Borrowed signing and verification keys
//!
//! A [`Key`] is a closed set of the key types the built-in algorithms accept.
//! It only ever borrows the caller's key material for the duration of one
//! sign or verify call.

use std::fmt;

use rsa::{RsaPrivateKey, RsaPublicKey};

/// Key material handed to an [`Algorithm`](crate::Algorithm).
///
/// Asymmetric algorithms sign with the private variant and verify with
/// either the public or the private variant.
#[derive(Clone, Copy)]
pub enum Key<'a> {
    /// Shared secret for the HMAC family
    Secret(&'a [u8]),
    /// RSA private key (RS*, PS*)
    RsaPrivate(&'a RsaPrivateKey),
    /// RSA public key (RS*, PS*)
    RsaPublic(&'a RsaPublicKey),
    /// NIST P-256 private key (ES256)
    EcdsaP256Private(&'a p256::ecdsa::SigningKey),
    /// NIST P-256 public key (ES256)
    EcdsaP256Public(&'a p256::ecdsa::VerifyingKey),
    /// NIST P-384 private key (ES384)
    EcdsaP384Private(&'a p384::ecdsa::SigningKey),
    /// NIST P-384 public key (ES384)
    EcdsaP384Public(&'a p384::ecdsa::VerifyingKey),
    /// Ed25519 private key (EdDSA)
    Ed25519Private(&'a ed25519_dalek::SigningKey),
    /// Ed25519 public key (EdDSA)
    Ed25519Public(&'a ed25519_dalek::VerifyingKey),
}

impl Key<'_> {
    /// Human readable key kind, used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Key::Secret(_) => "secret",
            Key::RsaPrivate(_) => "RSA private",
            Key::RsaPublic(_) => "RSA public",
            Key::EcdsaP256Private(_) => "P-256 private",
            Key::EcdsaP256Public(_) => "P-256 public",
            Key::EcdsaP384Private(_) => "P-384 private",
            Key::EcdsaP384Public(_) => "P-384 public",
            Key::Ed25519Private(_) => "Ed25519 private",
            Key::Ed25519Public(_) => "Ed25519 public",
        }
    }

    /// Whether this key can produce signatures
    #[must_use]
    pub fn can_sign(&self) -> bool {
        !matches!(
            self,
            Key::RsaPublic(_)
                | Key::EcdsaP256Public(_)
                | Key::EcdsaP384Public(_)
                | Key::Ed25519Public(_)
        )
    }
}

// Never print key material.
impl fmt::Debug for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.kind()).finish()
    }
}

impl<'a> From<&'a [u8]> for Key<'a> {
    fn from(secret: &'a [u8]) -> Self {
        Key::Secret(secret)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Key<'a> {
    fn from(secret: &'a [u8; N]) -> Self {
        Key::Secret(secret)
    }
}

impl<'a> From<&'a Vec<u8>> for Key<'a> {
    fn from(secret: &'a Vec<u8>) -> Self {
        Key::Secret(secret.as_slice())
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(secret: &'a str) -> Self {
        Key::Secret(secret.as_bytes())
    }
}

macro_rules! impl_key_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for Key<'a> {
                fn from(key: &'a $ty) -> Self {
                    Key::$variant(key)
                }
            }
        )+
    };
}

impl_key_from! {
    RsaPrivateKey => RsaPrivate,
    RsaPublicKey => RsaPublic,
    p256::ecdsa::SigningKey => EcdsaP256Private,
    p256::ecdsa::VerifyingKey => EcdsaP256Public,
    p384::ecdsa::SigningKey => EcdsaP384Private,
    p384::ecdsa::VerifyingKey => EcdsaP384Public,
    ed25519_dalek::SigningKey => Ed25519Private,
    ed25519_dalek::VerifyingKey => Ed25519Public,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_secret() {
        let key = Key::from(b"super-secret-value");
        let printed = format!("{key:?}");
        assert_eq!(printed, "Key(\"secret\")");
        assert!(!printed.contains("super"));
    }

    #[test]
    fn test_secret_conversions() {
        let owned = b"abc".to_vec();
        for key in [Key::from("abc"), Key::from(&owned), Key::from(&b"abc"[..])] {
            match key {
                Key::Secret(bytes) => assert_eq!(bytes, b"abc"),
                other => panic!("unexpected key kind {}", other.kind()),
            }
        }
    }

    #[test]
    fn test_public_keys_cannot_sign() {
        let signing = ed25519_dalek::SigningKey::from_bytes(&[7u8; 32]);
        let verifying = signing.verifying_key();

        assert!(Key::from(&signing).can_sign());
        assert!(!Key::from(&verifying).can_sign());
        assert!(Key::from("secret").can_sign());
    }
}
