//! HMAC-SHA algorithms (HS256, HS384, HS512)

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::{Algorithm, HashAlg};
use crate::error::{JwtError, JwtResult};
use crate::key::Key;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Shared-secret HMAC signing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HmacAlgorithm {
    name: &'static str,
    hash: HashAlg,
}

impl HmacAlgorithm {
    /// Create an HMAC algorithm with the given header name and hash.
    #[must_use]
    pub const fn new(name: &'static str, hash: HashAlg) -> Self {
        Self { name, hash }
    }

    fn secret<'k>(&self, key: Key<'k>) -> JwtResult<&'k [u8]> {
        match key {
            Key::Secret(secret) => Ok(secret),
            other => Err(JwtError::invalid_key(self.name, other.kind())),
        }
    }

    fn mac(&self, secret: &[u8], input: &[u8]) -> JwtResult<Vec<u8>> {
        macro_rules! compute {
            ($mac:ty) => {{
                let mut mac = <$mac>::new_from_slice(secret)
                    .map_err(|_| JwtError::invalid_key(self.name, "secret"))?;
                mac.update(input);
                mac.finalize().into_bytes().to_vec()
            }};
        }

        Ok(match self.hash {
            HashAlg::Sha256 => compute!(HmacSha256),
            HashAlg::Sha384 => compute!(HmacSha384),
            HashAlg::Sha512 => compute!(HmacSha512),
        })
    }
}

impl Algorithm for HmacAlgorithm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: Key<'_>) -> JwtResult<Vec<u8>> {
        let secret = self.secret(key)?;
        self.mac(secret, signing_input)
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: Key<'_>) -> JwtResult<()> {
        let secret = self.secret(key)?;
        if signature.len() != self.hash.output_size() {
            return Err(JwtError::SignatureMismatch);
        }
        let expected = self.mac(secret, signing_input)?;
        if bool::from(expected.as_slice().ct_eq(signature)) {
            Ok(())
        } else {
            Err(JwtError::SignatureMismatch)
        }
    }
}
