//! RSA-based algorithms: PKCS#1 v1.5 (RS256, RS384, RS512) and PSS (PS256,
//! PS384, PS512)

use std::borrow::Cow;

use rsa::rand_core::OsRng;
use rsa::sha2::{Sha256, Sha384, Sha512};
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey, RsaPublicKey};

use super::{Algorithm, HashAlg};
use crate::error::{JwtError, JwtResult};
use crate::key::Key;

fn private_key<'k>(alg: &'static str, key: Key<'k>) -> JwtResult<&'k RsaPrivateKey> {
    match key {
        Key::RsaPrivate(private) => Ok(private),
        other => Err(JwtError::invalid_key(alg, other.kind())),
    }
}

/// The public half is derived per call from a private key, never cached.
fn public_key<'k>(alg: &'static str, key: Key<'k>) -> JwtResult<Cow<'k, RsaPublicKey>> {
    match key {
        Key::RsaPublic(public) => Ok(Cow::Borrowed(public)),
        Key::RsaPrivate(private) => Ok(Cow::Owned(private.to_public_key())),
        other => Err(JwtError::invalid_key(alg, other.kind())),
    }
}

fn pkcs1v15_scheme(hash: HashAlg) -> Pkcs1v15Sign {
    match hash {
        HashAlg::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlg::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlg::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

/// Salt length equals the hash output size.
fn pss_scheme(hash: HashAlg) -> Pss {
    match hash {
        HashAlg::Sha256 => Pss::new::<Sha256>(),
        HashAlg::Sha384 => Pss::new::<Sha384>(),
        HashAlg::Sha512 => Pss::new::<Sha512>(),
    }
}

/// RSASSA-PKCS1-v1_5 signing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaAlgorithm {
    name: &'static str,
    hash: HashAlg,
}

impl RsaAlgorithm {
    /// Create a PKCS#1 v1.5 algorithm with the given header name and hash.
    #[must_use]
    pub const fn new(name: &'static str, hash: HashAlg) -> Self {
        Self { name, hash }
    }
}

impl Algorithm for RsaAlgorithm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: Key<'_>) -> JwtResult<Vec<u8>> {
        let private = private_key(self.name, key)?;
        let hashed = self.hash.digest(signing_input);
        private
            .sign(pkcs1v15_scheme(self.hash), &hashed)
            .map_err(JwtError::signing_failed)
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: Key<'_>) -> JwtResult<()> {
        let public = public_key(self.name, key)?;
        let hashed = self.hash.digest(signing_input);
        public
            .verify(pkcs1v15_scheme(self.hash), &hashed, signature)
            .map_err(|_| JwtError::SignatureMismatch)
    }
}

/// RSASSA-PSS signing (randomized salt)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RsaPssAlgorithm {
    name: &'static str,
    hash: HashAlg,
}

impl RsaPssAlgorithm {
    /// Create a PSS algorithm with the given header name and hash.
    #[must_use]
    pub const fn new(name: &'static str, hash: HashAlg) -> Self {
        Self { name, hash }
    }
}

impl Algorithm for RsaPssAlgorithm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sign(&self, signing_input: &[u8], key: Key<'_>) -> JwtResult<Vec<u8>> {
        let private = private_key(self.name, key)?;
        let hashed = self.hash.digest(signing_input);
        private
            .sign_with_rng(&mut OsRng, pss_scheme(self.hash), &hashed)
            .map_err(JwtError::signing_failed)
    }

    fn verify(&self, signing_input: &[u8], signature: &[u8], key: Key<'_>) -> JwtResult<()> {
        let public = public_key(self.name, key)?;
        let hashed = self.hash.digest(signing_input);
        public
            .verify(pss_scheme(self.hash), &hashed, signature)
            .map_err(|_| JwtError::SignatureMismatch)
    }
}
