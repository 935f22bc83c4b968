//! Signing algorithms
//!
//! Every scheme implements [`Algorithm`]. The built-in ones are exposed as
//! statics (`HS256`, `RS256`, `PS256`, `ES256`, `EDDSA`, ...) and listed in
//! [`ALGORITHMS`]. A new scheme only needs another implementation of the
//! trait; the codec never changes.

mod ecdsa;
mod eddsa;
mod hmac;
mod rsa;

use std::fmt;

use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::JwtResult;
use crate::key::Key;

pub use self::ecdsa::{Curve, EcdsaAlgorithm};
pub use self::eddsa::EdDsaAlgorithm;
pub use self::hmac::HmacAlgorithm;
pub use self::rsa::{RsaAlgorithm, RsaPssAlgorithm};

/// Signing algorithm interface.
///
/// Implementations hold no mutable state and must be usable from many
/// threads at once.
pub trait Algorithm: Send + Sync + fmt::Debug {
    /// Header `alg` value.
    fn name(&self) -> &'static str;

    /// Sign the signing input (`header.payload`, still encoded).
    ///
    /// # Errors
    /// `InvalidKey` when the key family does not match, `SigningFailed` when
    /// the primitive cannot produce a signature.
    fn sign(&self, signing_input: &[u8], key: Key<'_>) -> JwtResult<Vec<u8>>;

    /// Verify `signature` over the signing input.
    ///
    /// # Errors
    /// `InvalidKey` when the key family does not match, `SignatureMismatch`
    /// when the signature does not verify.
    fn verify(&self, signing_input: &[u8], signature: &[u8], key: Key<'_>) -> JwtResult<()>;
}

/// Hash function selector shared by the algorithm families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlg {
    /// Hash `input` with the selected function.
    #[must_use]
    pub fn digest(self, input: &[u8]) -> Vec<u8> {
        match self {
            HashAlg::Sha256 => Sha256::digest(input).to_vec(),
            HashAlg::Sha384 => Sha384::digest(input).to_vec(),
            HashAlg::Sha512 => Sha512::digest(input).to_vec(),
        }
    }

    /// Output size in bytes.
    #[must_use]
    pub fn output_size(self) -> usize {
        match self {
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
            HashAlg::Sha512 => 64,
        }
    }
}

/// HMAC using SHA-256
pub static HS256: HmacAlgorithm = HmacAlgorithm::new("HS256", HashAlg::Sha256);
/// HMAC using SHA-384
pub static HS384: HmacAlgorithm = HmacAlgorithm::new("HS384", HashAlg::Sha384);
/// HMAC using SHA-512
pub static HS512: HmacAlgorithm = HmacAlgorithm::new("HS512", HashAlg::Sha512);

/// RSASSA-PKCS1-v1_5 using SHA-256
pub static RS256: RsaAlgorithm = RsaAlgorithm::new("RS256", HashAlg::Sha256);
/// RSASSA-PKCS1-v1_5 using SHA-384
pub static RS384: RsaAlgorithm = RsaAlgorithm::new("RS384", HashAlg::Sha384);
/// RSASSA-PKCS1-v1_5 using SHA-512
pub static RS512: RsaAlgorithm = RsaAlgorithm::new("RS512", HashAlg::Sha512);

/// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
pub static PS256: RsaPssAlgorithm = RsaPssAlgorithm::new("PS256", HashAlg::Sha256);
/// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
pub static PS384: RsaPssAlgorithm = RsaPssAlgorithm::new("PS384", HashAlg::Sha384);
/// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
pub static PS512: RsaPssAlgorithm = RsaPssAlgorithm::new("PS512", HashAlg::Sha512);

/// ECDSA using P-256 and SHA-256
pub static ES256: EcdsaAlgorithm = EcdsaAlgorithm::new("ES256", Curve::P256);
/// ECDSA using P-384 and SHA-384
pub static ES384: EcdsaAlgorithm = EcdsaAlgorithm::new("ES384", Curve::P384);

/// EdDSA using Ed25519
pub static EDDSA: EdDsaAlgorithm = EdDsaAlgorithm::new("EdDSA");

/// All built-in algorithms.
pub static ALGORITHMS: [&(dyn Algorithm + 'static); 12] = [
    &HS256, &HS384, &HS512, &RS256, &RS384, &RS512, &PS256, &PS384, &PS512, &ES256, &ES384,
    &EDDSA,
];

/// Look up a built-in algorithm by its header name (case sensitive).
#[must_use]
pub fn algorithm_by_name(name: &str) -> Option<&'static dyn Algorithm> {
    ALGORITHMS.iter().copied().find(|alg| alg.name() == name)
}
