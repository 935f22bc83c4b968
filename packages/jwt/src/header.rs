//! Token header model

use serde::{Deserialize, Serialize};

/// Value of the `typ` header field
pub const TOKEN_TYPE: &str = "JWT";

/// JWT header structure.
///
/// Serializes to exactly `{"alg":"<name>","typ":"JWT"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Algorithm used for signing.
    pub alg: String,
    /// Token type (always "JWT").
    #[serde(default = "default_typ")]
    pub typ: String,
}

fn default_typ() -> String {
    TOKEN_TYPE.to_string()
}

impl Header {
    /// Create a header for the given algorithm name.
    #[must_use]
    pub fn new(alg: &str) -> Self {
        Self {
            alg: alg.to_string(),
            typ: default_typ(),
        }
    }
}
