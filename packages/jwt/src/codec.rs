//! Compact token codec
//!
//! A token is `base64url(header) "." base64url(payload) "." base64url(signature)`
//! with the URL-safe alphabet and no padding. The signature covers the first
//! two segments exactly as they appear in the token.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;

use crate::algorithms::{Algorithm, algorithm_by_name};
use crate::error::{JwtError, JwtResult};
use crate::header::{Header, TOKEN_TYPE};
use crate::key::Key;

/// Serialize `claims` and sign them into a compact token.
///
/// # Errors
/// `Serialization` when the claims cannot be serialized, `InvalidKey` when
/// the key does not fit the algorithm, `SigningFailed` for any other
/// signing failure.
pub fn encode<'k, C>(alg: &dyn Algorithm, key: impl Into<Key<'k>>, claims: &C) -> JwtResult<String>
where
    C: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(claims)?;
    encode_raw(alg, key, &payload)
}

/// Sign an already serialized payload into a compact token.
///
/// # Errors
/// Same as [`encode`], minus claim serialization.
pub fn encode_raw<'k>(alg: &dyn Algorithm, key: impl Into<Key<'k>>, payload: &[u8]) -> JwtResult<String> {
    let header = serde_json::to_vec(&Header::new(alg.name()))?;

    let mut token = URL_SAFE_NO_PAD.encode(header);
    token.push('.');
    URL_SAFE_NO_PAD.encode_string(payload, &mut token);

    let signature = alg
        .sign(token.as_bytes(), key.into())
        .map_err(|err| match err {
            JwtError::InvalidKey { .. } | JwtError::SigningFailed(_) => err,
            other => JwtError::signing_failed(other),
        })?;

    token.push('.');
    URL_SAFE_NO_PAD.encode_string(signature, &mut token);

    tracing::trace!(alg = alg.name(), len = token.len(), "encoded token");
    Ok(token)
}

/// Verify a compact token and return its decoded payload bytes.
///
/// The payload is not interpreted in any way; parse it only after this
/// returns `Ok`.
///
/// # Errors
/// `MalformedToken` for a wrong segment count, bad base64url or an
/// unreadable header. `UnsupportedAlgorithm` or `AlgorithmMismatch` when the
/// header names another algorithm. `InvalidKey` or `SignatureMismatch` from
/// verification.
pub fn decode<'k>(alg: &dyn Algorithm, key: impl Into<Key<'k>>, token: &str) -> JwtResult<Vec<u8>> {
    decode_token(alg, key.into(), token).map(|(_, payload)| payload)
}

/// Verify a compact token, returning the parsed header with the payload.
pub(crate) fn decode_token(alg: &dyn Algorithm, key: Key<'_>, token: &str) -> JwtResult<(Header, Vec<u8>)> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        tracing::debug!(alg = alg.name(), "token rejected: wrong segment count");
        return Err(JwtError::malformed("expected three segments"));
    };

    let header = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| JwtError::malformed("header is not base64url"))?;
    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| JwtError::malformed("payload is not base64url"))?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| JwtError::malformed("signature is not base64url"))?;

    let header = check_header(alg, &header)?;

    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    alg.verify(signing_input.as_bytes(), &signature, key)?;

    tracing::trace!(alg = alg.name(), payload_len = payload.len(), "decoded token");
    Ok((header, payload))
}

fn check_header(alg: &dyn Algorithm, raw: &[u8]) -> JwtResult<Header> {
    let header: Header =
        serde_json::from_slice(raw).map_err(|_| JwtError::malformed("header is not valid JSON"))?;

    if !header.typ.eq_ignore_ascii_case(TOKEN_TYPE) {
        return Err(JwtError::malformed("header type is not JWT"));
    }
    if header.alg != alg.name() {
        return Err(if algorithm_by_name(&header.alg).is_some() {
            JwtError::AlgorithmMismatch {
                expected: alg.name(),
                found: header.alg,
            }
        } else {
            JwtError::UnsupportedAlgorithm(header.alg)
        });
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{HS256, HS512};

    fn b64(bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    #[test]
    fn test_encode_layout() {
        let token = encode(&HS256, "secret", &serde_json::json!({"username": "alice"})).unwrap();
        let segments: Vec<&str> = token.split('.').collect();

        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| !s.is_empty()));
        assert!(!token.contains('='));
        assert_eq!(segments[0], b64(br#"{"alg":"HS256","typ":"JWT"}"#));
        assert_eq!(segments[1], b64(br#"{"username":"alice"}"#));
    }

    #[test]
    fn test_hmac_tokens_are_deterministic() {
        let a = encode(&HS256, "secret", &serde_json::json!({"n": 1})).unwrap();
        let b = encode(&HS256, "secret", &serde_json::json!({"n": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_returns_payload() {
        let token = encode_raw(&HS256, "secret", br#"{"a":1}"#).unwrap();
        assert_eq!(decode(&HS256, "secret", &token).unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn test_segment_count() {
        let token = encode(&HS256, "secret", &serde_json::json!({})).unwrap();
        let (signing_input, _) = token.rsplit_once('.').unwrap();

        for bad in [
            "".to_string(),
            "abc".to_string(),
            signing_input.to_string(),
            format!("{token}.extra"),
            format!("{token}."),
        ] {
            assert_eq!(
                decode(&HS256, "secret", &bad),
                Err(JwtError::malformed("expected three segments")),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_bad_base64_is_malformed() {
        let token = encode(&HS256, "secret", &serde_json::json!({})).unwrap();
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[2].push_str("!!");
        let bad = parts.join(".");
        assert!(matches!(
            decode(&HS256, "secret", &bad),
            Err(JwtError::MalformedToken(_))
        ));

        let bad = format!("e30=.{}.{}", b64(b"{}"), b64(b"sig"));
        assert!(matches!(
            decode(&HS256, "secret", &bad),
            Err(JwtError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_bad_payload_base64_is_malformed() {
        let token = encode(&HS256, "secret", &serde_json::json!({"a": 1})).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        for payload in ["e30=", "eyJhIjox*Q", "e30!"] {
            let bad = format!("{}.{payload}.{}", parts[0], parts[2]);
            assert_eq!(
                decode(&HS256, "secret", &bad),
                Err(JwtError::malformed("payload is not base64url")),
                "{payload}"
            );
        }
    }

    #[test]
    fn test_header_type_is_case_insensitive() {
        for typ in ["jwt", "Jwt", "JWT"] {
            let header = format!(r#"{{"alg":"HS256","typ":"{typ}"}}"#);
            let signing_input = format!("{}.{}", b64(header.as_bytes()), b64(br#"{"a":1}"#));
            let signature = HS256.sign(signing_input.as_bytes(), Key::from("secret")).unwrap();
            let token = format!("{signing_input}.{}", b64(&signature));

            assert_eq!(decode(&HS256, "secret", &token).unwrap(), br#"{"a":1}"#, "{typ}");
        }

        let header = br#"{"alg":"HS256","typ":"JOSE"}"#;
        let bad = format!("{}.{}.{}", b64(header), b64(b"{}"), b64(b"sig"));
        assert_eq!(
            decode(&HS256, "secret", &bad),
            Err(JwtError::malformed("header type is not JWT"))
        );
    }

    #[test]
    fn test_header_must_be_json() {
        let bad = format!("{}.{}.{}", b64(b"not json"), b64(b"{}"), b64(b"sig"));
        assert_eq!(
            decode(&HS256, "secret", &bad),
            Err(JwtError::malformed("header is not valid JSON"))
        );
    }

    #[test]
    fn test_header_algorithm_checks() {
        let token = encode(&HS512, "secret", &serde_json::json!({})).unwrap();
        assert_eq!(
            decode(&HS256, "secret", &token),
            Err(JwtError::AlgorithmMismatch {
                expected: "HS256",
                found: "HS512".into()
            })
        );

        let forged = format!(
            "{}.{}.{}",
            b64(br#"{"alg":"none","typ":"JWT"}"#),
            b64(b"{}"),
            ""
        );
        assert_eq!(
            decode(&HS256, "secret", &forged),
            Err(JwtError::UnsupportedAlgorithm("none".into()))
        );
    }

    #[test]
    fn test_wrong_secret() {
        let token = encode(&HS256, "secret", &serde_json::json!({"username": "alice"})).unwrap();
        assert_eq!(
            decode(&HS256, "wrong", &token),
            Err(JwtError::SignatureMismatch)
        );
    }
}
