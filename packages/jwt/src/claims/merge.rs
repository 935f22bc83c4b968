//! Flat merge of two serializable claim sets

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{JwtError, JwtResult};

/// Top-level entries of a JSON object, in document order, values untouched.
/// `None` when the document is `null`.
struct Entries<'de>(Option<EntryList<'de>>);

impl<'de> Deserialize<'de> for Entries<'de> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries<'de>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object or null")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Entries(None))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, &'de RawValue>()? {
                    entries.push((key, value));
                }
                Ok(Entries(Some(entries)))
            }
        }

        deserializer.deserialize_any(EntriesVisitor)
    }
}

type EntryList<'de> = Vec<(String, &'de RawValue)>;

fn not_an_object() -> JwtError {
    JwtError::serialization("claims must serialize to a JSON object")
}

/// Entries of an object, with `null` read as no entries.
fn entries_or_empty(json: &[u8]) -> JwtResult<EntryList<'_>> {
    let Entries(entries) = serde_json::from_slice(json).map_err(|_| not_an_object())?;
    Ok(entries.unwrap_or_default())
}

/// Entries of an object; `null` is rejected like any other non-object.
fn object_entries(json: &[u8]) -> JwtResult<EntryList<'_>> {
    let Entries(entries) = serde_json::from_slice(json).map_err(|_| not_an_object())?;
    entries.ok_or_else(not_an_object)
}

/// Serialize `primary` and `secondary` into one flat JSON object.
///
/// The primary's entries come first, then the secondary's, each in their
/// own serialization order. When the secondary serializes to `{}` or `null`
/// the primary's bytes are returned as is. Keys present on both sides are
/// emitted twice; avoiding overlap is up to the caller.
///
/// # Errors
/// `Serialization` when either side fails to serialize, when the primary
/// is not a JSON object, or when the secondary is neither an object nor
/// `null`.
pub fn merge<P, S>(primary: &P, secondary: &S) -> JwtResult<Vec<u8>>
where
    P: Serialize + ?Sized,
    S: Serialize + ?Sized,
{
    let primary = serde_json::to_vec(primary)?;
    let secondary = serde_json::to_vec(secondary)?;

    let extra = entries_or_empty(&secondary)?;
    if extra.is_empty() {
        // still reject a primary that is not an object
        object_entries(&primary)?;
        tracing::trace!(len = primary.len(), "merge: nothing to add");
        return Ok(primary);
    }
    let base = object_entries(&primary)?;

    let mut out = Vec::with_capacity(primary.len() + secondary.len());
    out.push(b'{');
    for (i, (key, value)) in base.iter().chain(extra.iter()).enumerate() {
        if i > 0 {
            out.push(b',');
        }
        serde_json::to_writer(&mut out, key)?;
        out.push(b':');
        out.extend_from_slice(value.get().as_bytes());
    }
    out.push(b'}');

    tracing::trace!(
        primary = base.len(),
        secondary = extra.len(),
        "merged claim sets"
    );
    Ok(out)
}
