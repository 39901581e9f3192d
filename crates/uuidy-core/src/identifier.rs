//! Identifier validation and canonical rendering.
//!
//! Every identifier entering the classifier or the cache is in canonical
//! form: 32 lowercase hex digits grouped 8-4-4-4-12 by hyphens. Callers
//! accept either the hyphenated or the bare 32-digit form.

use thiserror::Error;
use uuid::Uuid;

/// The raw text is not 32 hex digits once hyphens are removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Invalid UUID format: '{input}'. Expected format: \
     xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx or xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"
)]
pub struct FormatError {
    pub input: String,
}

/// Normalize a raw identifier to canonical form.
///
/// Strips every hyphen, requires exactly 32 hex digits, and re-renders the
/// value lowercase with hyphens at offsets 8, 12, 16 and 20. Idempotent.
///
/// ```
/// use uuidy_core::normalize;
///
/// let id = normalize("0000180D00001000800000805F9B34FB").unwrap();
/// assert_eq!(id, "0000180d-0000-1000-8000-00805f9b34fb");
/// assert_eq!(normalize(&id).unwrap(), id);
/// ```
pub fn normalize(raw: &str) -> Result<String, FormatError> {
    // With hyphens gone only the bare 32-digit form can parse.
    let digits: String = raw.chars().filter(|c| *c != '-').collect();
    let parsed = Uuid::try_parse(&digits).map_err(|_| FormatError {
        input: raw.to_string(),
    })?;

    Ok(parsed.hyphenated().to_string())
}

/// True when `raw` would normalize successfully.
pub fn is_valid(raw: &str) -> bool {
    normalize(raw).is_ok()
}
