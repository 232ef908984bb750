//! Field validation helpers shared by the entities.

use uuid::Uuid;

use crate::error::FieldErrors;

/// Requires a well-formed uuid, recording an error otherwise.
pub(crate) fn require_uuid(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<Uuid> {
    match value {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(raw) => match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(field, "must be a valid uuid");
                None
            }
        },
    }
}

/// Validates a uuid only when present.
pub(crate) fn optional_uuid(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<Uuid> {
    value.and_then(|raw| match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, "must be a valid uuid");
            None
        }
    })
}

/// Requires a 40-character uppercase hex key fingerprint.
pub(crate) fn require_fingerprint(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(raw) if is_fingerprint(raw) => Some(raw.to_string()),
        Some(_) => {
            errors.add(field, "must be 40 uppercase hex characters");
            None
        }
    }
}

/// Validates a fingerprint only when present (the field is nullable on
/// recovery requests).
pub(crate) fn optional_fingerprint(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<String> {
    value.and_then(|raw| {
        if is_fingerprint(raw) {
            Some(raw.to_string())
        } else {
            errors.add(field, "must be 40 uppercase hex characters");
            None
        }
    })
}

pub(crate) fn is_fingerprint(raw: &str) -> bool {
    raw.len() == 40
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, 'A'..='F'))
}

/// Requires an ASCII-armored block starting with `prefix`.
pub(crate) fn require_armored(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    prefix: &str,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(raw) if raw.starts_with(prefix) => Some(raw.to_string()),
        Some(_) => {
            errors.add(field, format!("must be an armored block starting with \"{prefix}\""));
            None
        }
    }
}

/// Requires a string field that parses into `T` (used for status enums).
pub(crate) fn require_parsed<T: std::str::FromStr>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    expected: &str,
) -> Option<T> {
    match value {
        None => {
            errors.add(field, "is required");
            None
        }
        Some(raw) => match raw.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors.add(field, format!("must be one of {expected}"));
                None
            }
        },
    }
}

/// Returns the first id that appears twice, scanning in order. Items without
/// an id are skipped; per-item validation reports those separately.
pub(crate) fn first_duplicate_id<'a, I>(ids: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut seen = std::collections::HashSet::new();
    for id in ids.into_iter().flatten() {
        if !seen.insert(id) {
            return Some(id.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_shape() {
        assert!(is_fingerprint(&"AB12".repeat(10)));
        assert!(!is_fingerprint(&"ab12".repeat(10)), "lowercase rejected");
        assert!(!is_fingerprint("AB12"));
        assert!(!is_fingerprint(&"GHIJ".repeat(10)));
    }

    #[test]
    fn duplicate_scan_finds_first_repeat() {
        let ids = [Some("a"), None, Some("b"), Some("a"), Some("b")];
        assert_eq!(first_duplicate_id(ids), Some("a".to_string()));
        assert_eq!(first_duplicate_id([Some("a"), Some("b"), None]), None);
    }
}
