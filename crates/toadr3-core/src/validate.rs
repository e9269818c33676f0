//! Field constraint helpers shared by records and query parameters

use std::borrow::Cow;

use validator::ValidationError;

/// Minimum length of an object identifier
pub const OBJECT_ID_MIN_LEN: usize = 1;
/// Maximum length of an object identifier
pub const OBJECT_ID_MAX_LEN: usize = 128;
/// Pattern every object identifier must match
pub const OBJECT_ID_PATTERN: &str = "^[a-zA-Z0-9_-]*$";

/// True if every character is allowed in an object identifier
pub fn is_object_id_charset(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// True if `value` is a well-formed object identifier
pub fn is_object_id(value: &str) -> bool {
    (OBJECT_ID_MIN_LEN..=OBJECT_ID_MAX_LEN).contains(&value.chars().count())
        && is_object_id_charset(value)
}

/// `validator` hook for identifier character set checks
///
/// Length is checked separately with `length(min = 1, max = 128)` so both
/// problems are reported.
pub fn object_id(value: &str) -> Result<(), ValidationError> {
    if is_object_id_charset(value) {
        Ok(())
    } else {
        let mut error = ValidationError::new("object_id");
        error.message = Some(Cow::Owned(format!(
            "'{}' does not match regex '{}'",
            value, OBJECT_ID_PATTERN
        )));
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id() {
        assert!(is_object_id("Valid-ID_5"));
        assert!(!is_object_id(""));
        assert!(!is_object_id("Invalid@ID++"));
        assert!(!is_object_id(&"a".repeat(129)));
        assert!(is_object_id(&"a".repeat(128)));
    }

    #[test]
    fn test_object_id_validator_message() {
        let err = object_id("bad id").unwrap_err();
        assert_eq!(err.code, "object_id");
        assert_eq!(
            err.message.as_deref(),
            Some("'bad id' does not match regex '^[a-zA-Z0-9_-]*$'")
        );
        assert!(object_id("ok_id").is_ok());
    }
}
