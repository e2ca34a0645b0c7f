//! Input validation helpers
//!
//! Centralized text length constants and validation functions. Validation
//! errors are detected and rejected before any store call.

use crate::utils::AppError;

// ========== Text length limits ==========

/// Request/message free text
pub const MAX_TEXT_LEN: usize = 500;

/// Menu names, vendor names, buyer names
pub const MAX_NAME_LEN: usize = 200;

/// Caller-supplied identifiers (request ids, seller ids, ...)
pub const MAX_ID_LEN: usize = 100;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ========== Validation helpers ==========

/// Validate that a required string is non-blank and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a legacy slot index (0..2).
pub fn validate_row_index(idx: i64) -> Result<(), AppError> {
    if !(0..=2).contains(&idx) {
        return Err(AppError::validation(format!(
            "rowIndex must be 0..2, got {idx}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_required_text("  ", "text", MAX_TEXT_LEN).is_err());
        assert!(validate_required_text("", "text", MAX_TEXT_LEN).is_err());
        assert!(validate_required_text("nasi padang", "text", MAX_TEXT_LEN).is_ok());
    }

    #[test]
    fn overlong_text_is_rejected() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(validate_required_text(&long, "text", MAX_TEXT_LEN).is_err());
        assert!(validate_optional_text(&Some(long), "address", MAX_TEXT_LEN).is_err());
        assert!(validate_optional_text(&None, "address", MAX_TEXT_LEN).is_ok());
    }

    #[test]
    fn row_index_bounds() {
        assert!(validate_row_index(0).is_ok());
        assert!(validate_row_index(2).is_ok());
        assert!(validate_row_index(3).is_err());
        assert!(validate_row_index(-1).is_err());
    }
}
