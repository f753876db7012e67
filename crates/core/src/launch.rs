//! Launch submission constants and field validation.

use crate::error::CoreError;

/// Creator recorded for launches submitted through the dashboard form.
pub const DEFAULT_LAUNCHED_BY: &str = "admin@odiaaa.com";

/// Creator recorded for voice launches that arrive without a user id.
pub const VOICE_LAUNCHED_BY: &str = "voice-user";

/// Maximum length for the product name (characters).
pub const MAX_PRODUCT_NAME_LENGTH: usize = 200;

/// Trim a required text field, rejecting blank values.
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}

/// Validate that a price is a positive, finite number.
pub fn validate_price(price: f64) -> Result<f64, CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::Validation(format!(
            "price must be a positive number (got {price})"
        )));
    }
    Ok(price)
}

/// Validate the product name length after trimming.
pub fn validate_product_name(name: &str) -> Result<&str, CoreError> {
    let name = require_text("product_name", name)?;
    let len = name.chars().count();
    if len > MAX_PRODUCT_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "product_name exceeds maximum length of {MAX_PRODUCT_NAME_LENGTH} characters (got {len})"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn text_is_trimmed() {
        assert_eq!(require_text("description", "  hello ").unwrap(), "hello");
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = require_text("prompt", " \n\t ").unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: prompt must not be empty");
    }

    #[test]
    fn positive_price_is_valid() {
        assert_eq!(validate_price(5000.0).unwrap(), 5000.0);
        assert_eq!(validate_price(0.01).unwrap(), 0.01);
    }

    #[test]
    fn non_positive_or_non_finite_price_is_rejected() {
        assert_matches!(validate_price(0.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_price(-1.0), Err(CoreError::Validation(_)));
        assert_matches!(validate_price(f64::NAN), Err(CoreError::Validation(_)));
        assert_matches!(validate_price(f64::INFINITY), Err(CoreError::Validation(_)));
    }

    #[test]
    fn product_name_length_limit() {
        let name = "a".repeat(MAX_PRODUCT_NAME_LENGTH);
        assert!(validate_product_name(&name).is_ok());
        let name = "a".repeat(MAX_PRODUCT_NAME_LENGTH + 1);
        assert_matches!(validate_product_name(&name), Err(CoreError::Validation(_)));
    }
}
