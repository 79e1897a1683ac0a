//! Tests for `error` module

use super::config::ConfigError;
use super::error::*;

#[test]
fn test_error_codes_are_unique() {
    // Arrange
    let errors: Vec<Error> = vec![
        Error::TermTooShort { min: 3, actual: 2 },
        Error::Config("test".into()),
        Error::Persistence("test".into()),
    ];

    // Act
    let codes: Vec<&str> = errors.iter().map(Error::code).collect();

    // Assert
    let mut unique_codes = codes.clone();
    unique_codes.sort_unstable();
    unique_codes.dedup();
    assert_eq!(codes.len(), unique_codes.len(), "Error codes must be unique");

    for code in &codes {
        assert!(
            code.starts_with("CARDEX-"),
            "Code {code} should start with CARDEX-"
        );
    }
}

#[test]
fn test_term_too_short_message_carries_counts() {
    let err = Error::TermTooShort { min: 3, actual: 2 };

    let message = err.to_string();

    assert!(message.starts_with("[CARDEX-001]"));
    assert!(message.contains("at least 3"));
    assert!(message.contains("got 2"));
}

#[test]
fn test_only_term_too_short_is_validation() {
    assert!(Error::TermTooShort { min: 3, actual: 0 }.is_validation());
    assert!(!Error::Config("bad".into()).is_validation());
    assert!(!Error::Persistence("disk full".into()).is_validation());
}

#[test]
fn test_config_error_converts_into_config_variant() {
    let err: Error = ConfigError::ParseError("unexpected token".into()).into();

    assert_eq!(err.code(), "CARDEX-002");
    assert!(err.to_string().contains("unexpected token"));
}
