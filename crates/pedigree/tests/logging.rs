//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use pedigree::core::logging::{init_logging, LogFormat};
use std::str::FromStr;

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
    assert!(LogFormat::from_str("xml").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert_eq!(variants.len(), 3);
    assert!(variants.contains(&"pretty"));
}

#[test]
fn test_init_logging_with_levels() {
    // Only the first call can install the global subscriber; the rest must
    // fail gracefully rather than panic
    let _ = init_logging(Some("trace"), Some("compact"));
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("warn"), Some("json"));
    let _ = init_logging(Some("off"), Some("pretty"));
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_render_emits_under_subscriber() {
    let _ = init_logging(Some("trace"), Some("compact"));

    // Pipeline spans and events must not disturb rendering
    let svg = pedigree::render_svg(
        r#"[{"id": "A", "sex": "M", "pos": {"x": 0, "y": 0}, "mate": "ghost", "isProband": true},
            {"id": "B", "sex": "F", "pos": {"x": 1, "y": 0}, "isProband": true}]"#,
    )
    .unwrap();
    assert!(svg.contains("<svg"));
}
