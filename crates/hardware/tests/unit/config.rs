//! # Configuration Tests
//!
//! Defaults, JSON deserialization, validation and cycle-count parsing.

use std::path::PathBuf;

use ptysim_core::common::{MAX_CYCLES, SimError};
use ptysim_core::config::*;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.driver.cycles, MAX_CYCLES);
    assert!(config.driver.trace_path.is_none());
    assert!(!config.driver.trace_memories);
    assert!(config.driver.prompt);
    assert!(!config.driver.tracing());
}

#[test]
fn test_serial_config_defaults() {
    let serial = SerialConfig::default();
    assert_eq!(serial.id, "serial0");
    assert_eq!(serial.divisor, 1);
    assert_eq!(serial.history_depth, 16);
}

#[test]
fn test_empty_json_gives_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.driver.cycles, MAX_CYCLES);
    assert_eq!(config.serial.id, "serial0");
}

#[test]
fn test_json_overrides() {
    let json = r#"{
        "driver": { "cycles": 42, "trace_path": "out.vcd", "trace_memories": true, "prompt": false },
        "serial": { "id": "uart1", "divisor": 868, "history_depth": 4 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert_eq!(config.driver.cycles, 42);
    assert_eq!(config.driver.trace_path, Some(PathBuf::from("out.vcd")));
    assert!(config.driver.trace_memories);
    assert!(!config.driver.prompt);
    assert!(config.driver.tracing());
    assert_eq!(config.serial.id, "uart1");
    assert_eq!(config.serial.divisor, 868);
    assert_eq!(config.serial.history_depth, 4);
}

#[test]
fn test_unknown_field_rejected() {
    let err = Config::from_json(r#"{ "driver": { "cycle": 1 } }"#).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn test_malformed_json_rejected() {
    let err = Config::from_json("{ driver").unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[rstest]
#[case(r#"{ "serial": { "id": "" } }"#)]
#[case(r#"{ "serial": { "history_depth": 0 } }"#)]
#[case(r#"{ "serial": { "history_depth": 257 } }"#)]
#[case(r#"{ "driver": { "cycles": 9223372036854775808 } }"#)]
fn test_out_of_range_values(#[case] json: &str) {
    let err = Config::from_json(json).unwrap_err();
    assert!(matches!(err, SimError::Argument(_)), "{err:?}");
}

#[rstest]
#[case("0", 0)]
#[case("1", 1)]
#[case(" 1000 ", 1000)]
#[case("9223372036854775807", MAX_CYCLES)]
fn test_parse_cycles_accepts(#[case] text: &str, #[case] expected: u64) {
    assert_eq!(parse_cycles(text).unwrap(), expected);
}

#[rstest]
#[case("9223372036854775808")]
#[case("99999999999999999999")]
#[case("-1")]
#[case("ten")]
#[case("")]
fn test_parse_cycles_rejects(#[case] text: &str) {
    match parse_cycles(text).unwrap_err() {
        SimError::Argument(msg) => assert_eq!(msg, cycles_range_message()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_cycles_range_message_text() {
    assert_eq!(
        cycles_range_message(),
        "Cycles must be a positive integer lesser than or equal to 9223372036854775807"
    );
}
