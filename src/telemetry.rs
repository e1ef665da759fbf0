//! Telemetry records sent by the mixer firmware.
//!
//! The firmware writes one JSON object per line:
//! `{"pot1": 512, "pot2": 0, "pot3": 1023}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Field names, in display order.
pub const FIELDS: [&str; 3] = ["pot1", "pot2", "pot3"];

/// One sample of the three potentiometers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub pot1: u16,
    pub pot2: u16,
    pub pot3: u16,
}

impl TelemetryRecord {
    /// The single-line status rendering, without carriage return.
    pub fn status_line(&self) -> String {
        format!(
            "🎛️  Pot1: {:4}  |  Pot2: {:4}  |  Pot3: {:4}  ",
            self.pot1, self.pot2, self.pot3
        )
    }
}

/// Classification of one received line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// A complete reading.
    Reading(TelemetryRecord),
    /// Not JSON, or JSON that is not an object.
    Malformed,
    /// A JSON object without one of the expected keys.
    MissingField(&'static str),
    /// A key whose value is not an unsigned 16-bit integer.
    InvalidField(&'static str),
}

impl fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reading(record) => write!(f, "{}", record.status_line()),
            Self::Malformed => write!(f, "malformed line"),
            Self::MissingField(field) => write!(f, "missing field '{}'", field),
            Self::InvalidField(field) => write!(f, "invalid value for '{}'", field),
        }
    }
}

/// Parse one line of text. Fields are checked in `FIELDS` order, so the
/// first missing or bad key is the one reported. Extra keys are ignored.
pub fn parse_line(line: &str) -> LineOutcome {
    let object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        _ => return LineOutcome::Malformed,
    };

    let mut values = [0u16; 3];
    for (slot, field) in values.iter_mut().zip(FIELDS) {
        let Some(value) = object.get(field) else {
            return LineOutcome::MissingField(field);
        };
        match value.as_u64().and_then(|v| u16::try_from(v).ok()) {
            Some(v) => *slot = v,
            None => return LineOutcome::InvalidField(field),
        }
    }

    let [pot1, pot2, pot3] = values;
    LineOutcome::Reading(TelemetryRecord { pot1, pot2, pot3 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_record() {
        let outcome = parse_line(r#"{"pot1": 512, "pot2": 0, "pot3": 1023}"#);
        assert_eq!(
            outcome,
            LineOutcome::Reading(TelemetryRecord {
                pot1: 512,
                pot2: 0,
                pot3: 1023
            })
        );
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let outcome = parse_line(r#"{"pot3": 3, "pot1": 1, "pot2": 2, "button": true}"#);
        assert!(matches!(outcome, LineOutcome::Reading(r) if r.pot3 == 3));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse_line("not json"), LineOutcome::Malformed);
        assert_eq!(parse_line(""), LineOutcome::Malformed);
        assert_eq!(parse_line("[1, 2, 3]"), LineOutcome::Malformed);
        assert_eq!(parse_line("42"), LineOutcome::Malformed);
        assert_eq!(parse_line(r#"{"pot1": 1"#), LineOutcome::Malformed);
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(
            parse_line(r#"{"pot1": 1, "pot3": 3}"#),
            LineOutcome::MissingField("pot2")
        );
        assert_eq!(parse_line("{}"), LineOutcome::MissingField("pot1"));
    }

    #[test]
    fn test_invalid_field_values() {
        assert_eq!(
            parse_line(r#"{"pot1": -1, "pot2": 0, "pot3": 0}"#),
            LineOutcome::InvalidField("pot1")
        );
        assert_eq!(
            parse_line(r#"{"pot1": 1, "pot2": 1.5, "pot3": 0}"#),
            LineOutcome::InvalidField("pot2")
        );
        assert_eq!(
            parse_line(r#"{"pot1": 1, "pot2": 2, "pot3": 70000}"#),
            LineOutcome::InvalidField("pot3")
        );
    }

    #[test]
    fn test_status_line_pads_values() {
        let record = TelemetryRecord {
            pot1: 7,
            pot2: 4095,
            pot3: 0,
        };
        assert_eq!(
            record.status_line(),
            "🎛️  Pot1:    7  |  Pot2: 4095  |  Pot3:    0  "
        );
    }
}
