// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Display formats for numbers that are chosen at runtime, e.g. `{:.3g}` from a
//! configuration file.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// Shortest representation that round-trips (`{}`).
    Plain,

    /// Significant digits, switching to scientific notation for large and
    /// small numbers (`{:.Ng}`).
    General,

    /// Fixed number of decimals (`{:.Nf}`).
    Fixed,

    /// Scientific notation (`{:.Ne}`).
    Exponent,
}

/// A number format parsed from a string like `{:.3g}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    spec: String,
    kind: FormatKind,
    precision: usize,
}

#[derive(Debug, Error)]
pub enum FormatSpecError {
    #[error("Format '{0}' must be enclosed in braces, e.g. '{{:.3g}}'")]
    NoBraces(String),

    #[error("Format '{0}' doesn't specify a precision, e.g. '{{:.3g}}'")]
    NoPrecision(String),

    #[error("Could not parse the precision of format '{0}'")]
    BadPrecision(String),

    #[error("Format '{spec}' has an unsupported type '{kind}'; supported types are g, f and e")]
    UnsupportedKind { spec: String, kind: String },
}

impl NumberFormat {
    /// The string this format was parsed from.
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value);
        }
        match self.kind {
            FormatKind::Plain => full_precision(value),
            FormatKind::Fixed => format!("{:.*}", self.precision, value),
            FormatKind::Exponent => {
                let s = format!("{:.*e}", self.precision, value);
                let (mantissa, exponent) = split_exponent(&s);
                format!("{mantissa}{}", exponent_suffix(exponent))
            }
            FormatKind::General => format_general(value, self.precision.max(1)),
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            spec: "{:.3g}".to_string(),
            kind: FormatKind::General,
            precision: 3,
        }
    }
}

impl FromStr for NumberFormat {
    type Err = FormatSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let inner = spec
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| FormatSpecError::NoBraces(spec.to_string()))?;
        if inner.is_empty() || inner == ":" {
            return Ok(NumberFormat {
                spec: spec.to_string(),
                kind: FormatKind::Plain,
                precision: 0,
            });
        }

        let digits_and_kind = inner
            .strip_prefix(":.")
            .ok_or_else(|| FormatSpecError::NoPrecision(spec.to_string()))?;
        let split = digits_and_kind
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits_and_kind.len());
        let (digits, kind) = digits_and_kind.split_at(split);
        let precision = digits
            .parse()
            .map_err(|_| FormatSpecError::BadPrecision(spec.to_string()))?;
        let kind = match kind {
            "g" | "G" => FormatKind::General,
            "f" | "F" => FormatKind::Fixed,
            "e" | "E" => FormatKind::Exponent,
            _ => {
                return Err(FormatSpecError::UnsupportedKind {
                    spec: spec.to_string(),
                    kind: kind.to_string(),
                })
            }
        };

        Ok(NumberFormat {
            spec: spec.to_string(),
            kind,
            precision,
        })
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.spec)
    }
}

impl Serialize for NumberFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.spec)
    }
}

impl<'de> Deserialize<'de> for NumberFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The shortest representation of `value` that round-trips.
pub fn full_precision(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        non_finite(value)
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Split Rust's `{:e}` output (e.g. "4.80e4") into mantissa and exponent.
fn split_exponent(s: &str) -> (&str, i32) {
    match s.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn exponent_suffix(exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("e{sign}{:02}", exponent.abs())
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn format_general(value: f64, precision: usize) -> String {
    // Round to the requested number of significant digits first; the
    // exponent of the rounded value decides the notation.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = split_exponent(&sci);
    if exponent >= -4 && (exponent as i64) < precision as i64 {
        let decimals = (precision as i64 - 1 - exponent as i64).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        strip_trailing_zeros(&fixed).to_string()
    } else {
        format!(
            "{}{}",
            strip_trailing_zeros(mantissa),
            exponent_suffix(exponent)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(spec: &str, value: f64) -> String {
        let f: NumberFormat = spec.parse().unwrap();
        f.format(value)
    }

    #[test]
    fn test_general_format() {
        assert_eq!(fmt("{:.3g}", 1.0), "1");
        assert_eq!(fmt("{:.3g}", 2.0), "2");
        assert_eq!(fmt("{:.3g}", 0.5), "0.5");
        assert_eq!(fmt("{:.3g}", 123.0), "123");
        assert_eq!(fmt("{:.3g}", 1000.0), "1e+03");
        assert_eq!(fmt("{:.3g}", 48000.0), "4.8e+04");
        assert_eq!(fmt("{:.3g}", 44100.0), "4.41e+04");
        assert_eq!(fmt("{:.3g}", 1.23456), "1.23");
        assert_eq!(fmt("{:.3g}", 0.0001234), "0.000123");
        assert_eq!(fmt("{:.3g}", 0.00001234), "1.23e-05");
        assert_eq!(fmt("{:.3g}", 999.9), "1e+03");
        assert_eq!(fmt("{:.3g}", -2.5), "-2.5");
        assert_eq!(fmt("{:.3g}", 0.0), "0");
        assert_eq!(fmt("{:.4g}", 2048.0), "2048");
        assert_eq!(fmt("{:.0g}", 26.0), "3e+01");
    }

    #[test]
    fn test_fixed_and_exponent_formats() {
        assert_eq!(fmt("{:.2f}", 1.0), "1.00");
        assert_eq!(fmt("{:.1F}", 48000.0), "48000.0");
        assert_eq!(fmt("{:.2e}", 48000.0), "4.80e+04");
        assert_eq!(fmt("{:.1e}", 0.00123), "1.2e-03");
    }

    #[test]
    fn test_plain_format() {
        assert_eq!(fmt("{}", 48000.0), "48000");
        assert_eq!(fmt("{:}", 0.1), "0.1");
        assert_eq!(fmt("{:.3g}", f64::INFINITY), "inf");
        assert_eq!(full_precision(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_bad_specs() {
        assert!(matches!(
            ".3g".parse::<NumberFormat>(),
            Err(FormatSpecError::NoBraces(_))
        ));
        assert!(matches!(
            "{:3g}".parse::<NumberFormat>(),
            Err(FormatSpecError::NoPrecision(_))
        ));
        assert!(matches!(
            "{:.g}".parse::<NumberFormat>(),
            Err(FormatSpecError::BadPrecision(_))
        ));
        assert!(matches!(
            "{:.3x}".parse::<NumberFormat>(),
            Err(FormatSpecError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_default_is_three_significant_digits() {
        let f = NumberFormat::default();
        assert_eq!(f.kind(), FormatKind::General);
        assert_eq!(f.precision(), 3);
        assert_eq!(f.spec(), "{:.3g}");
        assert_eq!(f, "{:.3g}".parse().unwrap());
    }
}
