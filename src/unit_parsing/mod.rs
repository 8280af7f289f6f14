// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to parse strings into frequency units, range types and frequencies
//! that may have a unit attached to them.

mod error;

pub use error::UnitParseError;

use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::units::{FreqUnit, RangeType};

/// Parse the name of a frequency unit. An exact match is preferred, but
/// case-insensitive matches are accepted too (e.g. "khz"); "mhz" is always
/// megahertz.
pub fn parse_freq_unit(s: &str) -> Result<FreqUnit, UnitParseError> {
    let s = s.trim();
    if let Ok(unit) = FreqUnit::from_str(s) {
        return Ok(unit);
    }

    FreqUnit::iter()
        .find(|&unit| {
            let unit_str: &'static str = unit.into();
            unit_str.eq_ignore_ascii_case(s)
        })
        .ok_or_else(|| UnitParseError::UnknownFreqUnit(s.to_string()))
}

/// Parse a frequency range type. Either the name ("half", "whole", "sym") or
/// the text shown in a choice list ("0...½" etc.) is accepted.
pub fn parse_range_type(s: &str) -> Result<RangeType, UnitParseError> {
    let s = s.trim();
    RangeType::iter()
        .find(|&rt| {
            let rt_str: &'static str = rt.into();
            rt_str.eq_ignore_ascii_case(s) || rt.display_text() == s
        })
        .ok_or_else(|| UnitParseError::UnknownRangeType(s.to_string()))
}

/// Parse a string that may have an absolute unit of frequency attached to it.
/// If there's no unit, the unit is `None` and the number is returned as is.
pub fn parse_freq(s: &str) -> Result<(f64, Option<FreqUnit>), UnitParseError> {
    // Try to parse a naked number.
    let maybe_number: Option<f64> = s.trim().parse().ok();
    if let Some(number) = maybe_number {
        return Ok((number, None));
    };

    // That didn't work; let's search over our supported units.
    let suffix = s.trim().trim_start_matches(|c: char| {
        c.is_ascii_digit() || c == '.' || c == '-' || c == '+' || c == 'e' || c == 'E'
    });
    let suffix = suffix.trim();
    for freq_unit in FreqUnit::iter().filter(|u| !u.is_normalized()) {
        let freq_unit_str: &'static str = freq_unit.into();
        if suffix.eq_ignore_ascii_case(freq_unit_str) {
            let prefix = s.trim().trim_end_matches(char::is_alphabetic).trim();
            let number: f64 = match prefix.parse() {
                Ok(n) => n,
                Err(_) => return Err(UnitParseError::GotFreqUnitButCantParse(s.to_string())),
            };
            return Ok((number, Some(freq_unit)));
        }
    }

    // If we made it this far, we don't know how to parse the string.
    Err(UnitParseError::Unknown {
        input: s.to_string(),
        unit_type: "frequency",
    })
}

/// Parse a frequency and express it in `target` units. A naked number is
/// assumed to already be in `target` units. Normalized targets can't be
/// converted to, so a unit on the input is an error for them.
pub fn parse_freq_in_unit(s: &str, target: FreqUnit) -> Result<f64, UnitParseError> {
    match parse_freq(s)? {
        (number, None) => Ok(number),
        (number, Some(unit)) => {
            if target.is_normalized() {
                return Err(UnitParseError::NormalizedTarget {
                    input: s.to_string(),
                    target,
                });
            }
            Ok(number * unit.scale() / target.scale())
        }
    }
}
