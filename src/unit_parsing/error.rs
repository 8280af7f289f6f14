// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::units::FreqUnit;

#[derive(Debug, Error)]
pub enum UnitParseError {
    #[error(
        "Successfully parsed a frequency unit, but could not parse the numerical component of '{0}'"
    )]
    GotFreqUnitButCantParse(String),

    #[error("Could not parse '{input}' as a {unit_type}")]
    Unknown {
        input: String,
        unit_type: &'static str,
    },

    #[error("'{0}' is not a frequency unit; valid units are k, f_S, f_Ny, Hz, kHz, MHz and GHz")]
    UnknownFreqUnit(String),

    #[error("'{0}' is not a frequency range type; valid types are half, whole and sym")]
    UnknownRangeType(String),

    #[error("'{input}' has an absolute unit, but frequencies are currently normalized ({target})")]
    NormalizedTarget { input: String, target: FreqUnit },
}
