// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all freq-units-related errors. This should be the *only*
//! error enum that is publicly visible from the command-line code.

use thiserror::Error;

use crate::{
    config::ConfigFileError, eval::EvalError, format::FormatSpecError,
    unit_parsing::UnitParseError,
};

#[derive(Error, Debug)]
pub enum FreqUnitsError {
    /// An error related to filter-configuration files.
    #[error("{0}\n\nA filter configuration has optional [filter] and [params] tables; see the README for the keys.")]
    Config(String),

    /// An error related to argument or script files.
    #[error("{0}")]
    ArgFile(String),

    /// Bad units, range types or frequencies.
    #[error("{0}")]
    Units(String),

    /// A bad display format.
    #[error("{0}\n\nFormats look like {{:.3g}}, {{:.2f}}, {{:.4e}} or {{}}.")]
    Format(String),

    /// Arguments that can't be used together.
    #[error("{0}")]
    Args(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

impl From<ConfigFileError> for FreqUnitsError {
    fn from(e: ConfigFileError) -> Self {
        match e {
            ConfigFileError::IO(e) => Self::from(e),
            _ => Self::Config(e.to_string()),
        }
    }
}

impl From<UnitParseError> for FreqUnitsError {
    fn from(e: UnitParseError) -> Self {
        Self::Units(e.to_string())
    }
}

impl From<EvalError> for FreqUnitsError {
    fn from(e: EvalError) -> Self {
        Self::Units(format!("Invalid sampling frequency: {e}"))
    }
}

impl From<FormatSpecError> for FreqUnitsError {
    fn from(e: FormatSpecError) -> Self {
        Self::Format(e.to_string())
    }
}

impl From<std::io::Error> for FreqUnitsError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<serde_json::Error> for FreqUnitsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<toml::ser::Error> for FreqUnitsError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
