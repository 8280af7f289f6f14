// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Things shared by the command-line code: argument-file handling and help
//! texts.

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    config::CONFIG_FILE_TYPES_COMMA_SEPARATED,
    constants::{DEFAULT_FMT, DEFAULT_N_FFT},
    units::{FreqUnit, RangeType},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref CONFIG_HELP: String =
        format!("The filter configuration to start from. If not given, the defaults are used (f_S = 1, normalized to f_S). Supported formats: {}", *CONFIG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref SCRIPT_HELP: String =
        format!("A file listing actions (unit selections, key presses, ...) to be replayed in order. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref UNIT_HELP: String =
        format!("The frequency unit to select. Valid units are: {}", FreqUnit::iter().join(", "));

    pub(super) static ref RANGE_HELP: String =
        format!("The frequency range to use. Valid ranges are: {}", RangeType::iter().join(", "));

    pub(super) static ref N_FFT_HELP: String =
        format!("The number of FFT points; f_max when the unit is k. Default: {DEFAULT_N_FFT}");

    pub(super) static ref FMT_HELP: String =
        format!("The format of the sampling frequency when it's not being edited. Default: {DEFAULT_FMT}");

    pub(super) static ref OUTPUT_HELP: String =
        format!("Write the resulting filter configuration to this file. Supported formats: {}", *CONFIG_FILE_TYPES_COMMA_SEPARATED);
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

/// Deserialise a toml or json file into whatever type is expected. The file
/// type comes from the extension. Errors are returned from the calling
/// function as `FreqUnitsError::ArgFile`.
macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(FreqUnitsError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(FreqUnitsError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(FreqUnitsError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}
