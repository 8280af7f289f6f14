// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::CONFIG_FILE_TYPES_COMMA_SEPARATED;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file '{}' doesn't have a recognised file extension! Valid extensions are: {}", .0.display(), *CONFIG_FILE_TYPES_COMMA_SEPARATED)]
    UnknownExtension(PathBuf),

    #[error("Couldn't decode toml structure from '{}':\n{err}", .file.display())]
    TomlDecode {
        file: PathBuf,
        err: toml::de::Error,
    },

    #[error("Couldn't encode the config as toml: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Couldn't decode json structure from '{}':\n{err}", .file.display())]
    JsonDecode {
        file: PathBuf,
        err: serde_json::Error,
    },

    #[error("Couldn't encode the config as json: {0}")]
    JsonEncode(#[from] serde_json::Error),

    #[error("The sampling frequency must be a positive number, but got {0}")]
    BadSamplingFreq(f64),

    #[error("The locked sampling frequency must be a positive number, but got {0}")]
    BadLockedSamplingFreq(f64),

    #[error("The maximum frequency must be a finite number, but got {0}")]
    BadMaxFreq(f64),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}
