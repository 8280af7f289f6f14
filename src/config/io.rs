// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing filter configurations.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{ConfigFileError, DisplayParams, FilterConfig};

lazy_static::lazy_static! {
    pub static ref CONFIG_FILE_TYPES_COMMA_SEPARATED: String = ConfigFileType::iter().join(", ");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum ConfigFileType {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

impl ConfigFileType {
    /// Work out the file type from a path's extension (case insensitive).
    pub fn from_path(path: &Path) -> Result<ConfigFileType, ConfigFileError> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ConfigFileType::from_str(&e).ok())
            .ok_or_else(|| ConfigFileError::UnknownExtension(path.to_path_buf()))
    }
}

/// Everything that can be stored in a config file. Both tables are optional,
/// and so is every key inside them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub filter: FilterConfig,
    pub params: DisplayParams,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<ConfigFile, ConfigFileError> {
        debug!("Attempting to parse config file {}", path.display());
        let file_type = ConfigFileType::from_path(path)?;

        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;
        let mut config = ConfigFile::from_str_with_type(&contents, file_type, path)?;
        config.filter.sanitise()?;
        Ok(config)
    }

    fn from_str_with_type(
        contents: &str,
        file_type: ConfigFileType,
        path: &Path,
    ) -> Result<ConfigFile, ConfigFileError> {
        match file_type {
            ConfigFileType::Toml => {
                debug!("Parsing toml file...");
                toml::from_str(contents).map_err(|err| ConfigFileError::TomlDecode {
                    file: path.to_path_buf(),
                    err,
                })
            }
            ConfigFileType::Json => {
                debug!("Parsing json file...");
                serde_json::from_str(contents).map_err(|err| ConfigFileError::JsonDecode {
                    file: path.to_path_buf(),
                    err,
                })
            }
        }
    }

    /// Serialise to the format given by the file type.
    pub fn serialise(&self, file_type: ConfigFileType) -> Result<String, ConfigFileError> {
        Ok(match file_type {
            ConfigFileType::Toml => toml::to_string(self)?,
            ConfigFileType::Json => serde_json::to_string_pretty(self)?,
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigFileError> {
        let file_type = ConfigFileType::from_path(path)?;
        debug!("Writing {file_type} config file {}", path.display());
        let s = self.serialise(file_type)?;
        let mut f = BufWriter::new(File::create(path)?);
        f.write_all(s.as_bytes())?;
        f.flush()?;
        Ok(())
    }
}
