// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scripts of user actions, replayed against a selector.
//!
//! A toml script looks like
//!
//! ```toml
//! [[actions]]
//! action = "select_unit"
//! unit = "kHz"
//!
//! [[actions]]
//! action = "set_fs"
//! fs = "48"
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::FreqUnitsError;
use crate::{
    config::FilterConfig,
    selector::{FieldEvent, FrequencyUnitSelector, Key},
    unit_parsing::parse_range_type,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub(super) struct Script {
    #[serde(default)]
    pub(super) actions: Vec<Action>,
}

impl Script {
    pub(super) fn read(path: &Path) -> Result<Script, FreqUnitsError> {
        let script: Script = unpack_arg_file!(path);
        debug!("Read {} actions from {}", script.actions.len(), path.display());
        Ok(script)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(super) enum Action {
    SelectUnit { unit: String },
    RangeType { range: String },
    Lock { locked: bool },
    Sort { sorted: bool },
    FocusIn,
    TypeText { text: String },
    Key { key: Key },
    FocusOut,

    /// Focus the sampling-frequency field, replace its text and leave it.
    SetFs { fs: String },

    Reload,
}

impl Action {
    pub(super) fn apply(
        &self,
        selector: &mut FrequencyUnitSelector,
        cfg: &mut FilterConfig,
    ) -> Result<(), FreqUnitsError> {
        debug!("Action: {self:?}");
        match self {
            Action::SelectUnit { unit } => selector.select_unit_name(cfg, unit),
            Action::RangeType { range } => {
                let range_type = parse_range_type(range)?;
                selector.select_range_type(cfg, range_type);
            }
            Action::Lock { locked } => selector.toggle_lock(cfg, *locked),
            Action::Sort { sorted } => selector.set_sort_flag(cfg, *sorted),
            Action::FocusIn => {
                selector.handle_field_event(cfg, FieldEvent::FocusIn);
            }
            Action::TypeText { text } => selector.type_text(cfg, text),
            Action::Key { key } => {
                selector.handle_field_event(cfg, FieldEvent::KeyPress(*key));
            }
            Action::FocusOut => {
                selector.handle_field_event(cfg, FieldEvent::FocusOut);
            }
            Action::SetFs { fs } => selector.enter_fs(cfg, fs)?,
            Action::Reload => selector.reload_from_config(cfg),
        }
        Ok(())
    }
}
