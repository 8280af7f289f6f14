// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The filter configuration shared between the components of a filter-design
//! session, and the display parameters that go with it.
//!
//! There is exactly one [`FilterConfig`] per session. It is owned by the host
//! and lent to whoever needs to read or change it; all changes go through
//! its methods so that derived values (e.g. `T_S`) stay consistent.

mod error;
mod io;

pub use error::ConfigFileError;
pub use io::{ConfigFile, ConfigFileType, CONFIG_FILE_TYPES_COMMA_SEPARATED};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_FMT, DEFAULT_F_S, DEFAULT_N_FFT, DEFAULT_WDG_MARGINS},
    format::NumberFormat,
    units::{FreqUnit, RangeType},
};

/// Frequency-related settings of a filter-design session. The serialised
/// names are the keys that other components look for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// The sampling frequency.
    #[serde(rename = "f_S")]
    f_s: f64,

    /// A frozen copy of the sampling frequency, if it's locked.
    #[serde(rename = "f_S_locked")]
    #[serde(skip_serializing_if = "Option::is_none")]
    f_s_locked: Option<f64>,

    /// The maximum frequency used to scale the frequency axis.
    f_max: f64,

    /// The sampling period (1 / f_S).
    #[serde(rename = "T_S")]
    t_s: f64,

    /// The factor for absolute units (Hz: 1, kHz: 1e3, ...).
    #[serde(rename = "f_S_scale")]
    f_s_scale: f64,

    freq_specs_unit: FreqUnit,

    #[serde(rename = "freqSpecsRangeType")]
    freq_specs_range_type: RangeType,

    #[serde(rename = "freqSpecsRange")]
    freq_specs_range: [f64; 2],

    freq_specs_sort: bool,

    #[serde(rename = "plt_fUnit")]
    plt_f_unit: String,

    #[serde(rename = "plt_tUnit")]
    plt_t_unit: String,

    #[serde(rename = "plt_fLabel")]
    plt_f_label: String,

    #[serde(rename = "plt_tLabel")]
    plt_t_label: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let unit = FreqUnit::f_S;
        let range_type = RangeType::default();
        FilterConfig {
            f_s: DEFAULT_F_S,
            f_s_locked: None,
            f_max: DEFAULT_F_S,
            t_s: 1.0 / DEFAULT_F_S,
            f_s_scale: unit.scale(),
            freq_specs_unit: unit,
            freq_specs_range_type: range_type,
            freq_specs_range: range_type.range(DEFAULT_F_S),
            freq_specs_sort: true,
            plt_f_unit: unit.plot_unit().to_string(),
            plt_t_unit: unit.time_unit().label().to_string(),
            plt_f_label: unit.freq_label(),
            plt_t_label: unit.time_label(),
        }
    }
}

impl FilterConfig {
    pub fn f_s(&self) -> f64 {
        self.f_s
    }

    pub fn f_s_locked(&self) -> Option<f64> {
        self.f_s_locked
    }

    pub fn f_max(&self) -> f64 {
        self.f_max
    }

    pub fn t_s(&self) -> f64 {
        self.t_s
    }

    pub fn f_s_scale(&self) -> f64 {
        self.f_s_scale
    }

    pub fn freq_specs_unit(&self) -> FreqUnit {
        self.freq_specs_unit
    }

    pub fn freq_specs_range_type(&self) -> RangeType {
        self.freq_specs_range_type
    }

    pub fn freq_specs_range(&self) -> [f64; 2] {
        self.freq_specs_range
    }

    pub fn freq_specs_sort(&self) -> bool {
        self.freq_specs_sort
    }

    pub fn plt_f_unit(&self) -> &str {
        &self.plt_f_unit
    }

    pub fn plt_t_unit(&self) -> &str {
        &self.plt_t_unit
    }

    pub fn plt_f_label(&self) -> &str {
        &self.plt_f_label
    }

    pub fn plt_t_label(&self) -> &str {
        &self.plt_t_label
    }

    /// Are frequencies currently normalized (`f_S`, `f_Ny` or `k`)?
    pub fn is_normalized(&self) -> bool {
        self.freq_specs_unit.is_normalized()
    }

    /// Set an absolute sampling frequency. The sampling period and the
    /// maximum frequency follow it. The axis range is *not* updated; see
    /// [`FilterConfig::set_axis_range`].
    pub fn set_sampling_freq(&mut self, f_s: f64) {
        trace!("Setting f_S = {f_s}");
        self.f_s = f_s;
        self.t_s = 1.0 / f_s;
        self.f_max = f_s;
    }

    /// Set the fixed sampling and maximum frequencies used by normalized
    /// units. The sampling period is always 1 for those.
    pub fn set_normalized(&mut self, f_s: f64, f_max: f64) {
        trace!("Setting normalized f_S = {f_s}, f_max = {f_max}");
        self.f_s = f_s;
        self.f_max = f_max;
        self.t_s = 1.0;
    }

    /// Store the frequency unit together with everything that's derived from
    /// it for plotting. `f_s_scale` is stored separately because an unknown
    /// unit name falls back to a scale of 1.
    pub(crate) fn set_unit(&mut self, unit: FreqUnit, f_s_scale: f64) {
        self.freq_specs_unit = unit;
        self.f_s_scale = f_s_scale;
        self.plt_f_unit = unit.plot_unit().to_string();
        self.plt_t_unit = unit.time_unit().label().to_string();
        self.plt_f_label = unit.freq_label();
        self.plt_t_label = unit.time_label();
    }

    /// Store the range type and the axis limits it gives with the current
    /// maximum frequency.
    pub fn set_axis_range(&mut self, range_type: RangeType) {
        self.freq_specs_range_type = range_type;
        self.freq_specs_range = range_type.range(self.f_max);
    }

    /// Freeze the current sampling frequency.
    pub fn lock_sampling_freq(&mut self) {
        self.f_s_locked = Some(self.f_s);
    }

    pub fn unlock_sampling_freq(&mut self) {
        self.f_s_locked = None;
    }

    pub fn set_freq_specs_sort(&mut self, sort: bool) {
        self.freq_specs_sort = sort;
    }

    /// Make the derived values consistent with the stored ones after the
    /// config has been read from somewhere; only `f_S`, `f_max`, the unit and
    /// the range type are trusted.
    pub(crate) fn sanitise(&mut self) -> Result<(), ConfigFileError> {
        if !(self.f_s.is_finite() && self.f_s > 0.0) {
            return Err(ConfigFileError::BadSamplingFreq(self.f_s));
        }
        if !self.f_max.is_finite() {
            return Err(ConfigFileError::BadMaxFreq(self.f_max));
        }
        if let Some(locked) = self.f_s_locked {
            if !(locked.is_finite() && locked > 0.0) {
                return Err(ConfigFileError::BadLockedSamplingFreq(locked));
            }
        }
        self.t_s = if self.freq_specs_unit.is_normalized() {
            1.0
        } else {
            1.0 / self.f_s
        };
        let unit = self.freq_specs_unit;
        self.set_unit(unit, unit.scale());
        self.set_axis_range(self.freq_specs_range_type);
        Ok(())
    }
}

/// Display parameters of the frequency-unit selector. These are opaque to
/// the filter configuration itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
    /// The number of FFT points.
    #[serde(rename = "N_FFT")]
    pub n_fft: usize,

    /// The format of the sampling frequency while it's not being edited.
    #[serde(rename = "FMT")]
    pub fmt: NumberFormat,

    /// Contents margins (left, top, right, bottom).
    pub wdg_margins: [u32; 4],
}

impl Default for DisplayParams {
    fn default() -> Self {
        DisplayParams {
            n_fft: DEFAULT_N_FFT,
            fmt: DEFAULT_FMT.parse().unwrap_or_default(),
            wdg_margins: DEFAULT_WDG_MARGINS,
        }
    }
}
