// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frequency units, their paired time units and the axis ranges that can be
//! selected.
//!
//! Frequencies are either "normalized" (`f_S`, `f_Ny`, `k`), i.e. expressed
//! relative to the sampling frequency, or absolute (`Hz`, `kHz`, `MHz`,
//! `GHz`).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Frequency label used for frequencies normalized to `f_S`.
pub const F_LABEL_F_S: &str = r"$F = f\, /\, f_S = \Omega \, /\,  2 \mathrm{\pi} \; \rightarrow$";

/// Frequency label used for frequencies normalized to the Nyquist frequency.
pub const F_LABEL_F_NY: &str =
    r"$F = 2f \, / \, f_S = \Omega \, / \, \mathrm{\pi} \; \rightarrow$";

/// Frequency label used when plotting over the frequency index.
pub const F_LABEL_K: &str = r"$k \; \rightarrow$";

/// Time label used for all normalized frequency units.
pub const T_LABEL_NORMALIZED: &str = r"$n \; \rightarrow$";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[allow(non_camel_case_types)]
pub enum FreqUnit {
    /// Frequency index.
    k,

    /// Normalized to the sampling frequency.
    f_S,

    /// Normalized to the Nyquist frequency (f_S / 2).
    f_Ny,

    Hz,
    kHz,
    MHz,
    GHz,
}

impl FreqUnit {
    pub fn is_normalized(self) -> bool {
        matches!(self, FreqUnit::k | FreqUnit::f_S | FreqUnit::f_Ny)
    }

    /// The factor that converts a value in this unit into Hz. Normalized units
    /// aren't scaled.
    pub fn scale(self) -> f64 {
        match self {
            FreqUnit::Hz | FreqUnit::k | FreqUnit::f_S | FreqUnit::f_Ny => 1.0,
            FreqUnit::kHz => 1e3,
            FreqUnit::MHz => 1e6,
            FreqUnit::GHz => 1e9,
        }
    }

    pub fn time_unit(self) -> TimeUnit {
        match self {
            FreqUnit::k | FreqUnit::f_S | FreqUnit::f_Ny => TimeUnit::None,
            FreqUnit::Hz => TimeUnit::S,
            FreqUnit::kHz => TimeUnit::Ms,
            FreqUnit::MHz => TimeUnit::Us,
            FreqUnit::GHz => TimeUnit::Ns,
        }
    }

    /// The unit that plots use for their frequency axis. A frequency index is
    /// plotted against an axis normalized to `f_S`.
    pub fn plot_unit(self) -> FreqUnit {
        match self {
            FreqUnit::k => FreqUnit::f_S,
            u => u,
        }
    }

    /// The frequency-axis label, including the unit and an arrow.
    pub fn freq_label(self) -> String {
        match self {
            FreqUnit::f_S => F_LABEL_F_S.to_string(),
            FreqUnit::f_Ny => F_LABEL_F_NY.to_string(),
            FreqUnit::k => F_LABEL_K.to_string(),
            u => format!(r"$f$ in {u}$\; \rightarrow$"),
        }
    }

    /// The time-axis label, including the unit and an arrow.
    pub fn time_label(self) -> String {
        if self.is_normalized() {
            T_LABEL_NORMALIZED.to_string()
        } else {
            format!(r"$t$ in {}$\; \rightarrow$", self.time_unit().label())
        }
    }
}

/// The time unit that accompanies a frequency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Normalized frequencies have no time unit; time is a sample index.
    None,
    S,
    Ms,
    Us,
    Ns,
}

impl TimeUnit {
    /// Label text, suitable for a plot axis. Microseconds use markup for the
    /// Greek letter.
    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::None => "",
            TimeUnit::S => "s",
            TimeUnit::Ms => "ms",
            TimeUnit::Us => r"$\mu$s",
            TimeUnit::Ns => "ns",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    /// 0 to f_max / 2
    #[default]
    Half,

    /// 0 to f_max
    Whole,

    /// -f_max / 2 to f_max / 2
    Sym,
}

impl RangeType {
    /// The text shown next to this range type in a choice list.
    pub fn display_text(self) -> &'static str {
        match self {
            RangeType::Half => "0...½",
            RangeType::Whole => "0...1",
            RangeType::Sym => "-½...½",
        }
    }

    /// The frequency-axis limits for this range type given the maximum
    /// frequency.
    pub fn range(self, f_max: f64) -> [f64; 2] {
        match self {
            RangeType::Whole => [0.0, f_max],
            RangeType::Sym => [-f_max / 2.0, f_max / 2.0],
            RangeType::Half => [0.0, f_max / 2.0],
        }
    }
}
