// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Frequency-unit, sampling-frequency and frequency-range selection for digital
filter design.

A [`FrequencyUnitSelector`] turns what a user does with its controls into
changes of a shared [`FilterConfig`], and tells other components about those
changes through [`Notification`]s.
 */

pub mod cli;
pub mod config;
pub mod constants;
pub mod eval;
pub mod format;
pub mod notify;
pub mod selector;
pub mod unit_parsing;
pub mod units;

// Re-exports.
pub use cli::{FreqUnits, FreqUnitsError};
pub use config::{ConfigFile, DisplayParams, FilterConfig};
pub use notify::{Change, Notification, Reason};
pub use selector::{Controls, FieldEffect, FieldEvent, FieldState, FrequencyUnitSelector, Key};
pub use units::{FreqUnit, RangeType};
