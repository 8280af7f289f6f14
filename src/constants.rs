// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All frequency-related constants are double precision; the filter configuration
never stores anything in a lower precision.
 */

/// The name that accompanies every notification sent by the frequency-unit
/// selector.
pub const SENDER: &str = "freq_units";

/// The title of the frequency-unit selector.
pub const DEFAULT_TITLE: &str = "Frequency Units";

/// The number of FFT points. When frequencies are displayed as an index `k`,
/// the maximum frequency is set to this value.
pub const DEFAULT_N_FFT: usize = 2048;

/// The format used to display the sampling frequency when it isn't being
/// edited.
pub const DEFAULT_FMT: &str = "{:.3g}";

/// Contents margins of the selector (left, top, right, bottom).
pub const DEFAULT_WDG_MARGINS: [u32; 4] = [2, 1, 2, 1];

/// The sampling frequency used when nothing else has been specified. This is
/// also the value used for frequencies normalized to the sampling frequency.
pub const DEFAULT_F_S: f64 = 1.0;

/// The sampling frequency used for frequencies normalized to the Nyquist
/// frequency.
pub const F_S_NYQUIST_NORMALIZED: f64 = 2.0;
