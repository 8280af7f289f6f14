// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frequency-unit selector.
//!
//! The selector owns the state of its controls (unit, range type, sort and
//! lock toggles, the sampling-frequency field) and maps changes of those
//! controls onto the [`FilterConfig`]. Every handler takes the config by
//! reference; it is never stored. Other components learn about changes
//! through the notifications returned by [`FrequencyUnitSelector::subscribe`].

pub mod field;
#[cfg(test)]
mod tests;

pub use field::{FieldEffect, FieldEvent, FieldState, Key};

use crossbeam_channel::Receiver;
use log::{debug, trace, warn};

use crate::{
    config::{DisplayParams, FilterConfig},
    constants::{DEFAULT_F_S, DEFAULT_TITLE, F_S_NYQUIST_NORMALIZED, SENDER},
    eval::{safe_eval, EvalError, Sign},
    format::full_precision,
    notify::{Change, Notification, Notifier, Reason},
    unit_parsing::parse_freq_unit,
    units::{FreqUnit, RangeType},
};

/// The state of the selector's controls, as a user would see them.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub unit: FreqUnit,
    pub range_type: RangeType,
    pub sort: bool,
    pub lock: bool,

    /// The text of the sampling-frequency field.
    pub fs_text: String,

    /// The sampling-frequency field and the lock toggle are only shown for
    /// absolute units.
    pub fs_visible: bool,
}

impl Controls {
    fn from_config(cfg: &FilterConfig, params: &DisplayParams) -> Controls {
        let unit = cfg.freq_specs_unit();
        Controls {
            unit,
            range_type: cfg.freq_specs_range_type(),
            sort: cfg.freq_specs_sort(),
            lock: cfg.f_s_locked().is_some(),
            fs_text: params.fmt.format(cfg.f_s()),
            fs_visible: !unit.is_normalized(),
        }
    }
}

pub struct FrequencyUnitSelector {
    title: String,
    params: DisplayParams,
    controls: Controls,
    field: FieldState,

    /// The sampling frequency to go back to when leaving a normalized unit.
    fs_old: f64,

    notifier: Notifier,
}

impl FrequencyUnitSelector {
    /// Create a selector whose controls show what's in `cfg`. Nothing in `cfg`
    /// is changed until [`FrequencyUnitSelector::initialize`] is called.
    pub fn new(cfg: &FilterConfig, params: DisplayParams) -> FrequencyUnitSelector {
        let controls = Controls::from_config(cfg, &params);
        FrequencyUnitSelector {
            title: DEFAULT_TITLE.to_string(),
            params,
            controls,
            field: FieldState::default(),
            fs_old: cfg.f_s(),
            notifier: Notifier::new(SENDER),
        }
    }

    pub fn with_title(mut self, title: &str) -> FrequencyUnitSelector {
        self.title = title.to_string();
        self
    }

    /// First-time initialisation: apply the unit that the controls show.
    pub fn initialize(&mut self, cfg: &mut FilterConfig) {
        debug!("Initialising '{}' with unit {}", self.title, self.controls.unit);
        self.select_unit(cfg, self.controls.unit);
    }

    pub fn subscribe(&mut self) -> Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn params(&self) -> &DisplayParams {
        &self.params
    }

    pub fn contents_margins(&self) -> [u32; 4] {
        self.params.wdg_margins
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn field_state(&self) -> FieldState {
        self.field
    }

    /// The sampling frequency that will be restored when an absolute unit is
    /// selected after a normalized one.
    pub fn restore_point(&self) -> f64 {
        self.fs_old
    }

    /// Select a frequency unit.
    ///
    /// Normalized units store the current sampling frequency as the restore
    /// point and use fixed values for `f_S` and `f_max`: 1 and 1 for `f_S`, 2
    /// and 2 for `f_Ny`, 1 and `N_FFT` for `k`. Selecting an absolute unit
    /// after a normalized one restores the sampling frequency.
    ///
    /// Always emits exactly one `view_changed:f_unit`.
    pub fn select_unit(&mut self, cfg: &mut FilterConfig, unit: FreqUnit) {
        self.apply_unit(cfg, unit, unit.scale());
    }

    /// Select a frequency unit by name. Unknown names are reported as a
    /// warning and treated as Hz, i.e. with a scale of 1.
    pub fn select_unit_name(&mut self, cfg: &mut FilterConfig, name: &str) {
        match parse_freq_unit(name) {
            Ok(unit) => self.select_unit(cfg, unit),
            Err(e) => {
                warn!("Unknown frequency unit {name}: {e}");
                self.apply_unit(cfg, FreqUnit::Hz, 1.0);
            }
        }
    }

    fn apply_unit(&mut self, cfg: &mut FilterConfig, unit: FreqUnit, f_s_scale: f64) {
        debug!("Selecting frequency unit {unit}");
        self.controls.unit = unit;
        self.controls.fs_visible = !unit.is_normalized();

        if unit.is_normalized() {
            // The hidden field loses focus along with any typed text.
            self.field = FieldState::Displaying;
            self.fs_old = cfg.f_s();
            match unit {
                FreqUnit::f_S => cfg.set_normalized(DEFAULT_F_S, DEFAULT_F_S),
                FreqUnit::f_Ny => cfg.set_normalized(F_S_NYQUIST_NORMALIZED, F_S_NYQUIST_NORMALIZED),
                _ => cfg.set_normalized(DEFAULT_F_S, self.params.n_fft as f64),
            }
            self.controls.fs_text = self.params.fmt.format(cfg.f_s());
        } else if cfg.is_normalized() {
            debug!("Restoring f_S = {}", self.fs_old);
            cfg.set_sampling_freq(self.fs_old);
            self.controls.fs_text = self.params.fmt.format(cfg.f_s());
        }

        cfg.set_unit(unit, f_s_scale);
        self.recompute_range(cfg, false);
        self.notifier.emit(Change::ViewChanged(Reason::FUnit));
    }

    /// Lock (freeze) or unlock the sampling frequency. Components that must
    /// not follow changes of `f_S` use the locked value instead.
    ///
    /// The lock is hidden while a normalized unit is selected; it can't be
    /// toggled then.
    pub fn toggle_lock(&mut self, cfg: &mut FilterConfig, locked: bool) {
        if !self.controls.fs_visible {
            debug!("Ignoring the f_S lock; frequencies are normalized");
            return;
        }
        self.controls.lock = locked;
        if locked {
            cfg.lock_sampling_freq();
            debug!("Locked f_S = {}", cfg.f_s());
        } else {
            cfg.unlock_sampling_freq();
            debug!("Unlocked f_S");
        }
        self.notifier.emit(Change::ViewChanged(Reason::FUnit));
    }

    /// The user chose a different frequency range.
    pub fn select_range_type(&mut self, cfg: &mut FilterConfig, range_type: RangeType) {
        self.controls.range_type = range_type;
        self.recompute_range(cfg, true);
    }

    /// Recompute the frequency-axis range from the range-type control and the
    /// current maximum frequency. `view_changed:f_range` is only emitted if
    /// `emit` is true.
    pub fn recompute_range(&mut self, cfg: &mut FilterConfig, emit: bool) {
        cfg.set_axis_range(self.controls.range_type);
        trace!(
            "Frequency range ({}): {:?}",
            self.controls.range_type,
            cfg.freq_specs_range()
        );
        if emit {
            self.notifier.emit(Change::ViewChanged(Reason::FRange));
        }
    }

    /// Store whether frequency specs are sorted. Only switching sorting *on*
    /// is announced (`specs_changed:f_sort`).
    pub fn set_sort_flag(&mut self, cfg: &mut FilterConfig, sorted: bool) {
        self.controls.sort = sorted;
        cfg.set_freq_specs_sort(sorted);
        if sorted {
            self.notifier.emit(Change::SpecsChanged(Reason::FSort));
        }
    }

    /// Feed an event of the sampling-frequency field through the editing
    /// protocol. Returns the effect that was carried out, or
    /// [`FieldEffect::Rejected`] if committed text wasn't a valid sampling
    /// frequency. Events are ignored while the field is hidden.
    pub fn handle_field_event(&mut self, cfg: &mut FilterConfig, event: FieldEvent) -> FieldEffect {
        match self.process_field_event(cfg, event) {
            Ok(effect) => effect,
            Err(_) => FieldEffect::Rejected,
        }
    }

    fn process_field_event(
        &mut self,
        cfg: &mut FilterConfig,
        event: FieldEvent,
    ) -> Result<FieldEffect, EvalError> {
        if !self.controls.fs_visible {
            trace!("f_S field is hidden; ignoring {event:?}");
            return Ok(FieldEffect::None);
        }

        let (next, effect) = self.field.on(event);
        trace!("f_S field: {:?} --{:?}--> {:?} ({:?})", self.field, event, next, effect);
        self.field = next;

        match effect {
            FieldEffect::None | FieldEffect::Rejected => (),
            FieldEffect::ShowFullPrecision | FieldEffect::Revert => {
                self.controls.fs_text = full_precision(cfg.f_s());
            }
            FieldEffect::EditText(key) => field::edit_text(&mut self.controls.fs_text, key),
            FieldEffect::Commit => {
                self.commit_fs(cfg)?;
            }
            FieldEffect::CommitAndReformat => {
                let committed = self.commit_fs(cfg);
                self.controls.fs_text = self.params.fmt.format(cfg.f_s());
                committed?;
            }
            FieldEffect::Reformat => {
                self.controls.fs_text = self.params.fmt.format(cfg.f_s());
            }
        }
        Ok(effect)
    }

    /// Enter a new sampling frequency the way a user would: focus the field,
    /// type over its text and leave it. The value is in the selected unit.
    ///
    /// Returns why the text was rejected, if it was. Nothing happens while a
    /// normalized unit is selected.
    pub fn enter_fs(&mut self, cfg: &mut FilterConfig, text: &str) -> Result<(), EvalError> {
        if !self.controls.fs_visible {
            warn!(
                "Not using '{text}' as the sampling frequency; it can't be changed while frequencies are normalized ({})",
                self.controls.unit
            );
            return Ok(());
        }
        self.process_field_event(cfg, FieldEvent::FocusIn)?;
        self.replace_text(cfg, text);
        self.process_field_event(cfg, FieldEvent::FocusOut)?;
        Ok(())
    }

    /// Type some text into the sampling-frequency field, one key at a time.
    pub fn type_text(&mut self, cfg: &mut FilterConfig, text: &str) {
        for c in text.chars() {
            self.handle_field_event(cfg, FieldEvent::KeyPress(Key::Char(c)));
        }
    }

    /// Replace the field text, as if it had been selected and typed over.
    pub fn replace_text(&mut self, cfg: &mut FilterConfig, text: &str) {
        for _ in 0..self.controls.fs_text.chars().count() {
            self.handle_field_event(cfg, FieldEvent::KeyPress(Key::Backspace));
        }
        self.type_text(cfg, text);
    }

    /// Evaluate the field text and, if it's a positive number, use it as the
    /// sampling frequency. Invalid text leaves everything as it was.
    fn commit_fs(&mut self, cfg: &mut FilterConfig) -> Result<f64, EvalError> {
        match safe_eval(&self.controls.fs_text, cfg.f_s(), Sign::Pos) {
            Ok(f_s) => {
                debug!("New sampling frequency: {f_s}");
                cfg.set_sampling_freq(f_s);
                self.recompute_range(cfg, false);
                self.notifier.emit(Change::ViewChanged(Reason::FS));
                Ok(f_s)
            }
            Err(e) => {
                warn!(
                    "Not using '{}' as the sampling frequency: {e}",
                    self.controls.fs_text
                );
                Err(e)
            }
        }
    }

    /// Make the controls show what's in `cfg` (e.g. after another component
    /// changed it) without emitting anything. Text that was typed but not yet
    /// committed is discarded; a focused field shows the full-precision value.
    pub fn reload_from_config(&mut self, cfg: &FilterConfig) {
        debug!("Reloading controls from the filter config");
        self.controls = Controls::from_config(cfg, &self.params);
        if !self.controls.fs_visible {
            self.field = FieldState::Displaying;
        } else if self.field.is_editing() {
            self.field = FieldState::Editing { edited: false };
            self.controls.fs_text = full_precision(cfg.f_s());
        }
    }
}
