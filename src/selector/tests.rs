// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use crossbeam_channel::Receiver;
use strum::IntoEnumIterator;

use super::*;
use crate::units::{F_LABEL_F_NY, F_LABEL_K, T_LABEL_NORMALIZED};

/// A config at 1 kHz shown in Hz, and a selector for it.
fn absolute_setup() -> (FilterConfig, FrequencyUnitSelector, Receiver<Notification>) {
    let mut cfg = FilterConfig::default();
    cfg.set_sampling_freq(1000.0);
    cfg.set_unit(FreqUnit::Hz, 1.0);
    cfg.set_axis_range(RangeType::Half);
    let mut sel = FrequencyUnitSelector::new(&cfg, DisplayParams::default());
    let rx = sel.subscribe();
    (cfg, sel, rx)
}

fn changes(rx: &Receiver<Notification>) -> Vec<Change> {
    rx.try_iter()
        .map(|n| {
            assert_eq!(n.sender, SENDER);
            n.change
        })
        .collect()
}

fn assert_fs(cfg: &FilterConfig, f_s: f64, f_max: f64, t_s: f64) {
    assert_abs_diff_eq!(cfg.f_s(), f_s);
    assert_abs_diff_eq!(cfg.f_max(), f_max);
    assert_abs_diff_eq!(cfg.t_s(), t_s);
}

#[test]
fn test_new_shows_the_config() {
    let (cfg, sel, rx) = absolute_setup();
    let c = sel.controls();
    assert_eq!(c.unit, FreqUnit::Hz);
    assert_eq!(c.range_type, RangeType::Half);
    assert!(c.sort);
    assert!(!c.lock);
    assert!(c.fs_visible);
    assert_eq!(c.fs_text, "1e+03");
    assert_abs_diff_eq!(sel.restore_point(), cfg.f_s());
    assert_eq!(sel.field_state(), FieldState::Displaying);
    assert_eq!(sel.title(), "Frequency Units");
    assert_eq!(sel.contents_margins(), [2, 1, 2, 1]);
    assert!(changes(&rx).is_empty());

    let sel = sel.with_title("Units");
    assert_eq!(sel.title(), "Units");
}

#[test]
fn test_initialize_applies_the_shown_unit() {
    let mut cfg = FilterConfig::default();
    let mut sel = FrequencyUnitSelector::new(&cfg, DisplayParams::default());
    let rx = sel.subscribe();
    sel.initialize(&mut cfg);

    assert_fs(&cfg, 1.0, 1.0, 1.0);
    assert_eq!(cfg.freq_specs_unit(), FreqUnit::f_S);
    assert!(!sel.controls().fs_visible);
    assert_eq!(sel.controls().fs_text, "1");
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FUnit)]);
}

#[test]
fn test_normalized_units_use_fixed_frequencies() {
    let (mut cfg, mut sel, rx) = absolute_setup();

    sel.select_unit(&mut cfg, FreqUnit::f_S);
    assert_fs(&cfg, 1.0, 1.0, 1.0);
    assert_eq!(cfg.plt_f_unit(), "f_S");
    assert_eq!(cfg.plt_t_unit(), "");
    assert_eq!(cfg.plt_t_label(), T_LABEL_NORMALIZED);

    sel.select_unit(&mut cfg, FreqUnit::f_Ny);
    assert_fs(&cfg, 2.0, 2.0, 1.0);
    assert_eq!(cfg.plt_f_label(), F_LABEL_F_NY);
    assert_eq!(cfg.freq_specs_range(), [0.0, 1.0]);
    assert_eq!(sel.controls().fs_text, "2");

    sel.select_unit(&mut cfg, FreqUnit::k);
    assert_fs(&cfg, 1.0, 2048.0, 1.0);
    // k is plotted like f_S.
    assert_eq!(cfg.plt_f_unit(), "f_S");
    assert_eq!(cfg.plt_f_label(), F_LABEL_K);
    assert_eq!(cfg.freq_specs_range(), [0.0, 1024.0]);
    assert_abs_diff_eq!(cfg.f_s_scale(), 1.0);
    assert!(!sel.controls().fs_visible);

    // One notification per selection, and the range recomputation is silent.
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FUnit); 3]);
}

#[test]
fn test_k_uses_n_fft() {
    let (mut cfg, _, _) = absolute_setup();
    let params = DisplayParams {
        n_fft: 512,
        ..Default::default()
    };
    let mut sel = FrequencyUnitSelector::new(&cfg, params);
    sel.select_unit(&mut cfg, FreqUnit::k);
    assert_fs(&cfg, 1.0, 512.0, 1.0);
}

#[test]
fn test_absolute_units() {
    let (mut cfg, mut sel, rx) = absolute_setup();

    for (unit, scale, t_unit) in [
        (FreqUnit::kHz, 1e3, "ms"),
        (FreqUnit::MHz, 1e6, r"$\mu$s"),
        (FreqUnit::GHz, 1e9, "ns"),
        (FreqUnit::Hz, 1.0, "s"),
    ] {
        sel.select_unit(&mut cfg, unit);
        assert_abs_diff_eq!(cfg.f_s_scale(), scale);
        assert_eq!(cfg.plt_f_unit(), unit.to_string());
        assert_eq!(cfg.plt_t_unit(), t_unit);
        assert_eq!(cfg.plt_f_label(), format!(r"$f$ in {unit}$\; \rightarrow$"));
        assert_eq!(cfg.plt_t_label(), format!(r"$t$ in {t_unit}$\; \rightarrow$"));
        // Switching between absolute units doesn't touch the sampling frequency.
        assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
        assert!(sel.controls().fs_visible);
    }
    assert_eq!(changes(&rx).len(), 4);
}

#[test]
fn test_absolute_normalized_absolute_restores_f_s() {
    let (mut cfg, mut sel, _rx) = absolute_setup();
    for normalized in [FreqUnit::f_S, FreqUnit::f_Ny, FreqUnit::k] {
        sel.select_unit(&mut cfg, normalized);
        assert_abs_diff_eq!(sel.restore_point(), 1000.0);
        sel.select_unit(&mut cfg, FreqUnit::Hz);
        assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
        assert_eq!(sel.controls().fs_text, "1e+03");
    }
}

#[test]
fn test_restore_point_follows_the_last_normalized_selection() {
    let (mut cfg, mut sel, _rx) = absolute_setup();
    sel.select_unit(&mut cfg, FreqUnit::f_S);
    sel.select_unit(&mut cfg, FreqUnit::f_Ny);
    // The restore point is now the normalized f_S of 1.
    assert_abs_diff_eq!(sel.restore_point(), 1.0);
    sel.select_unit(&mut cfg, FreqUnit::kHz);
    assert_fs(&cfg, 1.0, 1.0, 1.0);
}

#[test]
fn test_unknown_unit_name_falls_back_to_a_unit_scale() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.select_unit_name(&mut cfg, "mhz");
    assert_eq!(cfg.freq_specs_unit(), FreqUnit::MHz);
    assert_abs_diff_eq!(cfg.f_s_scale(), 1e6);

    sel.select_unit_name(&mut cfg, "furlongs");
    assert_eq!(cfg.freq_specs_unit(), FreqUnit::Hz);
    assert_abs_diff_eq!(cfg.f_s_scale(), 1.0);
    assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FUnit); 2]);
}

#[test]
fn test_lock_then_unlock() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.toggle_lock(&mut cfg, true);
    assert_eq!(cfg.f_s_locked(), Some(1000.0));
    assert!(sel.controls().lock);

    sel.toggle_lock(&mut cfg, false);
    assert_eq!(cfg.f_s_locked(), None);
    assert!(!sel.controls().lock);
    assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FUnit); 2]);
}

#[test]
fn test_range_follows_f_max() {
    for range_type in RangeType::iter() {
        let (mut cfg, mut sel, rx) = absolute_setup();
        sel.select_range_type(&mut cfg, range_type);
        assert_eq!(cfg.freq_specs_range_type(), range_type);
        assert_eq!(cfg.freq_specs_range(), range_type.range(cfg.f_max()));
        assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FRange)]);

        sel.select_unit(&mut cfg, FreqUnit::k);
        assert_eq!(cfg.freq_specs_range(), range_type.range(2048.0));

        sel.select_unit(&mut cfg, FreqUnit::Hz);
        sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
        sel.replace_text(&mut cfg, "44100");
        sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
        assert_eq!(cfg.freq_specs_range(), range_type.range(44100.0));

        sel.recompute_range(&mut cfg, false);
        let received = changes(&rx);
        assert!(!received.contains(&Change::ViewChanged(Reason::FRange)));
    }
}

#[test]
fn test_sort_flag() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.set_sort_flag(&mut cfg, false);
    assert!(!cfg.freq_specs_sort());
    assert!(!sel.controls().sort);
    assert!(changes(&rx).is_empty());

    sel.set_sort_flag(&mut cfg, true);
    assert!(cfg.freq_specs_sort());
    assert_eq!(changes(&rx), vec![Change::SpecsChanged(Reason::FSort)]);
}

#[test]
fn test_focus_shows_full_precision() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    cfg.set_sampling_freq(48123.5);
    sel.reload_from_config(&cfg);
    assert_eq!(sel.controls().fs_text, "4.81e+04");

    let effect = sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    assert_eq!(effect, FieldEffect::ShowFullPrecision);
    assert_eq!(sel.controls().fs_text, "48123.5");

    let effect = sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    assert_eq!(effect, FieldEffect::Reformat);
    assert_eq!(sel.controls().fs_text, "4.81e+04");
    assert_abs_diff_eq!(cfg.f_s(), 48123.5);
    assert!(changes(&rx).is_empty());
}

#[test]
fn test_valid_entry_is_committed_on_focus_out() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.replace_text(&mut cfg, "48000");
    assert!(sel.field_state().is_edited());
    // Nothing is committed while typing.
    assert_abs_diff_eq!(cfg.f_s(), 1000.0);

    let effect = sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    assert_eq!(effect, FieldEffect::CommitAndReformat);
    assert_fs(&cfg, 48000.0, 48000.0, 1.0 / 48000.0);
    assert_eq!(cfg.freq_specs_range(), [0.0, 24000.0]);
    assert_eq!(sel.controls().fs_text, "4.8e+04");
    assert_eq!(sel.field_state(), FieldState::Displaying);
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FS)]);
}

#[test]
fn test_enter_commits_expressions() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.replace_text(&mut cfg, "2 * 1e3");
    let effect = sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Enter));
    assert_eq!(effect, FieldEffect::Commit);
    assert_fs(&cfg, 2000.0, 2000.0, 5e-4);
    // Still focused, text untouched, and nothing left to commit.
    assert_eq!(sel.field_state(), FieldState::Editing { edited: false });
    assert_eq!(sel.controls().fs_text, "2 * 1e3");
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FS)]);

    sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    assert_eq!(sel.controls().fs_text, "2e+03");
    assert!(changes(&rx).is_empty());
}

#[test]
fn test_enter_without_typing_commits_the_same_value() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Return));
    assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FS)]);
}

#[test]
fn test_invalid_entries_are_rejected() {
    for text in ["-5", "0", "abc", "1/0", "3 +", "(2"] {
        let (mut cfg, mut sel, rx) = absolute_setup();
        let before = cfg.clone();
        sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
        sel.replace_text(&mut cfg, text);

        sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Enter));
        assert_eq!(cfg, before, "{text}");
        assert_eq!(sel.controls().fs_text, text);

        sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
        sel.replace_text(&mut cfg, text);
        sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
        assert_eq!(cfg, before, "{text}");
        assert_eq!(sel.controls().fs_text, "1e+03");
        assert!(changes(&rx).is_empty(), "{text}");
    }
}

#[test]
fn test_blank_entry_keeps_f_s() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.replace_text(&mut cfg, "");
    assert_eq!(sel.controls().fs_text, "");
    sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
    assert_eq!(sel.controls().fs_text, "1e+03");
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FS)]);
}

#[test]
fn test_escape_reverts_the_text() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    let before = cfg.clone();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.type_text(&mut cfg, "5");
    assert_eq!(sel.controls().fs_text, "10005");

    let effect = sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Escape));
    assert_eq!(effect, FieldEffect::Revert);
    assert_eq!(sel.controls().fs_text, "1000");
    assert!(!sel.field_state().is_edited());

    // Nothing was edited since the revert, so nothing is committed.
    sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    assert_eq!(cfg, before);
    assert!(changes(&rx).is_empty());
}

#[test]
fn test_keys_without_focus_are_ignored() {
    let (mut cfg, mut sel, _rx) = absolute_setup();
    sel.type_text(&mut cfg, "123");
    let effect = sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Enter));
    assert_eq!(effect, FieldEffect::None);
    assert_eq!(sel.controls().fs_text, "1e+03");
    assert_abs_diff_eq!(cfg.f_s(), 1000.0);
}

#[test]
fn test_reload_from_config() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    cfg.set_sampling_freq(500.0);
    cfg.set_unit(FreqUnit::kHz, 1e3);
    cfg.set_axis_range(RangeType::Whole);
    cfg.lock_sampling_freq();
    cfg.set_freq_specs_sort(false);

    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.type_text(&mut cfg, "9");
    sel.reload_from_config(&cfg);

    let c = sel.controls();
    assert_eq!(c.unit, FreqUnit::kHz);
    assert_eq!(c.range_type, RangeType::Whole);
    assert!(c.lock);
    assert!(!c.sort);
    assert_eq!(c.fs_text, "500");
    assert!(c.fs_visible);
    // Typed text was discarded, so focus out doesn't commit it.
    assert_eq!(sel.field_state(), FieldState::Editing { edited: false });
    sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    assert_abs_diff_eq!(cfg.f_s(), 500.0);
    assert!(changes(&rx).is_empty());
}

#[test]
fn test_nyquist_round_trip_scenario() {
    let (mut cfg, mut sel, rx) = absolute_setup();

    sel.select_unit(&mut cfg, FreqUnit::f_Ny);
    assert_fs(&cfg, 2.0, 2.0, 1.0);

    sel.select_unit(&mut cfg, FreqUnit::Hz);
    assert_fs(&cfg, 1000.0, 1000.0, 0.001);
    assert_abs_diff_eq!(cfg.f_s_scale(), 1.0);

    sel.select_range_type(&mut cfg, RangeType::Sym);
    assert_eq!(cfg.freq_specs_range(), [-500.0, 500.0]);

    assert_eq!(
        changes(&rx),
        vec![
            Change::ViewChanged(Reason::FUnit),
            Change::ViewChanged(Reason::FUnit),
            Change::ViewChanged(Reason::FRange),
        ]
    );
}

#[test]
fn test_hidden_field_and_lock_ignore_input() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.select_unit(&mut cfg, FreqUnit::f_Ny);
    assert!(!sel.controls().fs_visible);
    changes(&rx);

    assert_eq!(
        sel.handle_field_event(&mut cfg, FieldEvent::FocusIn),
        FieldEffect::None
    );
    sel.replace_text(&mut cfg, "48000");
    assert_eq!(
        sel.handle_field_event(&mut cfg, FieldEvent::FocusOut),
        FieldEffect::None
    );
    assert!(sel.enter_fs(&mut cfg, "48000").is_ok());
    sel.toggle_lock(&mut cfg, true);

    assert_eq!(cfg.freq_specs_unit(), FreqUnit::f_Ny);
    assert_fs(&cfg, 2.0, 2.0, 1.0);
    assert_eq!(cfg.f_s_locked(), None);
    assert!(!sel.controls().lock);
    assert_eq!(sel.field_state(), FieldState::Displaying);
    assert!(changes(&rx).is_empty());
}

#[test]
fn test_selecting_a_normalized_unit_drops_typed_text() {
    let (mut cfg, mut sel, _rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.type_text(&mut cfg, "5");
    sel.select_unit(&mut cfg, FreqUnit::f_S);
    assert_eq!(sel.field_state(), FieldState::Displaying);

    sel.select_unit(&mut cfg, FreqUnit::Hz);
    assert_eq!(
        sel.handle_field_event(&mut cfg, FieldEvent::FocusOut),
        FieldEffect::Reformat
    );
    assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
}

#[test]
fn test_rejected_commits_are_reported() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    sel.replace_text(&mut cfg, "abc");
    assert_eq!(
        sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Enter)),
        FieldEffect::Rejected
    );
    sel.type_text(&mut cfg, "d");
    assert_eq!(
        sel.handle_field_event(&mut cfg, FieldEvent::FocusOut),
        FieldEffect::Rejected
    );
    assert_eq!(sel.controls().fs_text, "1e+03");

    assert!(matches!(
        sel.enter_fs(&mut cfg, "inf"),
        Err(EvalError::UnknownIdentifier(_))
    ));
    assert!(matches!(
        sel.enter_fs(&mut cfg, "-5"),
        Err(EvalError::NotPositive(_))
    ));
    assert_fs(&cfg, 1000.0, 1000.0, 1e-3);
    assert!(changes(&rx).is_empty());

    assert!(sel.enter_fs(&mut cfg, "2 * 24000").is_ok());
    assert_fs(&cfg, 48000.0, 48000.0, 1.0 / 48000.0);
    assert_eq!(sel.field_state(), FieldState::Displaying);
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FS)]);
}

#[test]
fn test_reload_while_focused_keeps_full_precision() {
    let (mut cfg, mut sel, rx) = absolute_setup();
    sel.handle_field_event(&mut cfg, FieldEvent::FocusIn);
    cfg.set_sampling_freq(48123.5);
    sel.reload_from_config(&cfg);
    assert_eq!(sel.controls().fs_text, "48123.5");

    sel.handle_field_event(&mut cfg, FieldEvent::KeyPress(Key::Enter));
    assert_abs_diff_eq!(cfg.f_s(), 48123.5);
    assert_eq!(changes(&rx), vec![Change::ViewChanged(Reason::FS)]);

    // Without focus the rounded value is shown.
    sel.handle_field_event(&mut cfg, FieldEvent::FocusOut);
    sel.reload_from_config(&cfg);
    assert_eq!(sel.controls().fs_text, "4.81e+04");
}
