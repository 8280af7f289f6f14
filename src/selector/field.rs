// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The editing protocol of the sampling-frequency text field.
//!
//! While the field isn't focused it shows the sampling frequency in the
//! configured (rounded) format. Gaining focus shows the full-precision value
//! so that nothing is lost by editing. Typed text is only committed when
//! Enter/Return is pressed, or when focus is lost after something was typed.
//!
//! The transitions are pure; [`FieldState::on`] says what has to happen, and
//! the selector does it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Not focused; the rounded value is shown.
    #[default]
    Displaying,

    /// Focused. `edited` is true once a key has been typed since the last
    /// commit or revert.
    Editing { edited: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Return,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    FocusIn,
    KeyPress(Key),
    FocusOut,
}

/// What has to be done in response to a field event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEffect {
    None,

    /// Show the full-precision sampling frequency.
    ShowFullPrecision,

    /// Apply a key to the text.
    EditText(Key),

    /// Evaluate the text and store it as the sampling frequency.
    Commit,

    /// Throw the typed text away and show the full-precision value again.
    Revert,

    /// Show the rounded sampling frequency.
    Reformat,

    /// Commit, then show the rounded sampling frequency.
    CommitAndReformat,

    /// A commit was attempted but the text isn't a valid sampling frequency;
    /// nothing changed. Only reported by the selector, never by
    /// [`FieldState::on`].
    Rejected,
}

impl FieldState {
    pub fn is_editing(self) -> bool {
        matches!(self, FieldState::Editing { .. })
    }

    pub fn is_edited(self) -> bool {
        matches!(self, FieldState::Editing { edited: true })
    }

    /// The transition table.
    pub fn on(self, event: FieldEvent) -> (FieldState, FieldEffect) {
        use FieldEffect as E;
        use FieldState::*;

        match (self, event) {
            (_, FieldEvent::FocusIn) => (Editing { edited: false }, E::ShowFullPrecision),

            // Keys only reach a focused field.
            (Displaying, FieldEvent::KeyPress(_)) => (Displaying, E::None),
            (Editing { .. }, FieldEvent::KeyPress(Key::Enter | Key::Return)) => {
                (Editing { edited: false }, E::Commit)
            }
            (Editing { .. }, FieldEvent::KeyPress(Key::Escape)) => {
                (Editing { edited: false }, E::Revert)
            }
            (Editing { .. }, FieldEvent::KeyPress(key)) => (Editing { edited: true }, E::EditText(key)),

            (Editing { edited: true }, FieldEvent::FocusOut) => (Displaying, E::CommitAndReformat),
            (Editing { edited: false } | Displaying, FieldEvent::FocusOut) => {
                (Displaying, E::Reformat)
            }
        }
    }
}

/// Apply a key to the field text.
pub(super) fn edit_text(text: &mut String, key: Key) {
    match key {
        Key::Char(c) => text.push(c),
        Key::Backspace => {
            text.pop();
        }
        Key::Enter | Key::Return | Key::Escape | Key::Other => (),
    }
}
