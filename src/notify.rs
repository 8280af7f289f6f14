// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Notifications sent to other components when the filter configuration has
//! been changed.
//!
//! Listeners subscribe to a [`Notifier`] and receive [`Notification`]s over a
//! channel. A notification only says *what kind* of thing changed; listeners
//! re-read the [`FilterConfig`](crate::FilterConfig) to refresh themselves.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, IntoStaticStr};

/// What was changed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize, Deserialize,
)]
pub enum Reason {
    /// The frequency unit (or the sampling-frequency lock).
    #[strum(serialize = "f_unit")]
    #[serde(rename = "f_unit")]
    FUnit,

    /// The frequency-axis range.
    #[strum(serialize = "f_range")]
    #[serde(rename = "f_range")]
    FRange,

    /// The sampling frequency.
    #[strum(serialize = "f_S")]
    #[serde(rename = "f_S")]
    FS,

    /// Sorting of frequency specifications.
    #[strum(serialize = "f_sort")]
    #[serde(rename = "f_sort")]
    FSort,
}

/// Whether the change affects only how things are shown, or the filter
/// specifications themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    ViewChanged(Reason),
    SpecsChanged(Reason),
}

impl Change {
    pub fn reason(self) -> Reason {
        match self {
            Change::ViewChanged(r) | Change::SpecsChanged(r) => r,
        }
    }
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::ViewChanged(r) => write!(f, "view_changed:{r}"),
            Change::SpecsChanged(r) => write!(f, "specs_changed:{r}"),
        }
    }
}

/// A change notification, e.g. `{"sender": "freq_units", "view_changed":
/// "f_unit"}` when serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub sender: String,
    #[serde(flatten)]
    pub change: Change,
}

/// Sends notifications to every subscriber. Subscribers that have gone away
/// are forgotten on the next emission.
#[derive(Debug)]
pub struct Notifier {
    sender: &'static str,
    subscribers: Vec<Sender<Notification>>,
}

impl Notifier {
    pub fn new(sender: &'static str) -> Notifier {
        Notifier {
            sender,
            subscribers: vec![],
        }
    }

    pub fn subscribe(&mut self) -> Receiver<Notification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn num_subscribers(&self) -> usize {
        self.subscribers.len()
    }

    pub fn emit(&mut self, change: Change) {
        trace!("{}: emitting {change}", self.sender);
        let notification = Notification {
            sender: self.sender.to_string(),
            change,
        };
        self.subscribers
            .retain(|tx| tx.send(notification.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_subscribers_receive_notifications() {
        let mut notifier = Notifier::new("test");
        let rx1 = notifier.subscribe();
        let rx2 = notifier.subscribe();
        notifier.emit(Change::ViewChanged(Reason::FUnit));
        notifier.emit(Change::SpecsChanged(Reason::FSort));

        for rx in [rx1, rx2] {
            let received: Vec<Notification> = rx.try_iter().collect();
            assert_eq!(received.len(), 2);
            assert_eq!(received[0].sender, "test");
            assert_eq!(received[0].change, Change::ViewChanged(Reason::FUnit));
            assert_eq!(received[1].change.reason(), Reason::FSort);
        }
    }

    #[test]
    fn test_disconnected_subscribers_are_dropped() {
        let mut notifier = Notifier::new("test");
        let rx = notifier.subscribe();
        drop(notifier.subscribe());
        assert_eq!(notifier.num_subscribers(), 2);
        notifier.emit(Change::ViewChanged(Reason::FS));
        assert_eq!(notifier.num_subscribers(), 1);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_wire_format() {
        let n = Notification {
            sender: "freq_units".to_string(),
            change: Change::ViewChanged(Reason::FRange),
        };
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, r#"{"sender":"freq_units","view_changed":"f_range"}"#);
        assert_eq!(Change::SpecsChanged(Reason::FSort).to_string(), "specs_changed:f_sort");
        assert_eq!(Change::ViewChanged(Reason::FS).to_string(), "view_changed:f_S");
    }
}
