//! Typed timeline commands and their outcomes.
//!
//! Every UI event on the timeline dashboard -- an interval tick, a crop
//! selection, a manual slider move, a play/pause press -- is posted to the
//! server as exactly one [`DashCommand`] and answered with exactly one
//! [`CommandOutcome`]. There is no other write path into a session.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// DashCommand
// ---------------------------------------------------------------------------

/// A command applied to one timeline session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DashCommand {
    /// One interval-timer firing: advance to the next year in the selected
    /// crop's sequence, wrapping at the end.
    Tick,
    /// Change the selected crop, then advance so the displayed year
    /// re-enters the new crop's sequence immediately.
    SelectCrop {
        /// The newly selected crop.
        crop: String,
    },
    /// Manual slider move: store the year exactly as given.
    SetYear {
        /// The year to display.
        year: i32,
    },
    /// One press of the play/pause button.
    TogglePlayback,
}

// ---------------------------------------------------------------------------
// CommandOutcome
// ---------------------------------------------------------------------------

/// The result of applying a [`DashCommand`] to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CommandOutcome {
    /// The displayed year advanced (tick or crop change).
    Advanced {
        /// The new displayed year.
        year: i32,
    },
    /// The selected crop has no observations: nothing changed.
    ///
    /// This is a quiet no-op, not an error.
    NoData,
    /// A manual slider move was stored.
    YearSet {
        /// The stored year.
        year: i32,
    },
    /// The play/pause button was pressed.
    Playback {
        /// Whether the client interval timer should now be disabled.
        ticker_disabled: bool,
        /// The new button label (`"Play Timeline"` or `"Pause Timeline"`).
        label: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_commands_serialize_as_bare_strings() {
        assert_eq!(
            serde_json::to_string(&DashCommand::Tick).ok(),
            Some(String::from("\"tick\""))
        );
        assert_eq!(
            serde_json::to_string(&DashCommand::TogglePlayback).ok(),
            Some(String::from("\"toggle_playback\""))
        );
    }

    #[test]
    fn struct_commands_are_externally_tagged() {
        let cmd = DashCommand::SelectCrop {
            crop: String::from("Sorghum"),
        };
        let json = serde_json::to_value(&cmd).unwrap_or_default();
        let crop = json
            .get("select_crop")
            .and_then(|inner| inner.get("crop"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(crop, Some("Sorghum"));
    }

    #[test]
    fn outcome_roundtrip() {
        let outcome = CommandOutcome::Playback {
            ticker_disabled: true,
            label: String::from("Play Timeline"),
        };
        let json = serde_json::to_value(&outcome).ok();
        let back: Option<CommandOutcome> = json.and_then(|v| serde_json::from_value(v).ok());
        assert_eq!(back, Some(outcome));
    }
}
