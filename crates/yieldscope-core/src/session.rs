//! Timeline sessions and the single command handler.
//!
//! A session owns one animation state: the selected crop, the displayed
//! year, and the play/pause click counter. Every UI event arrives as a
//! [`DashCommand`] and flows through [`TimelineSession::apply`], the only
//! write path into a session.

use chrono::{DateTime, Utc};
use tracing::debug;
use yieldscope_data::Dataset;
use yieldscope_types::{AnimationState, CommandOutcome, DashCommand, SessionId};

use crate::animator;
use crate::playback;

/// One timeline dashboard session.
#[derive(Debug, Clone)]
pub struct TimelineSession {
    id: SessionId,
    selected_crop: String,
    current_year: i32,
    clicks: u64,
    created_at: DateTime<Utc>,
}

impl TimelineSession {
    /// Creates a session for the dataset.
    ///
    /// The displayed year starts at the dataset-wide minimum year, matching
    /// the slider's initial position. When no crop is given, the first crop
    /// in sorted order is selected.
    #[must_use]
    pub fn new(dataset: &Dataset, selected_crop: Option<String>) -> Self {
        let selected_crop = selected_crop.unwrap_or_else(|| {
            dataset.crops().first().cloned().unwrap_or_default()
        });
        Self {
            id: SessionId::new(),
            selected_crop,
            current_year: dataset.year_min(),
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The currently selected crop.
    #[must_use]
    pub fn selected_crop(&self) -> &str {
        &self.selected_crop
    }

    /// The currently displayed year.
    #[must_use]
    pub const fn current_year(&self) -> i32 {
        self.current_year
    }

    /// When the session was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the interval ticker is currently disabled.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        playback::is_paused(self.clicks)
    }

    /// Snapshot of the animation state for the wire.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        AnimationState {
            selected_crop: self.selected_crop.clone(),
            current_year: self.current_year,
            clicks: self.clicks,
        }
    }

    /// Applies one command and returns its outcome.
    ///
    /// Ticks and crop changes run the animator transition; a manual slider
    /// move stores the year verbatim (a stale value recovers on the next
    /// transition); a playback press only flips parity and never touches
    /// the displayed year.
    pub fn apply(&mut self, command: DashCommand, dataset: &Dataset) -> CommandOutcome {
        match command {
            DashCommand::Tick => self.advance(dataset),
            DashCommand::SelectCrop { crop } => {
                debug!(session = %self.id, %crop, "crop selected");
                self.selected_crop = crop;
                self.advance(dataset)
            }
            DashCommand::SetYear { year } => {
                self.current_year = year;
                CommandOutcome::YearSet { year }
            }
            DashCommand::TogglePlayback => {
                self.clicks = self.clicks.saturating_add(1);
                CommandOutcome::Playback {
                    ticker_disabled: playback::is_paused(self.clicks),
                    label: playback::button_label(self.clicks).to_owned(),
                }
            }
        }
    }

    fn advance(&mut self, dataset: &Dataset) -> CommandOutcome {
        let years = dataset.year_sequence(&self.selected_crop);
        animator::next_year(&years, Some(self.current_year)).map_or(CommandOutcome::NoData, |year| {
            self.current_year = year;
            CommandOutcome::Advanced { year }
        })
    }
}
