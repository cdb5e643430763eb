//! The play/pause toggle: a pure parity function of the click counter.
//!
//! The toggle button's click counter is monotonic and never reset. An even
//! count (including zero, the initial state) means the timeline is playing
//! and the interval ticker is enabled; an odd count means paused. The
//! label always names the action a click would take next.

/// Button label shown while paused.
pub const PLAY_LABEL: &str = "Play Timeline";

/// Button label shown while playing.
pub const PAUSE_LABEL: &str = "Pause Timeline";

/// Whether the timeline is paused after `clicks` toggle presses.
///
/// Even counts (including zero) are playing; odd counts are paused.
#[must_use]
pub const fn is_paused(clicks: u64) -> bool {
    clicks % 2 != 0
}

/// The toggle button label for a click count.
#[must_use]
pub const fn button_label(clicks: u64) -> &'static str {
    if is_paused(clicks) { PLAY_LABEL } else { PAUSE_LABEL }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_clicks_is_playing() {
        assert!(!is_paused(0));
        assert_eq!(button_label(0), PAUSE_LABEL);
    }

    #[test]
    fn parity_alternates_with_each_click() {
        for clicks in 0..10 {
            assert_eq!(is_paused(clicks), clicks % 2 != 0);
        }
    }

    #[test]
    fn label_names_the_next_action() {
        // Paused: the button offers to play.
        assert_eq!(button_label(1), PLAY_LABEL);
        // Playing: the button offers to pause.
        assert_eq!(button_label(2), PAUSE_LABEL);
    }
}
