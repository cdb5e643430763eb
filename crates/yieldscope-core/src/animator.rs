//! The timeline animator: cyclic year advancement over a crop's years.
//!
//! The animator is a pure function of the crop's year sequence and the
//! stored year. Each tick (or crop change) advances to the next year in
//! ascending order, wrapping back to the first after the last.
//!
//! # Design Principles
//!
//! - The year sequence is derived from the dataset on every transition --
//!   never cached, so it cannot drift from the data.
//! - A stored year that is not in the sequence (a stale reference after a
//!   crop switch) restarts the cycle at the first year.
//! - An empty sequence produces no update at all; "no data" is a normal
//!   outcome, not an error.

/// Computes the next year in the cyclic timeline.
///
/// Returns `None` when `years` is empty. When the stored year is absent
/// from the sequence, the cycle restarts at the first entry.
#[must_use]
pub fn next_year(years: &[i32], stored: Option<i32>) -> Option<i32> {
    if years.is_empty() {
        return None;
    }
    let next_index = stored
        .and_then(|year| years.iter().position(|y| *y == year))
        .map_or(0, |index| {
            // Wrap is safe: the sequence is non-empty here.
            index.saturating_add(1).checked_rem(years.len()).unwrap_or(0)
        });
    years.get(next_index).copied()
}
