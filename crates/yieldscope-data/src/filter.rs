//! Observation filters shared by charts, summary cards, and export.
//!
//! A [`FilterSpec`] composes three independent predicates: a region
//! allow-list, a crop allow-list, and an inclusive year range. Empty lists
//! and unset bounds match everything, so the default spec passes every row.

use yieldscope_types::Observation;

/// A composable observation filter.
///
/// All fields are optional; the zero value matches the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    /// Regions to keep; empty keeps all regions.
    pub regions: Vec<String>,
    /// Crops to keep; empty keeps all crops.
    pub crops: Vec<String>,
    /// Inclusive lower year bound.
    pub year_start: Option<i32>,
    /// Inclusive upper year bound.
    pub year_end: Option<i32>,
}

impl FilterSpec {
    /// Returns `true` when the observation passes every active predicate.
    #[must_use]
    pub fn matches(&self, obs: &Observation) -> bool {
        if !self.regions.is_empty() && !self.regions.iter().any(|r| *r == obs.region) {
            return false;
        }
        if !self.crops.is_empty() && !self.crops.iter().any(|c| *c == obs.crop) {
            return false;
        }
        if self.year_start.is_some_and(|start| obs.year < start) {
            return false;
        }
        if self.year_end.is_some_and(|end| obs.year > end) {
            return false;
        }
        true
    }

    /// Returns `true` when no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.crops.is_empty()
            && self.year_start.is_none()
            && self.year_end.is_none()
    }
}
