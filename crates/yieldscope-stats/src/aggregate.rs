//! Group means, the yearly trend series, and summary cards.
//!
//! All functions take a filtered view (`&[&Observation]`) so the same code
//! serves both the startup analysis over the whole table and per-request
//! summaries under active filters.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use yieldscope_types::{Observation, SummaryCards};

use crate::support::{count_f64, mean, round_to};

/// Mean yield for one group key (a crop or a region).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    /// Group key.
    pub key: String,
    /// Mean `yield_t_ha` over the group.
    pub mean_yield: f64,
}

/// Mean yield for one year, with the percent change from the prior year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyYield {
    /// Observation year.
    pub year: i32,
    /// Mean `yield_t_ha` over the year.
    pub mean_yield: f64,
    /// Percent change from the previous year; `None` for the first year
    /// and for non-finite ratios.
    pub pct_change: Option<f64>,
}

/// Mean yield per crop, sorted descending by mean.
///
/// Ties keep ascending key order, so the alphabetically first group wins.
#[must_use]
pub fn mean_yield_by_crop(rows: &[&Observation]) -> Vec<GroupMean> {
    group_mean(rows, |obs| &obs.crop)
}

/// Mean yield per region, sorted descending by mean.
#[must_use]
pub fn mean_yield_by_region(rows: &[&Observation]) -> Vec<GroupMean> {
    group_mean(rows, |obs| &obs.region)
}

/// Mean yield per year in ascending year order, each entry carrying the
/// percent change from the previous year (fraction rounded to four
/// decimals, then scaled to percent).
#[must_use]
pub fn yearly_mean_yield(rows: &[&Observation]) -> Vec<YearlyYield> {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for obs in rows {
        let entry = groups.entry(obs.year).or_insert((0.0, 0));
        entry.0 += obs.yield_t_ha;
        entry.1 = entry.1.saturating_add(1);
    }

    let mut series = Vec::with_capacity(groups.len());
    let mut prev: Option<f64> = None;
    for (year, (sum, n)) in groups {
        let mean_yield = sum / count_f64(n);
        let pct_change = prev
            .map(|p| round_to(mean_yield / p - 1.0, 4) * 100.0)
            .filter(|pct| pct.is_finite());
        series.push(YearlyYield {
            year,
            mean_yield,
            pct_change,
        });
        prev = Some(mean_yield);
    }
    series
}

/// Summary cards under the active filters: mean yield rounded to two
/// decimals, the crop with the highest mean yield, and the year of the
/// wettest observation. Every card is `None` when it has no data.
#[must_use]
pub fn summary_cards(rows: &[&Observation]) -> SummaryCards {
    let yields: Vec<f64> = rows.iter().map(|obs| obs.yield_t_ha).collect();
    let average_yield = mean(&yields).map(|m| round_to(m, 2));

    let top_crop = mean_yield_by_crop(rows)
        .into_iter()
        .next()
        .map(|group| group.key);

    // First occurrence wins on ties, hence the strict comparison.
    let mut wettest: Option<(i32, f64)> = None;
    for obs in rows {
        if let Some(rain) = obs.rainfall_mm {
            if wettest.is_none_or(|(_, best)| rain > best) {
                wettest = Some((obs.year, rain));
            }
        }
    }

    SummaryCards {
        average_yield,
        top_crop,
        wettest_year: wettest.map(|(year, _)| year),
    }
}

fn group_mean<'a, F>(rows: &[&'a Observation], key: F) -> Vec<GroupMean>
where
    F: Fn(&'a Observation) -> &'a str,
{
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for obs in rows {
        let entry = groups.entry(key(obs)).or_insert((0.0, 0));
        entry.0 += obs.yield_t_ha;
        entry.1 = entry.1.saturating_add(1);
    }

    let mut means: Vec<GroupMean> = groups
        .into_iter()
        .map(|(key, (sum, n))| GroupMean {
            key: key.to_owned(),
            mean_yield: sum / count_f64(n),
        })
        .collect();
    // Stable sort preserves ascending key order among equal means.
    means.sort_by(|a, b| {
        b.mean_yield
            .partial_cmp(&a.mean_yield)
            .unwrap_or(Ordering::Equal)
    });
    means
}
