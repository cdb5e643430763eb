//! Pairwise Pearson correlation over the numeric columns.
//!
//! Mirrors a dataframe `corr()` call: every numeric column (the year plus
//! the five metric columns) correlates against every other using only the
//! rows where both sides are present. Columns with no values at all are
//! dropped from the matrix. Undefined cells (fewer than two shared rows,
//! or zero variance) are `None` and serialize as `null`.

use serde::{Deserialize, Serialize};
use yieldscope_types::{Metric, Observation};

use crate::support::{pearson, round_to};

/// Pairwise correlation matrix, values rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column names, in dataset column order.
    pub columns: Vec<String>,
    /// Row-major cells; `values[i][j]` correlates `columns[i]` with
    /// `columns[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Cell lookup by column name pair.
    #[must_use]
    pub fn cell(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        self.values.get(i)?.get(j).copied()?
    }
}

/// Computes the correlation matrix over the observation rows.
#[must_use]
pub fn correlation_matrix(rows: &[&Observation]) -> CorrelationMatrix {
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();
    columns.push((
        "year".to_owned(),
        rows.iter().map(|obs| Some(f64::from(obs.year))).collect(),
    ));
    for metric in Metric::ALL {
        columns.push((
            metric.as_str().to_owned(),
            rows.iter().map(|obs| metric.value_of(obs)).collect(),
        ));
    }
    // A column absent from the source file has no values anywhere.
    columns.retain(|(_, values)| values.iter().any(Option::is_some));

    let names: Vec<String> = columns.iter().map(|(name, _)| name.clone()).collect();
    let mut values = Vec::with_capacity(columns.len());
    for (_, left) in &columns {
        let mut row = Vec::with_capacity(columns.len());
        for (_, right) in &columns {
            row.push(pairwise(left, right).map(|r| round_to(r, 2)));
        }
        values.push(row);
    }

    CorrelationMatrix {
        columns: names,
        values,
    }
}

/// Pearson over the rows where both columns have a value.
fn pairwise(left: &[Option<f64>], right: &[Option<f64>]) -> Option<f64> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (x, y) in left.iter().zip(right) {
        if let (Some(x), Some(y)) = (x, y) {
            xs.push(*x);
            ys.push(*y);
        }
    }
    pearson(&xs, &ys)
}
