//! Ordinary least squares: yield against rainfall, temperature, and
//! pesticide use.
//!
//! The fit runs on complete cases only (rows where all three covariates
//! are present) with an intercept column, solved through an SVD
//! least-squares decomposition.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use yieldscope_types::Observation;

use crate::error::StatsError;

/// Design-matrix width: intercept plus three covariates.
const PREDICTORS: usize = 4;

/// Minimum complete rows for a meaningful fit, one per coefficient.
const MIN_COMPLETE_ROWS: usize = PREDICTORS;

/// Numerical cutoff below which singular values are treated as zero.
const SVD_EPSILON: f64 = 1.0e-12;

/// Fitted coefficients and goodness of fit for the yield regression.
///
/// Values are stored unrounded; display layers format them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Intercept term.
    pub intercept: f64,
    /// Coefficient on `rainfall_mm`.
    pub rainfall_coef: f64,
    /// Coefficient on `avg_temp_c`.
    pub temperature_coef: f64,
    /// Coefficient on `pesticide_t`.
    pub pesticide_coef: f64,
    /// Complete cases used in the fit.
    pub observations: u64,
}

/// Fits the regression over the complete cases in `rows`.
///
/// # Errors
///
/// Returns [`StatsError::InsufficientData`] with fewer complete rows than
/// coefficients, [`StatsError::Singular`] when the solve fails, and
/// [`StatsError::ZeroVariance`] when the yield column is constant.
pub fn fit(rows: &[&Observation]) -> Result<RegressionSummary, StatsError> {
    let mut design: Vec<f64> = Vec::new();
    let mut targets: Vec<f64> = Vec::new();
    for obs in rows {
        let (Some(rain), Some(temp), Some(pest)) =
            (obs.rainfall_mm, obs.avg_temp_c, obs.pesticide_t)
        else {
            continue;
        };
        design.extend_from_slice(&[1.0, rain, temp, pest]);
        targets.push(obs.yield_t_ha);
    }

    let n = targets.len();
    if n < MIN_COMPLETE_ROWS {
        return Err(StatsError::InsufficientData {
            needed: MIN_COMPLETE_ROWS,
            got: n,
        });
    }

    let x = DMatrix::from_row_slice(n, PREDICTORS, &design);
    let y = DVector::from_vec(targets);

    let beta = x
        .clone()
        .svd(true, true)
        .solve(&y, SVD_EPSILON)
        .map_err(|msg: &str| StatsError::Singular(msg.to_owned()))?;
    let &[intercept, rainfall_coef, temperature_coef, pesticide_coef] = beta.as_slice() else {
        return Err(StatsError::Singular("unexpected coefficient count".to_owned()));
    };

    let mean_y = y.mean();
    let fitted = x * &beta;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (observed, predicted) in y.iter().zip(fitted.iter()) {
        let res = observed - predicted;
        let dev = observed - mean_y;
        ss_res = res.mul_add(res, ss_res);
        ss_tot = dev.mul_add(dev, ss_tot);
    }
    if ss_tot <= 0.0 {
        return Err(StatsError::ZeroVariance);
    }

    Ok(RegressionSummary {
        r_squared: 1.0 - ss_res / ss_tot,
        intercept,
        rainfall_coef,
        temperature_coef,
        pesticide_coef,
        observations: u64::try_from(n).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn obs(yield_t_ha: f64, covariates: Option<(f64, f64, f64)>) -> Observation {
        let (rain, temp, pest) = covariates.map_or((None, None, None), |(r, t, p)| {
            (Some(r), Some(t), Some(p))
        });
        Observation {
            crop: "Wheat".to_owned(),
            region: "France".to_owned(),
            year: 1990,
            yield_t_ha,
            yield_hg_ha: None,
            rainfall_mm: rain,
            avg_temp_c: temp,
            pesticide_t: pest,
        }
    }

    fn linear(rain: f64, temp: f64, pest: f64) -> Observation {
        // yield = 1 + 2*rain + 3*temp + 4*pest, exactly.
        let y = 4.0_f64.mul_add(pest, 3.0_f64.mul_add(temp, 2.0_f64.mul_add(rain, 1.0)));
        obs(y, Some((rain, temp, pest)))
    }

    #[test]
    fn recovers_exact_linear_coefficients() {
        let rows = [
            linear(1.0, 0.0, 0.0),
            linear(0.0, 1.0, 0.0),
            linear(0.0, 0.0, 1.0),
            linear(1.0, 1.0, 1.0),
            linear(2.0, 1.0, 0.0),
        ];
        let refs: Vec<&Observation> = rows.iter().collect();
        let summary = fit(&refs).unwrap();

        assert_eq!(summary.observations, 5);
        assert_relative_eq!(summary.intercept, 1.0, max_relative = 1e-8);
        assert_relative_eq!(summary.rainfall_coef, 2.0, max_relative = 1e-8);
        assert_relative_eq!(summary.temperature_coef, 3.0, max_relative = 1e-8);
        assert_relative_eq!(summary.pesticide_coef, 4.0, max_relative = 1e-8);
        assert_relative_eq!(summary.r_squared, 1.0, max_relative = 1e-8);
    }

    #[test]
    fn incomplete_rows_are_excluded() {
        let rows = [
            linear(1.0, 0.0, 0.0),
            linear(0.0, 1.0, 0.0),
            linear(0.0, 0.0, 1.0),
            linear(1.0, 1.0, 1.0),
            linear(2.0, 1.0, 0.0),
            obs(9.9, None),
        ];
        let refs: Vec<&Observation> = rows.iter().collect();
        let summary = fit(&refs).unwrap();
        assert_eq!(summary.observations, 5);
    }

    #[test]
    fn too_few_complete_rows_is_an_error() {
        let rows = [
            linear(1.0, 0.0, 0.0),
            linear(0.0, 1.0, 0.0),
            obs(9.9, None),
        ];
        let refs: Vec<&Observation> = rows.iter().collect();
        let err = fit(&refs).unwrap_err();
        assert!(matches!(
            err,
            StatsError::InsufficientData { needed: 4, got: 2 }
        ));
    }

    #[test]
    fn constant_yield_is_rejected() {
        let rows = [
            obs(7.0, Some((1.0, 0.0, 0.0))),
            obs(7.0, Some((0.0, 1.0, 0.0))),
            obs(7.0, Some((0.0, 0.0, 1.0))),
            obs(7.0, Some((1.0, 1.0, 1.0))),
            obs(7.0, Some((2.0, 1.0, 0.0))),
        ];
        let refs: Vec<&Observation> = rows.iter().collect();
        let err = fit(&refs).unwrap_err();
        assert!(matches!(err, StatsError::ZeroVariance));
    }
}
