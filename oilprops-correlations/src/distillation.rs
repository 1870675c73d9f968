//! Distillation cut correlations and the clamped linear cut model.
//!
//! Measured cuts are summarized by a least-squares line through
//! `(temperature, cumulative fraction)` points. Inverting that line gives the
//! boiling point of any evaporated fraction, but the inverse grows without
//! bound as the fraction approaches one. A generalized logistic (Richards)
//! curve clamps the fraction smoothly at the value the line reaches at the
//! boundary temperature, so no inverted temperature exceeds it by much.

use serde::{Deserialize, Serialize};

use crate::CorrelationError;

/// Constants for synthesizing and normalizing distillation cuts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistillationCorrelations {
    /// Number of cuts synthesized from API gravity when none are measured.
    pub synthetic_cut_count: usize,

    /// Intercept of the initial boiling point, `T0 = a − b·API`, in K.
    pub initial_bp_intercept: f64,

    /// API slope of the initial boiling point, in K.
    pub initial_bp_slope: f64,

    /// Intercept of the boiling point gradient, `T_G = a − b·ln(API)`, in K.
    pub bp_gradient_intercept: f64,

    /// Log-API slope of the boiling point gradient, in K.
    pub bp_gradient_slope: f64,

    /// Temperature at which the cut model is clamped, in K.
    ///
    /// Sits just below the 739 K asymptote of the boiling point distribution.
    pub boundary_temp_k: f64,

    /// Steepness of the logistic clamp.
    pub clamp_steepness: f64,

    /// Skew parameter `ζ` of the logistic clamp, in `(0, 1)`.
    pub clamp_zeta: f64,
}

impl Default for DistillationCorrelations {
    fn default() -> Self {
        Self {
            synthetic_cut_count: 5,
            initial_bp_intercept: 457.0,
            initial_bp_slope: 3.34,
            bp_gradient_intercept: 1357.0,
            bp_gradient_slope: 247.7,
            boundary_temp_k: 732.0,
            clamp_steepness: 15.0,
            clamp_zeta: 0.12,
        }
    }
}

impl DistillationCorrelations {
    /// Synthesizes evenly spaced cut temperatures from API gravity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API gravity is not positive.
    pub fn cut_temps_from_api(&self, api: f64) -> Result<Vec<f64>, CorrelationError> {
        if api <= 0.0 || !api.is_finite() {
            return Err(CorrelationError::out_of_domain(
                "cut_temps_from_api",
                "API gravity",
                api,
            ));
        }

        let n = self.synthetic_cut_count;
        let t_0 = self.initial_bp_intercept - self.initial_bp_slope * api;
        let t_g = self.bp_gradient_intercept - self.bp_gradient_slope * api.ln();

        #[allow(clippy::cast_precision_loss)]
        let temps = (0..n)
            .map(|i| t_0 + t_g * (i as f64 + 0.5) / n as f64)
            .collect();

        Ok(temps)
    }

    /// Splits the distillable mass evenly among the synthesized cuts.
    #[must_use]
    pub fn fmasses_flat_dist(&self, f_res: f64, f_asph: f64) -> Vec<f64> {
        let n = self.synthetic_cut_count;

        #[allow(clippy::cast_precision_loss)]
        let fmass = (1.0 - f_res - f_asph) / n as f64;

        vec![fmass; n]
    }

    /// Builds the clamped inverse of a fitted cut line.
    #[must_use]
    pub fn clamped_inverse(&self, fit: LinearFit) -> ClampedInverse {
        ClampedInverse {
            fit,
            cutoff: fit.eval(self.boundary_temp_k),
            zeta: self.clamp_zeta,
            steepness: self.clamp_steepness,
        }
    }
}

/// Converts cumulative evaporated fractions into per-cut mass fractions.
///
/// The first cut keeps its cumulative value; later cuts take the difference
/// from their predecessor.
#[must_use]
pub fn fmasses_from_cuts(f_evap: &[f64]) -> Vec<f64> {
    let mut previous = 0.0;

    f_evap
        .iter()
        .enumerate()
        .map(|(i, &f)| {
            let fmass = if i == 0 { f } else { f - previous };
            previous = f;
            fmass
        })
        .collect()
}

/// Linearly clamps `x` at `m` using a generalized logistic curve.
///
/// Below `m` the result follows `x`; above it the result levels off at `m`,
/// with `zeta` skewing the transition and `steepness` setting its width.
#[must_use]
pub fn logistic_clamp(x: f64, m: f64, zeta: f64, steepness: f64) -> f64 {
    let s = 1.0 + (-steepness * (x - m)).exp();

    x - x / s.powf(1.0 / (1.0 + zeta)) + m / s.powf(1.0 / (1.0 - zeta))
}

/// A least-squares line `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fits a line through the given points by ordinary least squares.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two points are given, the lengths of
    /// `x` and `y` differ, every `x` is identical, or the fitted slope is zero
    /// or non-finite (the line could not be inverted).
    pub fn least_squares(x: &[f64], y: &[f64]) -> Result<Self, CorrelationError> {
        if x.len() != y.len() {
            return Err(CorrelationError::DegenerateFit {
                points: x.len().min(y.len()),
                reason: "x and y lengths differ",
            });
        }

        let points = x.len();
        if points < 2 {
            return Err(CorrelationError::DegenerateFit {
                points,
                reason: "at least two points are required",
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let n = points as f64;
        let x_mean = x.iter().sum::<f64>() / n;
        let y_mean = y.iter().sum::<f64>() / n;

        let (sxy, sxx) = x
            .iter()
            .zip(y)
            .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
                let dx = xi - x_mean;
                (sxy + dx * (yi - y_mean), sxx + dx * dx)
            });

        if sxx <= 0.0 {
            return Err(CorrelationError::DegenerateFit {
                points,
                reason: "all x values are identical",
            });
        }

        let slope = sxy / sxx;
        if slope == 0.0 || !slope.is_finite() {
            return Err(CorrelationError::DegenerateFit {
                points,
                reason: "slope is zero or non-finite",
            });
        }

        Ok(Self {
            slope,
            intercept: y_mean - slope * x_mean,
        })
    }

    /// Evaluates the line at `x`.
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Inverse of a cut line with the fraction clamped at the boundary temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedInverse {
    pub fit: LinearFit,

    /// Fraction reached by the line at the boundary temperature.
    pub cutoff: f64,

    pub zeta: f64,
    pub steepness: f64,
}

impl ClampedInverse {
    /// Returns the boiling point at which `fraction` has evaporated.
    #[must_use]
    pub fn temperature_at(&self, fraction: f64) -> f64 {
        let clamped = logistic_clamp(fraction, self.cutoff, self.zeta, self.steepness);

        (clamped - self.fit.intercept) / self.fit.slope
    }
}
