use oilprops_correlations::CorrelationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop an estimation outright.
///
/// These mark input that estimation cannot proceed with at all. Records that
/// are merely incomplete or implausible are rejected through
/// [`Outcome::Rejected`](crate::Outcome::Rejected) instead.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EstimationError {
    /// No density or API gravity is available at the requested weathering.
    #[error("no density information at weathering {weathering}")]
    NoDensityInformation { weathering: f64 },

    /// No kinematic or dynamic viscosity is available.
    #[error("no viscosity information")]
    NoViscosityInformation,

    /// Parallel component tables have different lengths.
    #[error("component table length mismatch: {fractions} fractions, {densities} densities")]
    ComponentLengthMismatch { fractions: usize, densities: usize },

    /// A derived quantity is non-finite or non-physical.
    #[error("{quantity} is non-physical: {value}")]
    NonPhysical { quantity: &'static str, value: f64 },

    /// A correlation was evaluated outside its domain.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// The estimator configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
