use oilprops_correlations::{CorrelationError, CorrelationSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from an invalid estimator configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("malformed configuration: {0}")]
    Json(String),

    #[error(transparent)]
    Correlations(#[from] CorrelationError),
}

/// Configuration for estimating an oil record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Correlation constants.
    pub correlations: CorrelationSet,

    /// Number of normalized distillation cuts.
    pub cut_count: usize,

    /// Fixed number of saturate/aromatic split refinements.
    pub mass_fraction_iterations: usize,

    /// Plausibility checks applied to a finished record.
    pub validation: ValidationConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            correlations: CorrelationSet::default(),
            cut_count: 10,
            mass_fraction_iterations: 20,
            validation: ValidationConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Reads a configuration from JSON, with missing keys taking defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the configuration is invalid.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any setting or correlation constant is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.correlations.validate()?;

        if self.cut_count == 0 {
            return Err(ConfigError::Invalid("cut_count must be positive"));
        }
        if self.mass_fraction_iterations == 0 {
            return Err(ConfigError::Invalid("mass_fraction_iterations must be positive"));
        }

        self.validation.validate()
    }
}

/// Thresholds for the plausibility checks on a finished record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Relative tolerance between the API gravity and the API implied by density.
    pub api_rtol: f64,

    /// Absolute tolerance between the API gravity and the API implied by density.
    pub api_atol: f64,

    /// Saturate and aromatic densities may not exceed the larger of this and
    /// the resin density, in kg/m³.
    pub sa_density_floor: f64,

    /// Relative tolerance on the component mass fractions summing to one.
    pub mass_fraction_rtol: f64,

    /// Record identifiers rejected regardless of their data.
    pub rejected_ids: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            api_rtol: 0.05,
            api_atol: 1e-8,
            sa_density_floor: 1100.0,
            mass_fraction_rtol: 1e-6,
            rejected_ids: Vec::new(),
        }
    }
}

impl ValidationConfig {
    /// Validates that all tolerances are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns an error if any tolerance is negative or non-finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_rtol.is_finite() || self.api_rtol < 0.0 {
            return Err(ConfigError::Invalid("api_rtol must be finite and non-negative"));
        }
        if !self.api_atol.is_finite() || self.api_atol < 0.0 {
            return Err(ConfigError::Invalid("api_atol must be finite and non-negative"));
        }
        if !self.sa_density_floor.is_finite() || self.sa_density_floor <= 0.0 {
            return Err(ConfigError::Invalid("sa_density_floor must be finite and positive"));
        }
        if !self.mass_fraction_rtol.is_finite() || self.mass_fraction_rtol < 0.0 {
            return Err(ConfigError::Invalid(
                "mass_fraction_rtol must be finite and non-negative",
            ));
        }
        Ok(())
    }

    /// Whether `actual` is close to `expected`, as `|a − e| ≤ atol + rtol·|e|`.
    #[must_use]
    pub fn api_matches(&self, actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= self.api_atol + self.api_rtol * expected.abs()
    }

    /// Whether the component mass fractions sum to one within tolerance.
    #[must_use]
    pub fn mass_fractions_close(&self, sum: f64) -> bool {
        (sum - 1.0).abs() <= self.mass_fraction_rtol
    }

    #[must_use]
    pub fn is_manually_rejected(&self, record_id: &str) -> bool {
        self.rejected_ids.iter().any(|id| id == record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EstimatorConfig::default();

        assert_eq!(config.cut_count, 10);
        assert_eq!(config.mass_fraction_iterations, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_partial_json() -> Result<(), ConfigError> {
        let config = EstimatorConfig::from_json_str(
            r#"{
                "cut_count": 8,
                "validation": { "rejected_ids": ["AD00123"] },
                "correlations": { "viscosity": { "temperature_coeff": 2200.0 } }
            }"#,
        )?;

        assert_eq!(config.cut_count, 8);
        assert!(config.validation.is_manually_rejected("AD00123"));
        assert!(!config.validation.is_manually_rejected("AD00124"));
        assert!((config.correlations.viscosity.temperature_coeff - 2200.0).abs() < 1e-12);
        assert_eq!(config.correlations.version, "adios2");

        Ok(())
    }

    #[test]
    fn rejects_invalid_settings() {
        assert_eq!(
            EstimatorConfig::from_json_str(r#"{ "cut_count": 0 }"#),
            Err(ConfigError::Invalid("cut_count must be positive"))
        );

        assert!(matches!(
            EstimatorConfig::from_json_str(r#"{ "validation": { "api_rtol": -0.1 } }"#),
            Err(ConfigError::Invalid(_))
        ));

        assert!(matches!(
            EstimatorConfig::from_json_str("{ nope"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn api_tolerance_is_relative_to_density_api() {
        let validation = ValidationConfig::default();

        assert!(validation.api_matches(31.0, 30.0));
        assert!(!validation.api_matches(32.0, 30.0));
        assert!(validation.mass_fractions_close(1.0 + 5e-7));
        assert!(!validation.mass_fractions_close(0.999));
    }
}
