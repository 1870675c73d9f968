//! Viscosity correlations.

use serde::{Deserialize, Serialize};

use crate::CorrelationError;

/// Constants for the viscosity-temperature relation and the pour point estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViscosityCorrelations {
    /// Temperature coefficient `k_v2` of the exponential viscosity relation, in K.
    pub temperature_coeff: f64,

    /// Coefficient `c_v1` of the pour point estimate, in K.
    pub pour_point_coeff: f64,
}

impl Default for ViscosityCorrelations {
    fn default() -> Self {
        Self {
            temperature_coeff: 2100.0,
            pour_point_coeff: 5000.0,
        }
    }
}

impl ViscosityCorrelations {
    /// Shifts a kinematic viscosity to another temperature.
    ///
    /// Uses `ν(T) = ν_ref·exp(k_v2/T − k_v2/T_ref)`.
    #[must_use]
    pub fn kvis_at_temp(&self, ref_kvis: f64, ref_temp_k: f64, temp_k: f64) -> f64 {
        let k_v2 = self.temperature_coeff;

        ref_kvis * (k_v2 / temp_k - k_v2 / ref_temp_k).exp()
    }

    /// Converts a dynamic viscosity to kinematic using the density at the same temperature.
    #[must_use]
    pub fn dvis_to_kvis(&self, dvis: f64, density: f64) -> f64 {
        dvis / density
    }

    /// Estimates the pour point from a kinematic viscosity measurement.
    ///
    /// # Errors
    ///
    /// Returns an error if the viscosity is not positive.
    pub fn pour_point_from_kvis(&self, ref_kvis: f64, ref_temp_k: f64) -> Result<f64, CorrelationError> {
        if ref_kvis <= 0.0 || !ref_kvis.is_finite() {
            return Err(CorrelationError::out_of_domain(
                "pour_point_from_kvis",
                "kinematic viscosity",
                ref_kvis,
            ));
        }

        let c_v1 = self.pour_point_coeff;

        Ok((c_v1 * ref_temp_k) / (c_v1 - ref_temp_k * ref_kvis.ln()))
    }
}
