//! Flash point, interfacial tension, vapor pressure, and default properties.

use serde::{Deserialize, Serialize};

use crate::CorrelationError;

/// Constants for properties without a dedicated correlation group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscCorrelations {
    /// Default adhesion, in kg/m².
    pub default_adhesion: f64,

    /// Default sulphur mass fraction.
    pub default_sulphur: f64,

    /// Default solubility in water.
    pub default_solubility: f64,

    /// Default dispersion rate constant `k0y`.
    pub default_k0y: f64,

    /// Ambient pressure anchoring the vapor pressure curve at the boiling point, in Pa.
    pub atmospheric_pressure: f64,
}

impl Default for MiscCorrelations {
    fn default() -> Self {
        Self {
            default_adhesion: 0.035,
            default_sulphur: 0.0,
            default_solubility: 0.0,
            default_k0y: 2.02e-6,
            atmospheric_pressure: 101_325.0,
        }
    }
}

impl MiscCorrelations {
    /// Flash point from the boiling point of the lightest cut, in K.
    #[must_use]
    pub fn flash_point_from_bp(&self, boiling_point: f64) -> f64 {
        117.0 + 0.69 * boiling_point
    }

    /// Flash point from API gravity, in K.
    #[must_use]
    pub fn flash_point_from_api(&self, api: f64) -> f64 {
        457.0 - 3.34 * api
    }

    /// Oil-water interfacial tension from API gravity, in N/m at 15 °C.
    #[must_use]
    pub fn oil_water_surface_tension_from_api(&self, api: f64) -> f64 {
        0.001 * (39.0 - 0.2571 * api)
    }

    /// Vapor pressure of a pseudo-component at `temp_k`, in Pa.
    ///
    /// Uses the Antoine-type form anchored at atmospheric pressure at the
    /// component's normal boiling point.
    ///
    /// # Errors
    ///
    /// Returns an error if the boiling point is not positive.
    pub fn vapor_pressure(&self, boiling_point: f64, temp_k: f64) -> Result<f64, CorrelationError> {
        if boiling_point <= 0.0 || !boiling_point.is_finite() {
            return Err(CorrelationError::out_of_domain(
                "vapor_pressure",
                "boiling point",
                boiling_point,
            ));
        }

        let d_s = 8.75 + 1.987 * boiling_point.ln();
        let c_2 = 0.19 * boiling_point - 18.0;

        let coeff = d_s * (boiling_point - c_2).powi(2) / (0.97 * 1.987 * boiling_point);
        let exponent = coeff * (1.0 / (boiling_point - c_2) - 1.0 / (temp_k - c_2));

        Ok(self.atmospheric_pressure * exponent.exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn flash_points() {
        let misc = MiscCorrelations::default();

        assert_relative_eq!(misc.flash_point_from_bp(400.0), 393.0);
        assert_relative_eq!(misc.flash_point_from_api(30.0), 356.8);
    }

    #[test]
    fn interfacial_tension_from_api() {
        let misc = MiscCorrelations::default();

        assert_relative_eq!(misc.oil_water_surface_tension_from_api(30.0), 0.031287);
    }

    #[test]
    fn vapor_pressure_is_atmospheric_at_boiling_point() -> Result<(), CorrelationError> {
        let misc = MiscCorrelations::default();

        assert_relative_eq!(misc.vapor_pressure(450.0, 450.0)?, 101_325.0);
        assert!(misc.vapor_pressure(450.0, 300.0)? < 101_325.0);
        assert!(misc.vapor_pressure(400.0, 300.0)? > misc.vapor_pressure(450.0, 300.0)?);

        Ok(())
    }

    #[test]
    fn vapor_pressure_needs_positive_boiling_point() {
        let misc = MiscCorrelations::default();

        assert!(misc.vapor_pressure(0.0, 300.0).is_err());
    }
}
