//! Density and API gravity correlations.

use serde::{Deserialize, Serialize};

/// Reference temperature (15 °C) for API gravity and standard densities.
pub const REFERENCE_TEMP_K: f64 = 288.15;

/// Constants for the API gravity relation and the linear volumetric
/// expansion model of oil density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityCorrelations {
    /// Numerator of the API gravity relation, `API = 141.5/SG − 131.5`.
    pub api_numerator: f64,

    /// Offset of the API gravity relation.
    pub api_offset: f64,

    /// Density of water used to form specific gravities, in kg/m³.
    pub water_density: f64,

    /// Oils lighter than this API use the light expansion coefficient.
    pub light_api_threshold: f64,

    /// Default volumetric expansion coefficient for light oils, in 1/K.
    pub light_expansion_coeff: f64,

    /// Default volumetric expansion coefficient for heavy oils, in 1/K.
    pub heavy_expansion_coeff: f64,
}

impl Default for DensityCorrelations {
    fn default() -> Self {
        Self {
            api_numerator: 141.5,
            api_offset: 131.5,
            water_density: 1000.0,
            light_api_threshold: 30.0,
            light_expansion_coeff: 0.0009,
            heavy_expansion_coeff: 0.0008,
        }
    }
}

impl DensityCorrelations {
    /// Returns the density implied by an API gravity, with its reference temperature.
    ///
    /// The density is always referenced to 15 °C.
    #[must_use]
    pub fn density_from_api(&self, api: f64) -> (f64, f64) {
        let kg_m_3 = self.api_numerator / (self.api_offset + api) * self.water_density;

        (kg_m_3, REFERENCE_TEMP_K)
    }

    /// Returns the API gravity implied by a density at 15 °C.
    #[must_use]
    pub fn api_from_density(&self, density: f64) -> f64 {
        self.api_numerator * self.water_density / density - self.api_offset
    }

    /// Returns the specific gravity of a density relative to water.
    #[must_use]
    pub fn specific_gravity(&self, density: f64) -> f64 {
        density / self.water_density
    }

    /// Applies linear volumetric expansion, `ρ(T) = ρ_ref / (1 − k·(T_ref − T))`.
    #[must_use]
    pub fn density_at_temp(
        &self,
        ref_density: f64,
        ref_temp_k: f64,
        temp_k: f64,
        k_rho_t: f64,
    ) -> f64 {
        ref_density / (1.0 - k_rho_t * (ref_temp_k - temp_k))
    }

    /// Computes the volumetric expansion coefficient between two density measurements.
    ///
    /// Returns zero when both measurements share a reference temperature.
    #[must_use]
    pub fn vol_expansion_coeff(&self, rho_0: f64, t_0: f64, rho_1: f64, t_1: f64) -> f64 {
        #[allow(clippy::float_cmp)]
        if t_0 == t_1 {
            return 0.0;
        }

        (rho_0 - rho_1) / (rho_0 * (t_1 - t_0))
    }

    /// Returns the default expansion coefficient for an oil of the given API gravity.
    ///
    /// An unknown API gravity is treated as a heavy oil.
    #[must_use]
    pub fn default_expansion_coeff(&self, api: Option<f64>) -> f64 {
        match api {
            Some(api) if api > self.light_api_threshold => self.light_expansion_coeff,
            _ => self.heavy_expansion_coeff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn api_ten_is_water() {
        let density = DensityCorrelations::default();

        let (kg_m_3, ref_temp_k) = density.density_from_api(10.0);
        assert_relative_eq!(kg_m_3, 1000.0);
        assert_relative_eq!(ref_temp_k, REFERENCE_TEMP_K);

        assert_relative_eq!(density.api_from_density(1000.0), 10.0);
        assert_relative_eq!(density.specific_gravity(1000.0), 1.0);
    }

    #[test]
    fn light_crude_density() {
        let density = DensityCorrelations::default();

        let (kg_m_3, _) = density.density_from_api(30.0);
        assert_relative_eq!(kg_m_3, 876.160_990_712, epsilon = 1e-6);
        assert_relative_eq!(density.api_from_density(kg_m_3), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn expansion_between_two_measurements() {
        let density = DensityCorrelations::default();

        let k = density.vol_expansion_coeff(900.0, 288.15, 890.0, 300.0);
        assert_relative_eq!(k, 10.0 / (900.0 * 11.85));

        // Evaluating at the reference temperature returns the reference density.
        assert_relative_eq!(density.density_at_temp(900.0, 288.15, 288.15, k), 900.0);

        // Warmer oil is lighter.
        assert!(density.density_at_temp(900.0, 288.15, 300.0, k) < 900.0);
        assert_relative_eq!(
            density.density_at_temp(900.0, 288.15, 300.0, k),
            890.109_890,
            epsilon = 1e-5
        );
    }

    #[test]
    fn coincident_reference_temperatures_have_no_expansion() {
        let density = DensityCorrelations::default();

        assert_relative_eq!(density.vol_expansion_coeff(900.0, 288.15, 880.0, 288.15), 0.0);
    }

    #[test]
    fn default_coefficient_depends_on_api() {
        let density = DensityCorrelations::default();

        assert_relative_eq!(density.default_expansion_coeff(Some(35.0)), 0.0009);
        assert_relative_eq!(density.default_expansion_coeff(Some(30.0)), 0.0008);
        assert_relative_eq!(density.default_expansion_coeff(None), 0.0008);
    }
}
