//! Emulsification correlations.
//!
//! The bullwinkle fraction is the mass fraction that must evaporate or
//! dissolve before a stable water-in-oil emulsion can form.

use serde::{Deserialize, Serialize};

use crate::CorrelationError;

/// Constants for the bullwinkle fraction and emulsion water content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulsionCorrelations {
    /// Bullwinkle fraction assigned to refined products.
    pub refined_bullwinkle: f64,

    /// Upper limit of any correlated crude bullwinkle fraction.
    pub max_bullwinkle: f64,

    /// Bullwinkle fraction of heavy crudes below [`Self::heavy_api`].
    pub heavy_bullwinkle: f64,

    /// API gravity below which a crude takes the heavy bullwinkle fraction.
    pub heavy_api: f64,

    /// API gravity above which a crude takes the maximum bullwinkle fraction.
    pub light_api: f64,

    /// Combined nickel and vanadium content above which emulsions form at once, in ppm.
    pub metals_threshold_ppm: f64,

    /// Upper limit of the boiling point based bullwinkle estimate.
    pub max_boiling_point_bullwinkle: f64,

    /// Maximum water fraction of a crude oil emulsion.
    pub crude_max_water_fraction: f64,

    /// Maximum water fraction of a refined product emulsion.
    pub refined_max_water_fraction: f64,
}

impl Default for EmulsionCorrelations {
    fn default() -> Self {
        Self {
            refined_bullwinkle: 1.0,
            max_bullwinkle: 0.303,
            heavy_bullwinkle: 0.08,
            heavy_api: 26.0,
            light_api: 50.0,
            metals_threshold_ppm: 15.0,
            max_boiling_point_bullwinkle: 0.4,
            crude_max_water_fraction: 0.9,
            refined_max_water_fraction: 0.0,
        }
    }
}

impl EmulsionCorrelations {
    /// Whether a crude's metal content makes it emulsify immediately.
    #[must_use]
    pub fn metals_suppress_bullwinkle(&self, nickel_ppm: f64, vanadium_ppm: f64) -> bool {
        nickel_ppm > 0.0
            && vanadium_ppm > 0.0
            && nickel_ppm + vanadium_ppm > self.metals_threshold_ppm
    }

    /// Bullwinkle fraction of a crude from its asphaltene fraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the asphaltene fraction is not positive.
    pub fn bullwinkle_from_asphaltenes(&self, f_asph: f64) -> Result<f64, CorrelationError> {
        if f_asph <= 0.0 || !f_asph.is_finite() {
            return Err(CorrelationError::out_of_domain(
                "bullwinkle_from_asphaltenes",
                "asphaltene fraction",
                f_asph,
            ));
        }

        Ok((0.202_19 - 0.168 * f_asph.log10()).clamp(0.0, self.max_bullwinkle))
    }

    /// Bullwinkle fraction of a crude from its API gravity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API gravity is not positive.
    pub fn bullwinkle_from_api(&self, api: f64) -> Result<f64, CorrelationError> {
        if api <= 0.0 || !api.is_finite() {
            return Err(CorrelationError::out_of_domain(
                "bullwinkle_from_api",
                "API gravity",
                api,
            ));
        }

        let fraction = if api < self.heavy_api {
            self.heavy_bullwinkle
        } else if api > self.light_api {
            self.max_bullwinkle
        } else {
            -1.038 - 0.789_35 * (1.0 / api).log10()
        };

        Ok(fraction)
    }

    /// Averages a bullwinkle fraction with an estimate from the oil's boiling point.
    ///
    /// The second estimate comes from the API-based initial boiling point
    /// and evaporation gradient, `(483 − T_BP)/T_G`, clipped to its limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the API gravity is not positive.
    pub fn blend_with_boiling_point(
        &self,
        bullwinkle: f64,
        api: f64,
    ) -> Result<f64, CorrelationError> {
        if api <= 0.0 || !api.is_finite() {
            return Err(CorrelationError::out_of_domain(
                "blend_with_boiling_point",
                "API gravity",
                api,
            ));
        }

        let t_g = 1356.7 - 247.36 * api.ln();
        let t_bp = 532.98 - 3.1295 * api;
        let from_bp = ((483.0 - t_bp) / t_g).clamp(0.0, self.max_boiling_point_bullwinkle);

        Ok(0.5 * (bullwinkle + from_bp))
    }

    /// Maximum emulsion water fraction for a crude or refined product.
    #[must_use]
    pub fn max_water_fraction(&self, is_crude: bool) -> f64 {
        if is_crude {
            self.crude_max_water_fraction
        } else {
            self.refined_max_water_fraction
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn metals_rule_needs_both_metals() {
        let emulsion = EmulsionCorrelations::default();

        assert!(emulsion.metals_suppress_bullwinkle(10.0, 10.0));
        assert!(!emulsion.metals_suppress_bullwinkle(20.0, 0.0));
        assert!(!emulsion.metals_suppress_bullwinkle(5.0, 5.0));
    }

    #[test]
    fn asphaltene_bullwinkle_is_clipped() {
        let emulsion = EmulsionCorrelations::default();

        let b = emulsion.bullwinkle_from_asphaltenes(0.05).unwrap();
        assert_relative_eq!(b, 0.20219 - 0.168 * 0.05_f64.log10());
        assert!(b <= 0.303);

        // Tiny asphaltene content would exceed the limit.
        assert_relative_eq!(emulsion.bullwinkle_from_asphaltenes(1e-4).unwrap(), 0.303);

        assert!(emulsion.bullwinkle_from_asphaltenes(0.0).is_err());
    }

    #[test]
    fn api_bullwinkle_branches() {
        let emulsion = EmulsionCorrelations::default();

        assert_relative_eq!(emulsion.bullwinkle_from_api(20.0).unwrap(), 0.08);
        assert_relative_eq!(emulsion.bullwinkle_from_api(55.0).unwrap(), 0.303);
        assert_relative_eq!(
            emulsion.bullwinkle_from_api(35.0).unwrap(),
            -1.038 - 0.78935 * (1.0 / 35.0_f64).log10()
        );
        assert!(emulsion.bullwinkle_from_api(-1.0).is_err());
    }

    #[test]
    fn boiling_point_blend_is_an_even_average() {
        let emulsion = EmulsionCorrelations::default();

        let api: f64 = 35.0;
        let t_g = 1356.7 - 247.36 * api.ln();
        let t_bp = 532.98 - 3.1295 * api;
        let from_bp = ((483.0 - t_bp) / t_g).clamp(0.0, 0.4);

        let blended = emulsion.blend_with_boiling_point(0.2, api).unwrap();
        assert_relative_eq!(blended, 0.5 * (0.2 + from_bp));
    }

    #[test]
    fn water_fraction_by_product_type() {
        let emulsion = EmulsionCorrelations::default();

        assert_relative_eq!(emulsion.max_water_fraction(true), 0.9);
        assert_relative_eq!(emulsion.max_water_fraction(false), 0.0);
    }
}
