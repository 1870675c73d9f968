use serde::{Deserialize, Serialize};

use crate::{
    CorrelationError, DensityCorrelations, DistillationCorrelations, EmulsionCorrelations,
    MiscCorrelations, SaraCorrelations, ViscosityCorrelations,
};

/// A versioned, immutable table of every correlation constant.
///
/// The default is the `"adios2"` set. Alternate sets can be deserialized,
/// with any missing group or constant falling back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSet {
    pub version: String,
    pub density: DensityCorrelations,
    pub viscosity: ViscosityCorrelations,
    pub distillation: DistillationCorrelations,
    pub sara: SaraCorrelations,
    pub emulsion: EmulsionCorrelations,
    pub misc: MiscCorrelations,
}

impl Default for CorrelationSet {
    fn default() -> Self {
        Self {
            version: String::from(Self::DEFAULT_VERSION),
            density: DensityCorrelations::default(),
            viscosity: ViscosityCorrelations::default(),
            distillation: DistillationCorrelations::default(),
            sara: SaraCorrelations::default(),
            emulsion: EmulsionCorrelations::default(),
            misc: MiscCorrelations::default(),
        }
    }
}

impl CorrelationSet {
    /// Version of the default constants.
    pub const DEFAULT_VERSION: &'static str = "adios2";

    /// Validates that the constants can produce physical results.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::InvalidConstant`] naming the first constant
    /// that is non-finite or outside its physical range.
    pub fn validate(&self) -> Result<(), CorrelationError> {
        let positive = [
            ("density.api_numerator", self.density.api_numerator),
            ("density.water_density", self.density.water_density),
            ("viscosity.temperature_coeff", self.viscosity.temperature_coeff),
            ("viscosity.pour_point_coeff", self.viscosity.pour_point_coeff),
            ("distillation.boundary_temp_k", self.distillation.boundary_temp_k),
            ("distillation.clamp_steepness", self.distillation.clamp_steepness),
            ("sara.resin_mol_wt", self.sara.resin_mol_wt),
            ("sara.asphaltene_mol_wt", self.sara.asphaltene_mol_wt),
            ("sara.resin_density", self.sara.resin_density),
            ("sara.asphaltene_density", self.sara.asphaltene_density),
            ("sara.lumped_boiling_point", self.sara.lumped_boiling_point),
            ("sara.saturate_watson_k", self.sara.saturate_watson_k),
            ("sara.aromatic_watson_k", self.sara.aromatic_watson_k),
            ("sara.riazi_mol_wt_limit", self.sara.riazi_mol_wt_limit),
            ("misc.atmospheric_pressure", self.misc.atmospheric_pressure),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CorrelationError::InvalidConstant { name, value });
            }
        }

        let non_negative = [
            ("density.light_expansion_coeff", self.density.light_expansion_coeff),
            ("density.heavy_expansion_coeff", self.density.heavy_expansion_coeff),
            ("misc.default_adhesion", self.misc.default_adhesion),
            ("misc.default_k0y", self.misc.default_k0y),
        ];

        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CorrelationError::InvalidConstant { name, value });
            }
        }

        let fractions = [
            ("misc.default_sulphur", self.misc.default_sulphur),
            ("misc.default_solubility", self.misc.default_solubility),
            ("emulsion.refined_bullwinkle", self.emulsion.refined_bullwinkle),
            ("emulsion.max_bullwinkle", self.emulsion.max_bullwinkle),
            ("emulsion.heavy_bullwinkle", self.emulsion.heavy_bullwinkle),
            (
                "emulsion.crude_max_water_fraction",
                self.emulsion.crude_max_water_fraction,
            ),
            (
                "emulsion.refined_max_water_fraction",
                self.emulsion.refined_max_water_fraction,
            ),
        ];

        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(CorrelationError::InvalidConstant { name, value });
            }
        }

        let zeta = self.distillation.clamp_zeta;
        if !(zeta > 0.0 && zeta < 1.0) {
            return Err(CorrelationError::InvalidConstant {
                name: "distillation.clamp_zeta",
                value: zeta,
            });
        }

        if self.distillation.synthetic_cut_count == 0 {
            return Err(CorrelationError::InvalidConstant {
                name: "distillation.synthetic_cut_count",
                value: 0.0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_set_is_valid() {
        let set = CorrelationSet::default();

        assert_eq!(set.version, "adios2");
        assert!(set.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{
            "version": "experimental",
            "density": { "light_expansion_coeff": 0.001 }
        }"#;

        let set: CorrelationSet = serde_json::from_str(json).unwrap();

        assert_eq!(set.version, "experimental");
        assert_relative_eq!(set.density.light_expansion_coeff, 0.001);
        assert_relative_eq!(set.density.heavy_expansion_coeff, 0.0008);
        assert_eq!(set.viscosity, ViscosityCorrelations::default());
        assert!(set.validate().is_ok());
    }

    #[test]
    fn invalid_constants_are_named() {
        let mut set = CorrelationSet::default();
        set.distillation.clamp_zeta = 1.0;

        assert_eq!(
            set.validate(),
            Err(CorrelationError::InvalidConstant {
                name: "distillation.clamp_zeta",
                value: 1.0,
            })
        );

        let mut set = CorrelationSet::default();
        set.sara.resin_density = f64::NAN;
        assert!(matches!(
            set.validate(),
            Err(CorrelationError::InvalidConstant {
                name: "sara.resin_density",
                ..
            })
        ));
    }
}
