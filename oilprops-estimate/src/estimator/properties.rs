use oilprops_correlations::REFERENCE_TEMP_K;
use oilprops_record::{ProductType, RecordSource, Scalar, selection};

use super::{Bounds, Estimate, Estimator, InterfacialTension};
use crate::EstimationError;

impl<S: RecordSource + ?Sized> Estimator<'_, S> {
    /// Pour point bounds, in K.
    ///
    /// Measured bounds are kept as recorded. Otherwise the upper bound is
    /// estimated from the coldest kinematic viscosity.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::NoViscosityInformation`] if there is no
    /// measured pour point and no viscosity to estimate one from.
    pub fn pour_point(&self) -> Result<Estimate<Bounds>, EstimationError> {
        let measured = self.measured_bounds(Scalar::PourPointMinK, Scalar::PourPointMaxK);
        if !measured.is_empty() {
            return Ok(Estimate::measured(measured));
        }

        let max_k = self
            .estimated_pour_point_k()?
            .ok_or(EstimationError::NoViscosityInformation)?;

        Ok(Estimate::estimated(Bounds {
            min_k: None,
            max_k: Some(max_k),
        }))
    }

    /// Flash point bounds, in K.
    ///
    /// Measured bounds are kept as recorded. Otherwise the upper bound is
    /// estimated from the lightest cut when the record has more than two
    /// usable cuts, and from API gravity when it does not.
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts or API gravity needed for an estimate
    /// cannot be determined.
    pub fn flash_point(&self) -> Result<Estimate<Bounds>, EstimationError> {
        let measured = self.measured_bounds(Scalar::FlashPointMinK, Scalar::FlashPointMaxK);
        if !measured.is_empty() {
            return Ok(Estimate::measured(measured));
        }

        let misc = &self.correlations().misc;

        let lightest_cut = if self.record.culled_cuts().len() > 2 {
            self.normalized_cuts()?.first().map(|c| c.vapor_temp_k)
        } else {
            None
        };

        let max_k = match lightest_cut {
            Some(boiling_point) => misc.flash_point_from_bp(boiling_point),
            None => misc.flash_point_from_api(self.require_api()?),
        };

        Ok(Estimate::estimated(Bounds {
            min_k: None,
            max_k: Some(max_k),
        }))
    }

    /// Mass fraction that must evaporate or dissolve before a stable
    /// water-in-oil emulsion can form.
    ///
    /// # Errors
    ///
    /// Returns an error if a crude's inert fractions or API gravity cannot be
    /// determined.
    pub fn bullwinkle_fraction(&self) -> Result<Estimate<f64>, EstimationError> {
        let emulsion = &self.correlations().emulsion;

        if self.record.product_type() == Some(ProductType::Refined) {
            return Ok(Estimate::estimated(emulsion.refined_bullwinkle));
        }

        if let Some(bullwinkle) = self.record.scalar(Scalar::EmulsConstantMax) {
            return Ok(Estimate::measured(bullwinkle));
        }

        let nickel = self.record.scalar(Scalar::Nickel).unwrap_or(0.0);
        let vanadium = self.record.scalar(Scalar::Vanadium).unwrap_or(0.0);

        let asphaltenes = self.inert_fractions()?.asphaltenes;
        let api = self.require_api()?;

        let bullwinkle = if emulsion.metals_suppress_bullwinkle(nickel, vanadium) {
            0.0
        } else if asphaltenes > 0.0 {
            emulsion.bullwinkle_from_asphaltenes(asphaltenes)?
        } else {
            emulsion.bullwinkle_from_api(api)?
        };

        Ok(Estimate::estimated(
            emulsion.blend_with_boiling_point(bullwinkle, api)?,
        ))
    }

    /// Oil-water interfacial tension, measured or estimated at 15 °C from
    /// API gravity.
    ///
    /// # Errors
    ///
    /// Returns an error if the API gravity cannot be determined.
    pub fn oil_water_surface_tension(&self) -> Result<Estimate<InterfacialTension>, EstimationError> {
        if let (Some(n_m), Some(ref_temp_k)) = (
            self.record.scalar(Scalar::OilWaterTension),
            self.record.scalar(Scalar::OilWaterTensionRefTempK),
        ) {
            return Ok(Estimate::measured(InterfacialTension { n_m, ref_temp_k }));
        }

        let n_m = self
            .correlations()
            .misc
            .oil_water_surface_tension_from_api(self.require_api()?);

        Ok(Estimate::estimated(InterfacialTension {
            n_m,
            ref_temp_k: REFERENCE_TEMP_K,
        }))
    }

    /// Oil-seawater interfacial tension, if measured.
    ///
    /// There is no correlation for this tension.
    #[must_use]
    pub fn oil_seawater_surface_tension(&self) -> Option<InterfacialTension> {
        Some(InterfacialTension {
            n_m: self.record.scalar(Scalar::OilSeawaterTension)?,
            ref_temp_k: self.record.scalar(Scalar::OilSeawaterTensionRefTempK)?,
        })
    }

    /// Largest water fraction an emulsion of this oil can hold.
    #[must_use]
    pub fn max_water_fraction_emulsion(&self) -> Estimate<f64> {
        let is_crude = self.record.product_type() == Some(ProductType::Crude);

        Estimate::estimated(self.correlations().emulsion.max_water_fraction(is_crude))
    }

    #[must_use]
    pub fn solubility(&self) -> Estimate<f64> {
        self.scalar_or(Scalar::Solubility, self.correlations().misc.default_solubility)
    }

    /// Adhesion in kg/m².
    #[must_use]
    pub fn adhesion(&self) -> Estimate<f64> {
        self.scalar_or(Scalar::Adhesion, self.correlations().misc.default_adhesion)
    }

    #[must_use]
    pub fn sulphur_fraction(&self) -> Estimate<f64> {
        self.scalar_or(Scalar::Sulphur, self.correlations().misc.default_sulphur)
    }

    /// Dispersion rate constant.
    #[must_use]
    pub fn k0y(&self) -> Estimate<f64> {
        self.scalar_or(Scalar::K0y, self.correlations().misc.default_k0y)
    }

    /// Pour point estimated from the coldest kinematic viscosity, if any.
    pub(crate) fn estimated_pour_point_k(&self) -> Result<Option<f64>, EstimationError> {
        let kvis = self.aggregate_kvis()?;

        let Some(coldest) = selection::lowest_temperature(kvis) else {
            return Ok(None);
        };

        Ok(Some(
            self.correlations()
                .viscosity
                .pour_point_from_kvis(coldest.m_2_s, coldest.ref_temp_k)?,
        ))
    }

    fn measured_bounds(&self, min: Scalar, max: Scalar) -> Bounds {
        Bounds {
            min_k: self.record.scalar(min),
            max_k: self.record.scalar(max),
        }
    }

    fn scalar_or(&self, scalar: Scalar, default: f64) -> Estimate<f64> {
        match self.record.scalar(scalar) {
            Some(value) => Estimate::measured(value),
            None => Estimate::estimated(default),
        }
    }
}
