use oilprops_correlations::{LinearFit, REFERENCE_TEMP_K, distillation};
use oilprops_record::{Cut, RecordSource, Scalar};
use tracing::debug;

use super::{Estimator, InertFractions};
use crate::EstimationError;

impl<S: RecordSource + ?Sized> Estimator<'_, S> {
    /// Resin and asphaltene fractions.
    ///
    /// Missing fractions are estimated from the density and kinematic
    /// viscosity at 15 °C, resins first so asphaltenes are limited to the
    /// mass the resins leave.
    ///
    /// # Errors
    ///
    /// Returns an error if a fraction is missing and the record lacks the
    /// density or viscosity to estimate it.
    pub fn inert_fractions(&self) -> Result<InertFractions, EstimationError> {
        let resins = self.record.scalar(Scalar::Resins);
        let asphaltenes = self.record.scalar(Scalar::Asphaltenes);

        if let (Some(resins), Some(asphaltenes)) = (resins, asphaltenes) {
            return Ok(InertFractions {
                resins,
                asphaltenes,
                estimated: false,
            });
        }

        let density = self.density_at_temp(REFERENCE_TEMP_K, 0.0)?;
        let kvis = self
            .kvis_at_temp(REFERENCE_TEMP_K, 0.0)?
            .ok_or(EstimationError::NoViscosityInformation)?;

        let sara = &self.correlations().sara;
        let resins = resins.unwrap_or_else(|| sara.resin_fraction(density, kvis, 0.0));
        let asphaltenes =
            asphaltenes.unwrap_or_else(|| sara.asphaltene_fraction(density, kvis, resins));

        debug!(resins, asphaltenes, "estimated inert fractions");

        Ok(InertFractions {
            resins,
            asphaltenes,
            estimated: true,
        })
    }

    /// Distillation cuts resampled onto an even grid of evaporated fractions.
    ///
    /// A line is fitted through the recorded cuts, or through cuts
    /// synthesized from API gravity when fewer than two are usable. Its
    /// inverse, clamped near the upper boiling point limit, gives the
    /// temperature at each fraction up to the distillable mass. Cuts whose
    /// temperature comes out non-positive are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the inert fractions or API gravity cannot be
    /// determined, or the cut line cannot be fitted.
    pub fn normalized_cuts(&self) -> Result<&[Cut], EstimationError> {
        if let Some(cuts) = self.cuts.get() {
            return Ok(cuts);
        }

        let inert = self.inert_fractions()?;
        let (temps, fractions) = self.fit_points(&inert)?;

        let fit = LinearFit::least_squares(&temps, &fractions)?;
        let inverse = self.correlations().distillation.clamped_inverse(fit);

        let steps = 2 * self.config.cut_count;
        #[allow(clippy::cast_precision_loss)]
        let grid: Vec<f64> = (1..=steps)
            .map(|k| inert.distillable() * k as f64 / steps as f64)
            .collect();

        let cuts: Vec<Cut> = grid
            .chunks_exact(2)
            .map(|pair| Cut::new(inverse.temperature_at(pair[0]), pair[1]))
            .filter(|cut| cut.vapor_temp_k > 0.0)
            .collect();

        Ok(self.cuts.get_or_init(|| cuts))
    }

    /// Boiling points of the normalized cuts, in K.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Self::normalized_cuts`].
    pub fn cut_temps(&self) -> Result<Vec<f64>, EstimationError> {
        Ok(self.normalized_cuts()?.iter().map(|c| c.vapor_temp_k).collect())
    }

    /// Mass fraction of the oil in each normalized cut.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Self::normalized_cuts`].
    pub fn cut_fmasses(&self) -> Result<Vec<f64>, EstimationError> {
        let fractions: Vec<f64> = self.normalized_cuts()?.iter().map(|c| c.fraction).collect();

        Ok(distillation::fmasses_from_cuts(&fractions))
    }

    fn fit_points(&self, inert: &InertFractions) -> Result<(Vec<f64>, Vec<f64>), EstimationError> {
        let culled = self.record.culled_cuts();
        if culled.len() >= 2 {
            return Ok(culled.iter().map(|c| (c.vapor_temp_k, c.fraction)).unzip());
        }

        let api = self.require_api()?;
        let correlations = &self.correlations().distillation;

        let temps = correlations.cut_temps_from_api(api)?;
        let fractions: Vec<f64> = correlations
            .fmasses_flat_dist(inert.resins, inert.asphaltenes)
            .into_iter()
            .scan(0.0, |total, fmass| {
                *total += fmass;
                Some(*total)
            })
            .collect();

        debug!(api, cuts = temps.len(), "synthesized distillation cuts from API gravity");

        Ok((temps, fractions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use oilprops_record::ImportedRecord;

    use crate::EstimatorConfig;

    fn measured_crude() -> ImportedRecord {
        ImportedRecord::new("AD0020")
            .with_api(32.0)
            .with_kvis(1e-5, 288.15)
            .with_scalar(Scalar::Resins, 0.05)
            .with_scalar(Scalar::Asphaltenes, 0.01)
            .with_cut(350.0, 0.1)
            .with_cut(450.0, 0.3)
            .with_cut(550.0, 0.5)
            .with_cut(650.0, 0.7)
    }

    #[test]
    fn measured_fractions_are_kept() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = measured_crude();
        let estimator = Estimator::new(&record, &config);

        let inert = estimator.inert_fractions()?;
        assert_relative_eq!(inert.resins, 0.05);
        assert_relative_eq!(inert.asphaltenes, 0.01);
        assert!(!inert.estimated);

        Ok(())
    }

    #[test]
    fn missing_fractions_from_density_and_viscosity() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = ImportedRecord::new("AD0021")
            .with_density(900.0, REFERENCE_TEMP_K)
            .with_kvis(1e-4, REFERENCE_TEMP_K)
            .with_scalar(Scalar::Resins, 0.08);

        let estimator = Estimator::new(&record, &config);
        let inert = estimator.inert_fractions()?;

        let sara = &config.correlations.sara;
        assert_relative_eq!(inert.resins, 0.08);
        assert_relative_eq!(inert.asphaltenes, sara.asphaltene_fraction(900.0, 1e-4, 0.08));
        assert!(inert.estimated);

        let bare = ImportedRecord::new("AD0022").with_density(900.0, REFERENCE_TEMP_K);
        let estimator = Estimator::new(&bare, &config);
        assert_eq!(
            estimator.inert_fractions(),
            Err(EstimationError::NoViscosityInformation)
        );

        Ok(())
    }

    #[test]
    fn normalized_cuts_span_distillable_mass() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = measured_crude();
        let estimator = Estimator::new(&record, &config);

        let cuts = estimator.normalized_cuts()?;
        assert_eq!(cuts.len(), 10);
        assert_relative_eq!(cuts[0].fraction, 0.094, epsilon = 1e-12);
        assert_relative_eq!(cuts[9].fraction, 0.94, epsilon = 1e-12);

        // On the fitted line below the clamp, temperature follows fraction.
        let fit = LinearFit::least_squares(&[350.0, 450.0, 550.0, 650.0], &[0.1, 0.3, 0.5, 0.7])
            .unwrap();
        assert_relative_eq!(
            cuts[0].vapor_temp_k,
            (0.047 - fit.intercept) / fit.slope,
            max_relative = 1e-6
        );

        for pair in cuts.windows(2) {
            assert!(pair[1].vapor_temp_k > pair[0].vapor_temp_k);
            assert!(pair[1].fraction > pair[0].fraction);
        }

        let fmasses = estimator.cut_fmasses()?;
        assert_relative_eq!(fmasses.iter().sum::<f64>(), 0.94, epsilon = 1e-12);
        assert_eq!(estimator.cut_temps()?.len(), 10);

        Ok(())
    }

    #[test]
    fn cuts_synthesized_without_distillation_data() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = ImportedRecord::new("AD0023")
            .with_api(30.0)
            .with_kvis(1e-5, 288.15)
            .with_cut(400.0, 0.2);

        let estimator = Estimator::new(&record, &config);
        let cuts = estimator.normalized_cuts()?;

        assert_eq!(cuts.len(), 10);
        assert!(cuts.iter().all(|c| c.vapor_temp_k > 0.0));

        let distillable = estimator.inert_fractions()?.distillable();
        assert_relative_eq!(cuts[9].fraction, distillable, epsilon = 1e-12);

        Ok(())
    }
}
