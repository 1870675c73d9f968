use std::collections::BTreeSet;

use oilprops_record::{Measurement, MeasurementKey, RecordSource, Series, selection};
use tracing::debug;

use super::Estimator;
use crate::{EstimationError, KvisEntry};

impl<S: RecordSource + ?Sized> Estimator<'_, S> {
    /// Measured kinematic viscosities together with those converted from
    /// dynamic viscosities, sorted by weathering and then temperature.
    ///
    /// A dynamic viscosity is only converted where no kinematic viscosity
    /// exists at the same weathering and temperature.
    ///
    /// # Errors
    ///
    /// Returns an error if a dynamic viscosity needs a density that cannot be
    /// estimated.
    pub fn aggregate_kvis(&self) -> Result<&[KvisEntry], EstimationError> {
        if let Some(kvis) = self.kvis.get() {
            return Ok(kvis);
        }

        let mut kvis: Vec<KvisEntry> = self
            .record
            .culled_measurements(Series::KinematicViscosities)
            .into_iter()
            .map(KvisEntry::measured)
            .collect();

        for dvis in self.non_redundant_dvis() {
            let m_2_s = self.dvis_to_kvis(&dvis)?;
            debug!(
                ref_temp_k = dvis.ref_temp_k,
                weathering = dvis.weathering,
                m_2_s,
                "converted dynamic viscosity"
            );

            kvis.push(KvisEntry::estimated(Measurement { value: m_2_s, ..dvis }));
        }

        kvis.sort_by_key(KvisEntry::key);

        Ok(self.kvis.get_or_init(|| kvis))
    }

    /// Dynamic viscosities at states without a kinematic viscosity, sorted
    /// by weathering and then temperature.
    ///
    /// Duplicate dynamic viscosities at one state keep the last entry.
    #[must_use]
    pub fn non_redundant_dvis(&self) -> Vec<Measurement> {
        let kvis_keys: BTreeSet<MeasurementKey> = self
            .record
            .culled_measurements(Series::KinematicViscosities)
            .iter()
            .map(Measurement::key)
            .collect();

        let mut dvis: Vec<Measurement> = self
            .record
            .culled_measurements(Series::DynamicViscosities)
            .into_iter()
            .rev()
            .filter(|d| !kvis_keys.contains(&d.key()))
            .collect();

        dvis.sort_by_key(Measurement::key);
        dvis.dedup_by_key(|d| d.key());
        dvis
    }

    /// Kinematic viscosity at a temperature and weathering state, in m²/s.
    ///
    /// Shifts the entry nearest `temp_k` at that weathering. Returns `None`
    /// if there is no entry at that weathering.
    ///
    /// # Errors
    ///
    /// Returns an error if the viscosity series cannot be aggregated.
    pub fn kvis_at_temp(&self, temp_k: f64, weathering: f64) -> Result<Option<f64>, EstimationError> {
        let entries = self.kvis_at_weathering(weathering)?;

        Ok(selection::closest_to_temperature(&entries, temp_k)
            .map(|entry| self.shift_kvis(entry, temp_k)))
    }

    /// [`Self::kvis_at_temp`] for several temperatures.
    ///
    /// # Errors
    ///
    /// Returns an error if the viscosity series cannot be aggregated.
    pub fn kvis_at_temps(
        &self,
        temps_k: &[f64],
        weathering: f64,
    ) -> Result<Option<Vec<f64>>, EstimationError> {
        let entries = self.kvis_at_weathering(weathering)?;

        Ok(
            selection::closest_to_temperatures(&entries, temps_k).map(|closest| {
                closest
                    .iter()
                    .zip(temps_k)
                    .map(|(entry, &t)| self.shift_kvis(entry, t))
                    .collect()
            }),
        )
    }

    #[allow(clippy::float_cmp)]
    fn kvis_at_weathering(&self, weathering: f64) -> Result<Vec<&KvisEntry>, EstimationError> {
        Ok(self
            .aggregate_kvis()?
            .iter()
            .filter(|k| k.weathering == weathering)
            .collect())
    }

    fn shift_kvis(&self, entry: &KvisEntry, temp_k: f64) -> f64 {
        self.correlations()
            .viscosity
            .kvis_at_temp(entry.m_2_s, entry.ref_temp_k, temp_k)
    }

    /// Converts a dynamic viscosity using the density at its own temperature.
    ///
    /// The density is taken at the viscosity's weathering when the record has
    /// densities there, and for fresh oil otherwise.
    fn dvis_to_kvis(&self, dvis: &Measurement) -> Result<f64, EstimationError> {
        let weathering = if self.get_densities(dvis.weathering).is_empty() {
            0.0
        } else {
            dvis.weathering
        };

        let density = self.density_at_temp(dvis.ref_temp_k, weathering)?;

        Ok(self.correlations().viscosity.dvis_to_kvis(dvis.value, density))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use oilprops_record::{ImportedRecord, RawMeasurement};

    use crate::EstimatorConfig;

    #[test]
    fn dvis_converted_with_density_at_its_temperature() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = ImportedRecord::new("AD0010")
            .with_density(900.0, 288.15)
            .with_kvis(1e-4, 288.15)
            .with_dvis(0.05, 300.0);

        let estimator = Estimator::new(&record, &config);
        let kvis = estimator.aggregate_kvis()?;

        assert_eq!(kvis.len(), 2);
        assert!(!kvis[0].estimated);
        assert!(kvis[1].estimated);

        let density = estimator.density_at_temp(300.0, 0.0)?;
        assert_relative_eq!(kvis[1].m_2_s, 0.05 / density);
        assert_relative_eq!(kvis[1].ref_temp_k, 300.0);

        Ok(())
    }

    #[test]
    fn measured_kvis_wins_at_same_state() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = ImportedRecord::new("AD0011")
            .with_density(900.0, 288.15)
            .with_kvis(1e-4, 300.0)
            .with_dvis(0.5, 300.0)
            .with_measurement(
                Series::DynamicViscosities,
                RawMeasurement::new(0.6, 300.0).with_weathering(0.1),
            );

        let estimator = Estimator::new(&record, &config);

        let dvis = estimator.non_redundant_dvis();
        assert_eq!(dvis.len(), 1);
        assert_relative_eq!(dvis[0].weathering, 0.1);

        let kvis = estimator.aggregate_kvis()?;
        assert_eq!(kvis.len(), 2);
        assert_relative_eq!(kvis[0].m_2_s, 1e-4);
        assert_relative_eq!(kvis[1].weathering, 0.1);

        Ok(())
    }

    #[test]
    fn kvis_shifted_from_nearest_entry() -> Result<(), EstimationError> {
        let config = EstimatorConfig::default();
        let record = ImportedRecord::new("AD0012")
            .with_kvis(1e-4, 280.0)
            .with_kvis(5e-5, 300.0);

        let estimator = Estimator::new(&record, &config);
        let viscosity = &config.correlations.viscosity;

        assert_relative_eq!(
            estimator.kvis_at_temp(285.0, 0.0)?.unwrap(),
            viscosity.kvis_at_temp(1e-4, 280.0, 285.0)
        );
        assert_relative_eq!(
            estimator.kvis_at_temp(310.0, 0.0)?.unwrap(),
            viscosity.kvis_at_temp(5e-5, 300.0, 310.0)
        );

        let many = estimator.kvis_at_temps(&[280.0, 300.0], 0.0)?.unwrap();
        assert_relative_eq!(many[0], 1e-4);
        assert_relative_eq!(many[1], 5e-5);

        assert_eq!(estimator.kvis_at_temp(288.15, 0.2)?, None);
        assert_eq!(estimator.kvis_at_temps(&[288.15], 0.2)?, None);

        Ok(())
    }
}
