use oilprops_correlations::REFERENCE_TEMP_K;
use oilprops_record::{Measurement, RecordSource, Scalar, Series, selection};
use tracing::debug;

use super::Estimator;
use crate::EstimationError;

impl<S: RecordSource + ?Sized> Estimator<'_, S> {
    /// Densities at a weathering state, sorted by reference temperature.
    ///
    /// For fresh oil with a known API gravity and no measurement at 15 °C,
    /// the density implied by the API gravity is included.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn get_densities(&self, weathering: f64) -> Vec<Measurement> {
        let mut densities: Vec<Measurement> = self
            .record
            .culled_measurements(Series::Densities)
            .into_iter()
            .filter(|d| d.weathering == weathering)
            .collect();

        if weathering == 0.0
            && let Some(api) = self.record.scalar(Scalar::Api)
            && !densities.iter().any(|d| d.ref_temp_k == REFERENCE_TEMP_K)
        {
            let (kg_m_3, ref_temp_k) = self.correlations().density.density_from_api(api);
            debug!(api, kg_m_3, "added density implied by API gravity");

            densities.push(Measurement::new(kg_m_3, ref_temp_k, 0.0));
        }

        densities.sort_by(|a, b| a.ref_temp_k.total_cmp(&b.ref_temp_k));
        densities
    }

    /// Oil density at a temperature and weathering state, in kg/m³.
    ///
    /// Temperatures below the pour point or the coldest measurement are
    /// raised to it. Between two measurements the expansion coefficient is
    /// taken from those measurements; outside them it is the default for the
    /// oil's API gravity.
    ///
    /// # Errors
    ///
    /// Returns [`EstimationError::NoDensityInformation`] if the record has no
    /// densities at `weathering`, or an error if estimating the pour point fails.
    pub fn density_at_temp(&self, temp_k: f64, weathering: f64) -> Result<f64, EstimationError> {
        let densities = self.get_densities(weathering);
        if densities.is_empty() {
            return Err(EstimationError::NoDensityInformation { weathering });
        }

        let floor = self.density_floor(&densities)?;

        self.density_from(&densities, temp_k.max(floor), weathering)
    }

    /// [`Self::density_at_temp`] for several temperatures.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Self::density_at_temp`].
    pub fn densities_at_temps(
        &self,
        temps_k: &[f64],
        weathering: f64,
    ) -> Result<Vec<f64>, EstimationError> {
        let densities = self.get_densities(weathering);
        if densities.is_empty() {
            return Err(EstimationError::NoDensityInformation { weathering });
        }

        let floor = self.density_floor(&densities)?;

        temps_k
            .iter()
            .map(|&t| self.density_from(&densities, t.max(floor), weathering))
            .collect()
    }

    /// The oil's API gravity, measured or implied by its density at 15 °C.
    ///
    /// Returns `None` when the record has neither.
    ///
    /// # Errors
    ///
    /// Returns an error if the density at 15 °C cannot be estimated.
    pub fn get_api(&self) -> Result<Option<f64>, EstimationError> {
        if let Some(api) = self.record.scalar(Scalar::Api) {
            return Ok(Some(api));
        }

        if self.get_densities(0.0).is_empty() {
            return Ok(None);
        }

        let density = self.density_at_temp(REFERENCE_TEMP_K, 0.0)?;
        Ok(Some(self.correlations().density.api_from_density(density)))
    }

    /// API gravity, failing when the record carries no density information.
    pub(crate) fn require_api(&self) -> Result<f64, EstimationError> {
        self.get_api()?
            .ok_or(EstimationError::NoDensityInformation { weathering: 0.0 })
    }

    /// The coldest temperature a density is evaluated at.
    ///
    /// A record with dynamic viscosities and no measured pour point has no
    /// floor, since estimating its pour point would need its density.
    fn density_floor(&self, densities: &[Measurement]) -> Result<f64, EstimationError> {
        let measured = [
            self.record.scalar(Scalar::PourPointMinK),
            self.record.scalar(Scalar::PourPointMaxK),
        ];

        let pour_points: Vec<f64> = if measured.iter().any(Option::is_some) {
            measured.into_iter().flatten().collect()
        } else if !self
            .record
            .measurements(Series::DynamicViscosities)
            .is_empty()
        {
            return Ok(0.0);
        } else {
            self.estimated_pour_point_k()?.into_iter().collect()
        };

        Ok(densities
            .iter()
            .map(|d| d.ref_temp_k)
            .chain(pour_points)
            .fold(f64::INFINITY, f64::min))
    }

    fn density_from(
        &self,
        densities: &[Measurement],
        temp_k: f64,
        weathering: f64,
    ) -> Result<f64, EstimationError> {
        let (lower, upper) = selection::bounding_temperatures(densities, temp_k)
            .ok_or(EstimationError::NoDensityInformation { weathering })?;

        let above = temp_k > lower.ref_temp_k && temp_k > upper.ref_temp_k;
        let below = temp_k < lower.ref_temp_k && temp_k < upper.ref_temp_k;

        let reference = if above { upper } else { lower };

        let density = &self.correlations().density;
        let k_rho_t = if above || below {
            density.default_expansion_coeff(self.record.scalar(Scalar::Api))
        } else {
            density.vol_expansion_coeff(
                lower.value,
                lower.ref_temp_k,
                upper.value,
                upper.ref_temp_k,
            )
        };

        let rho = density.density_at_temp(reference.value, reference.ref_temp_k, temp_k, k_rho_t);
        if !rho.is_finite() || rho <= 0.0 {
            return Err(EstimationError::NonPhysical {
                quantity: "density",
                value: rho,
            });
        }

        Ok(rho)
    }
}
