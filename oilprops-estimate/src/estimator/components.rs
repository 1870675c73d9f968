//! Pseudo-components: the saturate and aromatic split of each distillation
//! cut, followed by the lumped resins and asphaltenes.

use oilprops_correlations::REFERENCE_TEMP_K;
use oilprops_record::RecordSource;
use serde::{Deserialize, Serialize};

use super::Estimator;
use crate::EstimationError;

/// SARA class of a pseudo-component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaraType {
    Saturates,
    Aromatics,
    Resins,
    Asphaltenes,
}

impl SaraType {
    #[must_use]
    pub fn is_distillable(self) -> bool {
        matches!(self, Self::Saturates | Self::Aromatics)
    }
}

/// A lumped fraction of the oil with uniform properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PseudoComponent {
    pub sara_type: SaraType,
    pub boiling_point_k: f64,
    pub mass_fraction: f64,

    /// Density in kg/m³, scaled to match the oil's density at 15 °C.
    pub density: f64,

    /// Molecular weight in g/mol.
    pub molecular_weight: f64,
}

impl<S: RecordSource + ?Sized> Estimator<'_, S> {
    /// Boiling point of each component: every cut temperature twice, then
    /// the lumped boiling point for resins and for asphaltenes.
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts cannot be normalized.
    pub fn component_temps(&self) -> Result<Vec<f64>, EstimationError> {
        let lumped = self.correlations().sara.lumped_boiling_point;

        Ok(self
            .cut_temps()?
            .into_iter()
            .flat_map(|t| [t, t])
            .chain([lumped, lumped])
            .collect())
    }

    /// SARA class of each component, in the order of [`Self::component_temps`].
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts cannot be normalized.
    pub fn component_types(&self) -> Result<Vec<SaraType>, EstimationError> {
        let cuts = self.normalized_cuts()?.len();

        Ok([SaraType::Saturates, SaraType::Aromatics]
            .into_iter()
            .cycle()
            .take(2 * cuts)
            .chain([SaraType::Resins, SaraType::Asphaltenes])
            .collect())
    }

    /// Molecular weight of each component, in g/mol.
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts cannot be normalized.
    pub fn component_mol_wt(&self) -> Result<Vec<f64>, EstimationError> {
        let sara = &self.correlations().sara;

        Ok(self
            .cut_temps()?
            .into_iter()
            .flat_map(|t| [sara.saturate_mol_wt(t), sara.aromatic_mol_wt(t)])
            .chain([sara.resin_mol_wt, sara.asphaltene_mol_wt])
            .collect())
    }

    /// Unscaled trial density of each component, in kg/m³.
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts cannot be normalized.
    pub fn component_densities(&self) -> Result<Vec<f64>, EstimationError> {
        let sara = &self.correlations().sara;

        Ok(self
            .cut_temps()?
            .into_iter()
            .flat_map(|t| [sara.saturate_density(t), sara.aromatic_density(t)])
            .chain([sara.resin_density, sara.asphaltene_density])
            .collect())
    }

    /// Specific gravity of each component's trial density.
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts cannot be normalized.
    pub fn component_specific_gravity(&self) -> Result<Vec<f64>, EstimationError> {
        let density = &self.correlations().density;

        Ok(self
            .component_densities()?
            .into_iter()
            .map(|rho| density.specific_gravity(rho))
            .collect())
    }

    /// Mass fraction of each component.
    ///
    /// Each cut starts split evenly between saturates and aromatics, and the
    /// split is refined a fixed number of times with Riazi's correlation for
    /// the cut's average molecular weight and specific gravity. Cuts too
    /// heavy for the correlation keep the split of the last cut it applied
    /// to, or an even split if it applied to none.
    ///
    /// # Errors
    ///
    /// Returns an error if the inert fractions or cuts cannot be determined.
    pub fn component_mass_fractions(&self) -> Result<Vec<f64>, EstimationError> {
        let inert = self.inert_fractions()?;
        let temps = self.cut_temps()?;
        let fmasses = self.cut_fmasses()?;

        let mut saturates: Vec<f64> = fmasses.iter().map(|f| f / 2.0).collect();

        for _ in 0..self.config.mass_fraction_iterations {
            saturates = self.refine_saturates(&temps, &fmasses, &saturates);
        }

        Ok(saturates
            .iter()
            .zip(&fmasses)
            .flat_map(|(&sat, &fmass)| [sat, fmass - sat])
            .chain([inert.resins, inert.asphaltenes])
            .collect())
    }

    /// Component densities scaled so their mass-weighted mean is the oil's
    /// density at 15 °C.
    ///
    /// # Errors
    ///
    /// Returns an error if the mass fractions or densities cannot be
    /// estimated, the two tables differ in length, or the scale is not finite.
    pub fn scaled_component_densities(&self) -> Result<Vec<f64>, EstimationError> {
        let fractions = self.component_mass_fractions()?;
        let densities = self.component_densities()?;

        if fractions.len() != densities.len() {
            return Err(EstimationError::ComponentLengthMismatch {
                fractions: fractions.len(),
                densities: densities.len(),
            });
        }

        let oil_density = self.density_at_temp(REFERENCE_TEMP_K, 0.0)?;
        let mixture: f64 = fractions.iter().zip(&densities).map(|(f, rho)| f * rho).sum();

        let scale = oil_density / mixture;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EstimationError::NonPhysical {
                quantity: "component density scale",
                value: scale,
            });
        }

        Ok(densities.into_iter().map(|rho| rho * scale).collect())
    }

    /// All pseudo-components, saturate and aromatic pairs first.
    ///
    /// # Errors
    ///
    /// Returns an error if any component table cannot be estimated.
    pub fn pseudo_components(&self) -> Result<Vec<PseudoComponent>, EstimationError> {
        let types = self.component_types()?;
        let temps = self.component_temps()?;
        let fractions = self.component_mass_fractions()?;
        let densities = self.scaled_component_densities()?;
        let mol_wts = self.component_mol_wt()?;

        Ok(types
            .into_iter()
            .zip(temps)
            .zip(fractions)
            .zip(densities)
            .zip(mol_wts)
            .map(
                |((((sara_type, boiling_point_k), mass_fraction), density), molecular_weight)| {
                    PseudoComponent {
                        sara_type,
                        boiling_point_k,
                        mass_fraction,
                        density,
                        molecular_weight,
                    }
                },
            )
            .collect())
    }

    /// Vapor pressure of each component at `temp_k`, in Pa.
    ///
    /// # Errors
    ///
    /// Returns an error if the cuts cannot be normalized.
    pub fn vapor_pressures(&self, temp_k: f64) -> Result<Vec<f64>, EstimationError> {
        let misc = &self.correlations().misc;

        self.component_temps()?
            .into_iter()
            .map(|bp| misc.vapor_pressure(bp, temp_k).map_err(EstimationError::from))
            .collect()
    }

    /// One refinement of the saturate share of every cut.
    fn refine_saturates(&self, temps: &[f64], fmasses: &[f64], saturates: &[f64]) -> Vec<f64> {
        let sara = &self.correlations().sara;
        let density = &self.correlations().density;

        // Riazi's estimate for each cut, or `None` where it does not apply.
        let proposed: Vec<Option<f64>> = temps
            .iter()
            .zip(fmasses)
            .zip(saturates)
            .map(|((&t, &fmass), &sat)| {
                if fmass <= 0.0 {
                    return Some(0.0);
                }

                let arom = fmass - sat;
                let avg_mol_wt =
                    (sara.saturate_mol_wt(t) * sat + sara.aromatic_mol_wt(t) * arom) / fmass;
                let avg_sg = (density.specific_gravity(sara.saturate_density(t)) * sat
                    + density.specific_gravity(sara.aromatic_density(t)) * arom)
                    / fmass;

                sara.riazi_applies(avg_mol_wt)
                    .then(|| sara.saturate_mass_fraction(fmass, avg_mol_wt, avg_sg, t))
            })
            .collect();

        let scale = proposed
            .iter()
            .zip(fmasses)
            .rev()
            .find_map(|(sat, &fmass)| sat.filter(|_| fmass > 0.0).map(|sat| sat / fmass))
            .unwrap_or(0.5);

        proposed
            .into_iter()
            .zip(fmasses)
            .map(|(sat, &fmass)| sat.unwrap_or(fmass * scale))
            .collect()
    }
}
