//! SARA (saturates, aromatics, resins, asphaltenes) correlations.
//!
//! Resin and asphaltene fractions are estimated from bulk density and
//! viscosity. Saturate and aromatic pseudo-components are characterized by
//! boiling point, and the split of a distillation cut between them follows
//! Riazi's refractive index correlations (eqs. 3.77 and 3.78), which hold
//! only for cuts lighter than [`SaraCorrelations::riazi_mol_wt_limit`].

use serde::{Deserialize, Serialize};

/// Constants for SARA fraction and pseudo-component property estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaraCorrelations {
    /// Molecular weight of the lumped resin component, in g/mol.
    pub resin_mol_wt: f64,

    /// Molecular weight of the lumped asphaltene component, in g/mol.
    pub asphaltene_mol_wt: f64,

    /// Density of the lumped resin component, in kg/m³.
    pub resin_density: f64,

    /// Density of the lumped asphaltene component, in kg/m³.
    pub asphaltene_density: f64,

    /// Boiling point assigned to the lumped resin and asphaltene components, in K.
    pub lumped_boiling_point: f64,

    /// Watson characterization factor for saturates.
    pub saturate_watson_k: f64,

    /// Watson characterization factor for aromatics.
    pub aromatic_watson_k: f64,

    /// Average molecular weight at or above which Riazi's split is invalid, in g/mol.
    pub riazi_mol_wt_limit: f64,
}

impl Default for SaraCorrelations {
    fn default() -> Self {
        Self {
            resin_mol_wt: 800.0,
            asphaltene_mol_wt: 1000.0,
            resin_density: 1100.0,
            asphaltene_density: 1100.0,
            lumped_boiling_point: 1015.0,
            saturate_watson_k: 12.0,
            aromatic_watson_k: 10.0,
            riazi_mol_wt_limit: 200.0,
        }
    }
}

impl SaraCorrelations {
    /// Estimates the resin fraction from density and kinematic viscosity at 15 °C.
    ///
    /// The result is limited to the mass not already claimed by `f_other`.
    #[must_use]
    pub fn resin_fraction(&self, density: f64, kvis: f64, f_other: f64) -> f64 {
        let a = Self::density_term(density);
        let b = Self::viscosity_term(density, kvis);

        clip(0.033 * a + 0.000_87 * b - 0.74, 1.0 - f_other)
    }

    /// Estimates the asphaltene fraction from density and kinematic viscosity at 15 °C.
    ///
    /// The result is limited to the mass not already claimed by `f_other`,
    /// usually the resin fraction.
    #[must_use]
    pub fn asphaltene_fraction(&self, density: f64, kvis: f64, f_other: f64) -> f64 {
        let a = Self::density_term(density);
        let b = Self::viscosity_term(density, kvis);

        clip(0.000_014 * a.powi(3) + 0.000_004 * b.powi(2) - 0.18, 1.0 - f_other)
    }

    /// Molecular weight of a saturate pseudo-component boiling at `boiling_point`, in g/mol.
    #[must_use]
    pub fn saturate_mol_wt(&self, boiling_point: f64) -> f64 {
        (49.677 * (6.982_91 - (1070.0 - boiling_point).ln())).powf(1.5)
    }

    /// Molecular weight of an aromatic pseudo-component boiling at `boiling_point`, in g/mol.
    #[must_use]
    pub fn aromatic_mol_wt(&self, boiling_point: f64) -> f64 {
        (44.504 * (6.914_69 - (1015.0 - boiling_point).ln())).powf(1.5)
    }

    /// Trial density of a saturate pseudo-component, in kg/m³.
    #[must_use]
    pub fn saturate_density(&self, boiling_point: f64) -> f64 {
        trial_density(boiling_point, self.saturate_watson_k)
    }

    /// Trial density of an aromatic pseudo-component, in kg/m³.
    #[must_use]
    pub fn aromatic_density(&self, boiling_point: f64) -> f64 {
        trial_density(boiling_point, self.aromatic_watson_k)
    }

    /// Whether Riazi's split holds for a cut of the given average molecular weight.
    #[must_use]
    pub fn riazi_applies(&self, avg_mol_wt: f64) -> bool {
        avg_mol_wt < self.riazi_mol_wt_limit
    }

    /// Saturate share of a cut from its average molecular weight and specific gravity.
    ///
    /// Combines the paraffinic and naphthenic fractions predicted from the
    /// refractive index, clipped to `[0, fmass]`.
    #[must_use]
    pub fn saturate_mass_fraction(
        &self,
        fmass: f64,
        avg_mol_wt: f64,
        avg_sg: f64,
        boiling_point: f64,
    ) -> f64 {
        let ri = refractive_index(boiling_point, avg_sg);
        let m = avg_mol_wt * (ri - 1.475);

        let x_p = 3.7387 - 4.0829 * avg_sg + 0.014_772 * m;
        let x_n = -1.5027 + 2.101_52 * avg_sg - 0.023_88 * m;

        clip(fmass * (x_p + x_n), fmass)
    }

    fn density_term(density: f64) -> f64 {
        10.0 * (0.001 * density).exp()
    }

    fn viscosity_term(density: f64, kvis: f64) -> f64 {
        10.0 * (1000.0 * density * kvis).ln()
    }
}

/// Density from boiling point and Watson factor, `ρ = 1000·(1.8·T)^(1/3)/K_w`.
#[must_use]
pub fn trial_density(boiling_point: f64, watson_k: f64) -> f64 {
    1000.0 * (1.8 * boiling_point).cbrt() / watson_k
}

/// Refractive index of a petroleum fraction from its boiling point and specific gravity.
#[must_use]
pub fn refractive_index(boiling_point: f64, sg: f64) -> f64 {
    let i = 0.3773 * boiling_point.powf(-0.022_69) * sg.powf(0.9182);

    ((1.0 + 2.0 * i) / (1.0 - i)).sqrt()
}

/// Clips to `[0, upper]`, treating a negative upper bound as zero.
fn clip(value: f64, upper: f64) -> f64 {
    value.clamp(0.0, upper.max(0.0))
}
