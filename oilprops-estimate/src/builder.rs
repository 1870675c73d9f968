//! Building a validated [`OilRecord`] from a laboratory record.
//!
//! A record moves through three typed stages:
//!
//! 1. [`Draft`]: the raw record, screened for the data estimation needs.
//! 2. [`Screened`]: a record known to be estimable, whose gaps are filled
//!    by an [`Estimator`].
//! 3. [`Estimated`]: a complete record, checked for implausible results
//!    before it is accepted.
//!
//! Screening and validation collect every problem they find, so a rejection
//! lists all of its reasons.

use std::collections::HashSet;
use std::fmt;

use oilprops_correlations::REFERENCE_TEMP_K;
use oilprops_record::{ProductType, RecordSource, Scalar, Series, Text};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    EstimatedFlags, EstimationError, Estimator, EstimatorConfig, OilRecord, SaraType, score,
};

/// The result of estimating one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accepted(OilRecord),
    Rejected(Rejection),
}

impl Outcome {
    /// The accepted record, if any.
    #[must_use]
    pub fn accepted(self) -> Option<OilRecord> {
        match self {
            Self::Accepted(oil) => Some(oil),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// A record that failed screening or validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub record_id: Option<String>,
    pub reasons: Vec<RejectionReason>,
}

impl Rejection {
    /// Whether `reason` is among the reasons for rejection.
    #[must_use]
    pub fn has(&self, reason: &RejectionReason) -> bool {
        self.reasons.contains(reason)
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {} rejected: ", self.record_id.as_deref().unwrap_or("<unknown>"))?;

        for (i, reason) in self.reasons.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{reason}")?;
        }

        Ok(())
    }
}

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RejectionReason {
    #[error("manually rejected")]
    ManuallyRejected,

    #[error("no record identifier")]
    MissingRecordId,

    #[error("no product type")]
    NoProductType,

    #[error("no density information")]
    NoDensityInformation,

    #[error("no viscosity information")]
    NoViscosityInformation,

    #[error("insufficient cut data")]
    InsufficientCuts,

    #[error("no kinematic viscosities")]
    NoKinematicViscosities,

    #[error("duplicate cuts")]
    DuplicateCuts,

    #[error("cuts do not form a distillation curve")]
    NonMonotonicCuts,

    #[error("{sara_type:?} component has negative mass fraction {mass_fraction}")]
    NegativeMassFraction {
        sara_type: SaraType,
        mass_fraction: f64,
    },

    #[error("{sara_type:?} component density {density} kg/m³ exceeds {limit} kg/m³")]
    HeavyComponent {
        sara_type: SaraType,
        density: f64,
        limit: f64,
    },

    #[error("API gravity {api} does not match {from_density} from density")]
    ApiMismatch { api: f64, from_density: f64 },

    #[error("component mass fractions sum to {sum}")]
    MassFractionsNotClosed { sum: f64 },
}

/// Estimates a record and validates the result.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or an estimate fails on
/// data that passed screening. Records that fail screening or validation are
/// returned as [`Outcome::Rejected`].
pub fn estimate<S: RecordSource + ?Sized>(
    record: &S,
    config: &EstimatorConfig,
) -> Result<Outcome, EstimationError> {
    config.validate()?;

    let screened = match Draft::new(record, config).screen() {
        Ok(screened) => screened,
        Err(rejection) => return Ok(Outcome::Rejected(rejection)),
    };

    Ok(screened.estimate()?.validate())
}

/// A record not yet checked for estimability.
pub struct Draft<'a, S: RecordSource + ?Sized> {
    record: &'a S,
    config: &'a EstimatorConfig,
}

impl<'a, S: RecordSource + ?Sized> Draft<'a, S> {
    #[must_use]
    pub fn new(record: &'a S, config: &'a EstimatorConfig) -> Self {
        Self { record, config }
    }

    /// Checks that the record has the data estimation needs.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] listing every missing requirement.
    pub fn screen(self) -> Result<Screened<'a, S>, Rejection> {
        let record = self.record;
        let record_id = record.text(Text::RecordId).map(|id| id.into_owned());
        let product_type = record.product_type();

        let mut reasons = Vec::new();

        match &record_id {
            None => reasons.push(RejectionReason::MissingRecordId),
            Some(id) if self.config.validation.is_manually_rejected(id) => {
                reasons.push(RejectionReason::ManuallyRejected);
            }
            Some(_) => {}
        }

        if product_type.is_none() {
            reasons.push(RejectionReason::NoProductType);
        }

        let has_api = record.scalar(Scalar::Api).is_some();
        let has_densities = !record.culled_measurements(Series::Densities).is_empty();
        if !has_api && !has_densities {
            reasons.push(RejectionReason::NoDensityInformation);
        }

        let has_viscosities = !record
            .culled_measurements(Series::KinematicViscosities)
            .is_empty()
            || !record
                .culled_measurements(Series::DynamicViscosities)
                .is_empty();
        if !has_viscosities {
            reasons.push(RejectionReason::NoViscosityInformation);
        }

        let enough_cuts = record.culled_cuts().len() >= 3;
        let cuts_estimable = match product_type {
            Some(ProductType::Crude) => enough_cuts || has_api || has_densities,
            _ => enough_cuts,
        };
        if !cuts_estimable {
            reasons.push(RejectionReason::InsufficientCuts);
        }

        match (record_id, product_type) {
            (Some(record_id), Some(product_type)) if reasons.is_empty() => Ok(Screened {
                record: self.record,
                config: self.config,
                record_id,
                product_type,
            }),
            (record_id, _) => Err(Rejection { record_id, reasons }),
        }
    }
}

/// A record with everything estimation needs.
pub struct Screened<'a, S: RecordSource + ?Sized> {
    record: &'a S,
    config: &'a EstimatorConfig,
    record_id: String,
    product_type: ProductType,
}

impl<'a, S: RecordSource + ?Sized> Screened<'a, S> {
    /// Fills every property of the record from measurements or correlations.
    ///
    /// # Errors
    ///
    /// Returns an error if a property cannot be estimated.
    pub fn estimate(self) -> Result<Estimated<'a>, EstimationError> {
        info!(record = %self.record_id, "estimating oil properties");

        let record = self.record;
        let estimator = Estimator::new(record, self.config);

        let measured_api = record.scalar(Scalar::Api);
        let api = estimator.require_api()?;
        let densities = estimator.get_densities(0.0);
        let kvis = estimator.aggregate_kvis()?.to_vec();

        let inert = estimator.inert_fractions()?;
        let cuts = estimator.normalized_cuts()?.to_vec();
        let components = estimator.pseudo_components()?;

        let sum_of = |sara_type: SaraType| -> f64 {
            components
                .iter()
                .filter(|c| c.sara_type == sara_type)
                .map(|c| c.mass_fraction)
                .sum()
        };
        let saturates_fraction = sum_of(SaraType::Saturates);
        let aromatics_fraction = sum_of(SaraType::Aromatics);

        let pour_point = estimator.pour_point()?;
        let flash_point = estimator.flash_point()?;
        let oil_water_tension = estimator.oil_water_surface_tension()?;
        let oil_seawater_tension = estimator.oil_seawater_surface_tension();
        let emulsion_water_fraction_max = estimator.max_water_fraction_emulsion();
        let bullwinkle_fraction = estimator.bullwinkle_fraction()?;
        let solubility = estimator.solubility();
        let adhesion = estimator.adhesion();
        let sulphur_fraction = estimator.sulphur_fraction();
        let k0y = estimator.k0y();

        let estimated = EstimatedFlags {
            api: measured_api.is_none(),
            viscosities: kvis.iter().any(|k| k.estimated),
            inert_fractions: inert.estimated,
            cuts: record.culled_cuts().len() < 2,
            pour_point: pour_point.estimated,
            flash_point: flash_point.estimated,
            oil_water_tension: oil_water_tension.estimated,
            oil_seawater_tension: false,
            emulsion_water_fraction_max: emulsion_water_fraction_max.estimated,
            bullwinkle_fraction: bullwinkle_fraction.estimated,
            adhesion: adhesion.estimated,
            sulphur_fraction: sulphur_fraction.estimated,
            solubility: solubility.estimated,
            k0y: k0y.estimated,
        };

        debug!(record = %self.record_id, ?estimated, "estimation complete");

        let oil = OilRecord {
            record_id: self.record_id,
            name: record.text(Text::Name).map(|n| n.into_owned()),
            product_type: self.product_type,
            reference: record.text(Text::Reference).map(|r| r.into_owned()),
            api,
            densities,
            kvis,
            resins_fraction: inert.resins,
            asphaltenes_fraction: inert.asphaltenes,
            saturates_fraction,
            aromatics_fraction,
            cuts,
            components,
            pour_point: pour_point.value,
            flash_point: flash_point.value,
            oil_water_tension: oil_water_tension.value,
            oil_seawater_tension,
            emulsion_water_fraction_max: emulsion_water_fraction_max.value,
            bullwinkle_fraction: bullwinkle_fraction.value,
            solubility: solubility.value,
            adhesion_kg_m_2: adhesion.value,
            sulphur_fraction: sulphur_fraction.value,
            nickel_ppm: record.scalar(Scalar::Nickel),
            vanadium_ppm: record.scalar(Scalar::Vanadium),
            k0y: k0y.value,
            polars_fraction: record.scalar(Scalar::Polars),
            benzene_fraction: record.scalar(Scalar::Benzene),
            paraffins_fraction: record.scalar(Scalar::Paraffins),
            wax_content: record.scalar(Scalar::WaxContent),
            estimated,
            quality_index: score(record),
        };

        Ok(Estimated {
            oil,
            config: self.config,
        })
    }
}

/// A fully estimated record awaiting validation.
pub struct Estimated<'a> {
    oil: OilRecord,
    config: &'a EstimatorConfig,
}

impl Estimated<'_> {
    /// The estimated record, before validation.
    #[must_use]
    pub fn oil(&self) -> &OilRecord {
        &self.oil
    }

    /// Accepts the record unless its estimates are implausible.
    #[must_use]
    pub fn validate(self) -> Outcome {
        let reasons = self.problems();

        if reasons.is_empty() {
            Outcome::Accepted(self.oil)
        } else {
            Outcome::Rejected(Rejection {
                record_id: Some(self.oil.record_id),
                reasons,
            })
        }
    }

    fn problems(&self) -> Vec<RejectionReason> {
        let oil = &self.oil;
        let validation = &self.config.validation;

        let mut reasons = Vec::new();

        if oil.kvis.is_empty() {
            reasons.push(RejectionReason::NoKinematicViscosities);
        }

        let mut temps = HashSet::new();
        if !oil.cuts.iter().all(|c| temps.insert(c.vapor_temp_k.to_bits())) {
            reasons.push(RejectionReason::DuplicateCuts);
        }

        let in_range = oil.cuts.iter().all(|c| (0.0..=1.0).contains(&c.fraction));
        let ascending = oil.cuts.windows(2).all(|pair| {
            pair[1].vapor_temp_k >= pair[0].vapor_temp_k && pair[1].fraction >= pair[0].fraction
        });
        if !in_range || !ascending {
            reasons.push(RejectionReason::NonMonotonicCuts);
        }

        if let Some(negative) = oil.components.iter().find(|c| c.mass_fraction < 0.0) {
            reasons.push(RejectionReason::NegativeMassFraction {
                sara_type: negative.sara_type,
                mass_fraction: negative.mass_fraction,
            });
        }

        let limit = oil
            .components
            .iter()
            .find(|c| c.sara_type == SaraType::Resins)
            .map_or(validation.sa_density_floor, |resins| {
                resins.density.max(validation.sa_density_floor)
            });

        if let Some(heavy) = oil
            .components
            .iter()
            .find(|c| c.sara_type.is_distillable() && c.density > limit)
        {
            reasons.push(RejectionReason::HeavyComponent {
                sara_type: heavy.sara_type,
                density: heavy.density,
                limit,
            });
        }

        // Checked against the finished record, as a consumer would see it.
        match Estimator::new(oil, self.config).density_at_temp(REFERENCE_TEMP_K, 0.0) {
            Ok(density) => {
                let from_density = self.config.correlations.density.api_from_density(density);
                if !validation.api_matches(oil.api, from_density) {
                    reasons.push(RejectionReason::ApiMismatch {
                        api: oil.api,
                        from_density,
                    });
                }
            }
            Err(_) => reasons.push(RejectionReason::NoDensityInformation),
        }

        let sum: f64 = oil.components.iter().map(|c| c.mass_fraction).sum();
        if !validation.mass_fractions_close(sum) {
            reasons.push(RejectionReason::MassFractionsNotClosed { sum });
        }

        reasons
    }
}
