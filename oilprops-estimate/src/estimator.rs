//! Gap-filling estimation over any [`RecordSource`].
//!
//! An [`Estimator`] borrows one record and answers property queries, each
//! preferring measured data and falling back to correlations. Intermediate
//! results that several properties depend on (the aggregated kinematic
//! viscosity series and the normalized distillation cuts) are computed once
//! per estimator.

mod components;
mod density;
mod distillation;
mod properties;
mod viscosity;

use std::cell::OnceCell;

use oilprops_correlations::CorrelationSet;
use oilprops_record::{Cut, RecordSource};
use serde::{Deserialize, Serialize};

use crate::{EstimatorConfig, KvisEntry};

pub use components::{PseudoComponent, SaraType};

/// A property value and whether it came from a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate<T> {
    pub value: T,
    pub estimated: bool,
}

impl<T> Estimate<T> {
    #[must_use]
    pub fn measured(value: T) -> Self {
        Self {
            value,
            estimated: false,
        }
    }

    #[must_use]
    pub fn estimated(value: T) -> Self {
        Self {
            value,
            estimated: true,
        }
    }
}

/// Lower and upper bounds of a temperature range, either possibly unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_k: Option<f64>,
    pub max_k: Option<f64>,
}

impl Bounds {
    /// Known bounds, lower first.
    pub fn iter(&self) -> impl Iterator<Item = f64> {
        self.min_k.into_iter().chain(self.max_k)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_k.is_none() && self.max_k.is_none()
    }
}

/// An interfacial tension in N/m at its reference temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterfacialTension {
    pub n_m: f64,
    pub ref_temp_k: f64,
}

/// Resin and asphaltene mass fractions, the components that never distill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertFractions {
    pub resins: f64,
    pub asphaltenes: f64,

    /// Whether either fraction was estimated.
    pub estimated: bool,
}

impl InertFractions {
    /// Mass left over for the distillable saturates and aromatics.
    #[must_use]
    pub fn distillable(&self) -> f64 {
        1.0 - self.resins - self.asphaltenes
    }
}

/// Estimates the properties of one oil record.
///
/// Estimators are cheap to create and hold only borrowed inputs, so records
/// can be estimated independently on separate threads.
pub struct Estimator<'a, S: RecordSource + ?Sized> {
    record: &'a S,
    config: &'a EstimatorConfig,
    kvis: OnceCell<Vec<KvisEntry>>,
    cuts: OnceCell<Vec<Cut>>,
}

impl<'a, S: RecordSource + ?Sized> Estimator<'a, S> {
    #[must_use]
    pub fn new(record: &'a S, config: &'a EstimatorConfig) -> Self {
        Self {
            record,
            config,
            kvis: OnceCell::new(),
            cuts: OnceCell::new(),
        }
    }

    /// The record being estimated.
    #[must_use]
    pub fn record(&self) -> &'a S {
        self.record
    }

    #[must_use]
    pub fn config(&self) -> &'a EstimatorConfig {
        self.config
    }

    fn correlations(&self) -> &'a CorrelationSet {
        &self.config.correlations
    }
}
