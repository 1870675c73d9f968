//! The finished, self-consistent oil record.

use std::borrow::Cow;

use oilprops_record::{
    Cut, Measurement, MeasurementKey, ProductType, RawCut, RawMeasurement, RecordSource,
    ReferenceTemperature, Scalar, Series, Text,
};
use serde::{Deserialize, Serialize};

use crate::{Bounds, InterfacialTension, PseudoComponent};

/// A kinematic viscosity, measured or converted from a dynamic viscosity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KvisEntry {
    pub m_2_s: f64,
    pub ref_temp_k: f64,
    pub weathering: f64,
    pub estimated: bool,
}

impl KvisEntry {
    #[must_use]
    pub fn measured(m: Measurement) -> Self {
        Self {
            m_2_s: m.value,
            ref_temp_k: m.ref_temp_k,
            weathering: m.weathering,
            estimated: false,
        }
    }

    #[must_use]
    pub fn estimated(m: Measurement) -> Self {
        Self {
            estimated: true,
            ..Self::measured(m)
        }
    }

    #[must_use]
    pub fn key(&self) -> MeasurementKey {
        self.measurement().key()
    }

    #[must_use]
    pub fn measurement(&self) -> Measurement {
        Measurement::new(self.m_2_s, self.ref_temp_k, self.weathering)
    }
}

impl ReferenceTemperature for KvisEntry {
    fn ref_temp_k(&self) -> f64 {
        self.ref_temp_k
    }
}

/// Which fields of an [`OilRecord`] came from correlations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct EstimatedFlags {
    pub api: bool,
    pub viscosities: bool,
    pub inert_fractions: bool,
    pub cuts: bool,
    pub pour_point: bool,
    pub flash_point: bool,
    pub oil_water_tension: bool,
    pub oil_seawater_tension: bool,
    pub emulsion_water_fraction_max: bool,
    pub bullwinkle_fraction: bool,
    pub adhesion: bool,
    pub sulphur_fraction: bool,
    pub solubility: bool,
    pub k0y: bool,
}

/// An oil record with every property required for spill modeling.
///
/// Built only by [`estimate`](crate::estimate), which accepts it after
/// validation. Measured values are carried over and the gaps are filled by
/// correlation, as recorded in [`OilRecord::estimated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilRecord {
    pub record_id: String,
    pub name: Option<String>,
    pub product_type: ProductType,
    pub reference: Option<String>,

    pub api: f64,
    pub densities: Vec<Measurement>,
    pub kvis: Vec<KvisEntry>,

    pub resins_fraction: f64,
    pub asphaltenes_fraction: f64,
    pub saturates_fraction: f64,
    pub aromatics_fraction: f64,

    pub cuts: Vec<Cut>,
    pub components: Vec<PseudoComponent>,

    pub pour_point: Bounds,
    pub flash_point: Bounds,

    pub oil_water_tension: InterfacialTension,
    pub oil_seawater_tension: Option<InterfacialTension>,

    pub emulsion_water_fraction_max: f64,
    pub bullwinkle_fraction: f64,

    pub solubility: f64,
    pub adhesion_kg_m_2: f64,
    pub sulphur_fraction: f64,
    pub nickel_ppm: Option<f64>,
    pub vanadium_ppm: Option<f64>,
    pub k0y: f64,

    pub polars_fraction: Option<f64>,
    pub benzene_fraction: Option<f64>,
    pub paraffins_fraction: Option<f64>,
    pub wax_content: Option<f64>,

    pub estimated: EstimatedFlags,

    /// Completeness of the source record, in `[0, 1]`.
    pub quality_index: f64,
}

impl RecordSource for OilRecord {
    fn measurements(&self, series: Series) -> Cow<'_, [RawMeasurement]> {
        match series {
            Series::Densities => self.densities.iter().copied().map(RawMeasurement::from).collect(),
            Series::KinematicViscosities => self
                .kvis
                .iter()
                .map(|k| RawMeasurement::from(k.measurement()))
                .collect(),
            Series::DynamicViscosities => Cow::Borrowed(&[]),
        }
    }

    fn scalar(&self, scalar: Scalar) -> Option<f64> {
        match scalar {
            Scalar::Api => Some(self.api),
            Scalar::PourPointMinK => self.pour_point.min_k,
            Scalar::PourPointMaxK => self.pour_point.max_k,
            Scalar::FlashPointMinK => self.flash_point.min_k,
            Scalar::FlashPointMaxK => self.flash_point.max_k,
            Scalar::Resins => Some(self.resins_fraction),
            Scalar::Asphaltenes => Some(self.asphaltenes_fraction),
            Scalar::Saturates => Some(self.saturates_fraction),
            Scalar::Aromatics => Some(self.aromatics_fraction),
            Scalar::Sulphur => Some(self.sulphur_fraction),
            Scalar::Adhesion => Some(self.adhesion_kg_m_2),
            Scalar::Solubility => Some(self.solubility),
            Scalar::Nickel => self.nickel_ppm,
            Scalar::Vanadium => self.vanadium_ppm,
            Scalar::K0y => Some(self.k0y),
            Scalar::EmulsConstantMax => Some(self.bullwinkle_fraction),
            Scalar::EmulsConstantMin | Scalar::WaterContentEmulsion => None,
            Scalar::OilWaterTension => Some(self.oil_water_tension.n_m),
            Scalar::OilWaterTensionRefTempK => Some(self.oil_water_tension.ref_temp_k),
            Scalar::OilSeawaterTension => self.oil_seawater_tension.map(|t| t.n_m),
            Scalar::OilSeawaterTensionRefTempK => self.oil_seawater_tension.map(|t| t.ref_temp_k),
            Scalar::Polars => self.polars_fraction,
            Scalar::Benzene => self.benzene_fraction,
            Scalar::Paraffins => self.paraffins_fraction,
            Scalar::WaxContent => self.wax_content,
        }
    }

    fn text(&self, text: Text) -> Option<Cow<'_, str>> {
        match text {
            Text::RecordId => Some(Cow::Borrowed(&self.record_id)),
            Text::Name => self.name.as_deref().map(Cow::Borrowed),
            Text::ProductType => Some(Cow::Borrowed(match self.product_type {
                ProductType::Crude => "crude",
                ProductType::Refined => "refined",
            })),
            Text::Reference => self.reference.as_deref().map(Cow::Borrowed),
        }
    }

    fn cuts(&self) -> Cow<'_, [RawCut]> {
        self.cuts.iter().copied().map(RawCut::from).collect()
    }
}
