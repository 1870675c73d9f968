use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    RecordSource, Scalar, Text,
    measurement::{RawCut, RawMeasurement, Series},
};

/// An oil record with a fixed set of optional fields.
///
/// Field names match the serialized keys, so a record can be read with
/// `serde` from any self-describing format.
/// Records can also be assembled in code:
///
/// ```
/// use oilprops_record::{ImportedRecord, RecordSource, Scalar};
///
/// let record = ImportedRecord::new("AD00001")
///     .with_product_type("Crude")
///     .with_api(30.0)
///     .with_kvis(1e-5, 288.15);
///
/// assert_eq!(record.scalar(Scalar::Api), Some(30.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportedRecord {
    pub oil_id: Option<String>,
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub reference: Option<String>,

    pub api: Option<f64>,
    pub pour_point_min_k: Option<f64>,
    pub pour_point_max_k: Option<f64>,
    pub flash_point_min_k: Option<f64>,
    pub flash_point_max_k: Option<f64>,

    #[serde(alias = "resins_fraction")]
    pub resins: Option<f64>,
    #[serde(alias = "asphaltenes_fraction")]
    pub asphaltenes: Option<f64>,
    pub saturates: Option<f64>,
    pub aromatics: Option<f64>,

    pub sulphur: Option<f64>,
    pub adhesion: Option<f64>,
    pub solubility: Option<f64>,
    pub nickel: Option<f64>,
    pub vanadium: Option<f64>,
    pub k0y: Option<f64>,

    pub emuls_constant_min: Option<f64>,
    pub emuls_constant_max: Option<f64>,
    pub water_content_emulsion: Option<f64>,

    pub oil_water_interfacial_tension_n_m: Option<f64>,
    pub oil_water_interfacial_tension_ref_temp_k: Option<f64>,
    pub oil_seawater_interfacial_tension_n_m: Option<f64>,
    pub oil_seawater_interfacial_tension_ref_temp_k: Option<f64>,

    pub polars: Option<f64>,
    pub benzene: Option<f64>,
    pub paraffins: Option<f64>,
    pub wax_content: Option<f64>,

    pub densities: Vec<RawMeasurement>,
    pub kvis: Vec<RawMeasurement>,
    pub dvis: Vec<RawMeasurement>,
    pub cuts: Vec<RawCut>,
}

impl ImportedRecord {
    /// Creates an empty record with the given identifier.
    #[must_use]
    pub fn new(oil_id: impl Into<String>) -> Self {
        Self {
            oil_id: Some(oil_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_product_type(mut self, product_type: impl Into<String>) -> Self {
        self.product_type = Some(product_type.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn with_api(self, api: f64) -> Self {
        self.with_scalar(Scalar::Api, api)
    }

    /// Sets any numeric property.
    #[must_use]
    pub fn with_scalar(mut self, scalar: Scalar, value: f64) -> Self {
        *self.scalar_mut(scalar) = Some(value);
        self
    }

    /// Adds a fresh-oil density in kg/m³.
    #[must_use]
    pub fn with_density(self, kg_m_3: f64, ref_temp_k: f64) -> Self {
        self.with_measurement(Series::Densities, RawMeasurement::new(kg_m_3, ref_temp_k))
    }

    /// Adds a fresh-oil kinematic viscosity in m²/s.
    #[must_use]
    pub fn with_kvis(self, m_2_s: f64, ref_temp_k: f64) -> Self {
        self.with_measurement(
            Series::KinematicViscosities,
            RawMeasurement::new(m_2_s, ref_temp_k),
        )
    }

    /// Adds a fresh-oil dynamic viscosity in kg/(m·s).
    #[must_use]
    pub fn with_dvis(self, kg_ms: f64, ref_temp_k: f64) -> Self {
        self.with_measurement(
            Series::DynamicViscosities,
            RawMeasurement::new(kg_ms, ref_temp_k),
        )
    }

    /// Adds an entry to a measurement series.
    #[must_use]
    pub fn with_measurement(mut self, series: Series, measurement: RawMeasurement) -> Self {
        self.series_mut(series).push(measurement);
        self
    }

    /// Adds a distillation cut.
    #[must_use]
    pub fn with_cut(mut self, vapor_temp_k: f64, fraction: f64) -> Self {
        self.cuts.push(RawCut::new(vapor_temp_k, fraction));
        self
    }

    fn series(&self, series: Series) -> &[RawMeasurement] {
        match series {
            Series::Densities => &self.densities,
            Series::KinematicViscosities => &self.kvis,
            Series::DynamicViscosities => &self.dvis,
        }
    }

    fn series_mut(&mut self, series: Series) -> &mut Vec<RawMeasurement> {
        match series {
            Series::Densities => &mut self.densities,
            Series::KinematicViscosities => &mut self.kvis,
            Series::DynamicViscosities => &mut self.dvis,
        }
    }

    fn scalar_value(&self, scalar: Scalar) -> Option<f64> {
        match scalar {
            Scalar::Api => self.api,
            Scalar::PourPointMinK => self.pour_point_min_k,
            Scalar::PourPointMaxK => self.pour_point_max_k,
            Scalar::FlashPointMinK => self.flash_point_min_k,
            Scalar::FlashPointMaxK => self.flash_point_max_k,
            Scalar::Resins => self.resins,
            Scalar::Asphaltenes => self.asphaltenes,
            Scalar::Saturates => self.saturates,
            Scalar::Aromatics => self.aromatics,
            Scalar::Sulphur => self.sulphur,
            Scalar::Adhesion => self.adhesion,
            Scalar::Solubility => self.solubility,
            Scalar::Nickel => self.nickel,
            Scalar::Vanadium => self.vanadium,
            Scalar::K0y => self.k0y,
            Scalar::EmulsConstantMin => self.emuls_constant_min,
            Scalar::EmulsConstantMax => self.emuls_constant_max,
            Scalar::WaterContentEmulsion => self.water_content_emulsion,
            Scalar::OilWaterTension => self.oil_water_interfacial_tension_n_m,
            Scalar::OilWaterTensionRefTempK => self.oil_water_interfacial_tension_ref_temp_k,
            Scalar::OilSeawaterTension => self.oil_seawater_interfacial_tension_n_m,
            Scalar::OilSeawaterTensionRefTempK => {
                self.oil_seawater_interfacial_tension_ref_temp_k
            }
            Scalar::Polars => self.polars,
            Scalar::Benzene => self.benzene,
            Scalar::Paraffins => self.paraffins,
            Scalar::WaxContent => self.wax_content,
        }
    }

    fn scalar_mut(&mut self, scalar: Scalar) -> &mut Option<f64> {
        match scalar {
            Scalar::Api => &mut self.api,
            Scalar::PourPointMinK => &mut self.pour_point_min_k,
            Scalar::PourPointMaxK => &mut self.pour_point_max_k,
            Scalar::FlashPointMinK => &mut self.flash_point_min_k,
            Scalar::FlashPointMaxK => &mut self.flash_point_max_k,
            Scalar::Resins => &mut self.resins,
            Scalar::Asphaltenes => &mut self.asphaltenes,
            Scalar::Saturates => &mut self.saturates,
            Scalar::Aromatics => &mut self.aromatics,
            Scalar::Sulphur => &mut self.sulphur,
            Scalar::Adhesion => &mut self.adhesion,
            Scalar::Solubility => &mut self.solubility,
            Scalar::Nickel => &mut self.nickel,
            Scalar::Vanadium => &mut self.vanadium,
            Scalar::K0y => &mut self.k0y,
            Scalar::EmulsConstantMin => &mut self.emuls_constant_min,
            Scalar::EmulsConstantMax => &mut self.emuls_constant_max,
            Scalar::WaterContentEmulsion => &mut self.water_content_emulsion,
            Scalar::OilWaterTension => &mut self.oil_water_interfacial_tension_n_m,
            Scalar::OilWaterTensionRefTempK => {
                &mut self.oil_water_interfacial_tension_ref_temp_k
            }
            Scalar::OilSeawaterTension => &mut self.oil_seawater_interfacial_tension_n_m,
            Scalar::OilSeawaterTensionRefTempK => {
                &mut self.oil_seawater_interfacial_tension_ref_temp_k
            }
            Scalar::Polars => &mut self.polars,
            Scalar::Benzene => &mut self.benzene,
            Scalar::Paraffins => &mut self.paraffins,
            Scalar::WaxContent => &mut self.wax_content,
        }
    }
}

impl RecordSource for ImportedRecord {
    fn measurements(&self, series: Series) -> Cow<'_, [RawMeasurement]> {
        Cow::Borrowed(self.series(series))
    }

    fn scalar(&self, scalar: Scalar) -> Option<f64> {
        self.scalar_value(scalar)
    }

    fn text(&self, text: Text) -> Option<Cow<'_, str>> {
        let field = match text {
            Text::RecordId => &self.oil_id,
            Text::Name => &self.name,
            Text::ProductType => &self.product_type,
            Text::Reference => &self.reference,
        };

        field.as_deref().map(Cow::Borrowed)
    }

    fn cuts(&self) -> Cow<'_, [RawCut]> {
        Cow::Borrowed(&self.cuts)
    }
}
