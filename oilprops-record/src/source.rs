use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::measurement::{Cut, Field, Measurement, RawCut, RawMeasurement, Series, cull_cuts};

/// A named numeric property of an oil record.
///
/// Temperatures are in kelvin, tensions in N/m, metals in ppm, adhesion in
/// kg/m², and fractions are mass fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Api,
    PourPointMinK,
    PourPointMaxK,
    FlashPointMinK,
    FlashPointMaxK,
    Resins,
    Asphaltenes,
    Saturates,
    Aromatics,
    Sulphur,
    Adhesion,
    Solubility,
    Nickel,
    Vanadium,
    K0y,
    EmulsConstantMin,
    EmulsConstantMax,
    WaterContentEmulsion,
    OilWaterTension,
    OilWaterTensionRefTempK,
    OilSeawaterTension,
    OilSeawaterTensionRefTempK,
    Polars,
    Benzene,
    Paraffins,
    WaxContent,
}

impl Scalar {
    pub const ALL: [Scalar; 26] = [
        Scalar::Api,
        Scalar::PourPointMinK,
        Scalar::PourPointMaxK,
        Scalar::FlashPointMinK,
        Scalar::FlashPointMaxK,
        Scalar::Resins,
        Scalar::Asphaltenes,
        Scalar::Saturates,
        Scalar::Aromatics,
        Scalar::Sulphur,
        Scalar::Adhesion,
        Scalar::Solubility,
        Scalar::Nickel,
        Scalar::Vanadium,
        Scalar::K0y,
        Scalar::EmulsConstantMin,
        Scalar::EmulsConstantMax,
        Scalar::WaterContentEmulsion,
        Scalar::OilWaterTension,
        Scalar::OilWaterTensionRefTempK,
        Scalar::OilSeawaterTension,
        Scalar::OilSeawaterTensionRefTempK,
        Scalar::Polars,
        Scalar::Benzene,
        Scalar::Paraffins,
        Scalar::WaxContent,
    ];

    /// Key of the scalar in a serialized record.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::PourPointMinK => "pour_point_min_k",
            Self::PourPointMaxK => "pour_point_max_k",
            Self::FlashPointMinK => "flash_point_min_k",
            Self::FlashPointMaxK => "flash_point_max_k",
            Self::Resins => "resins",
            Self::Asphaltenes => "asphaltenes",
            Self::Saturates => "saturates",
            Self::Aromatics => "aromatics",
            Self::Sulphur => "sulphur",
            Self::Adhesion => "adhesion",
            Self::Solubility => "solubility",
            Self::Nickel => "nickel",
            Self::Vanadium => "vanadium",
            Self::K0y => "k0y",
            Self::EmulsConstantMin => "emuls_constant_min",
            Self::EmulsConstantMax => "emuls_constant_max",
            Self::WaterContentEmulsion => "water_content_emulsion",
            Self::OilWaterTension => "oil_water_interfacial_tension_n_m",
            Self::OilWaterTensionRefTempK => "oil_water_interfacial_tension_ref_temp_k",
            Self::OilSeawaterTension => "oil_seawater_interfacial_tension_n_m",
            Self::OilSeawaterTensionRefTempK => "oil_seawater_interfacial_tension_ref_temp_k",
            Self::Polars => "polars",
            Self::Benzene => "benzene",
            Self::Paraffins => "paraffins",
            Self::WaxContent => "wax_content",
        }
    }

    /// Whether the scalar is a temperature in kelvin.
    #[must_use]
    pub fn is_temperature(self) -> bool {
        matches!(
            self,
            Self::PourPointMinK
                | Self::PourPointMaxK
                | Self::FlashPointMinK
                | Self::FlashPointMaxK
                | Self::OilWaterTensionRefTempK
                | Self::OilSeawaterTensionRefTempK
        )
    }
}

/// A named text property of an oil record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    RecordId,
    Name,
    ProductType,
    Reference,
}

impl Text {
    /// Key of the text field in a serialized record.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::RecordId => "oil_id",
            Self::Name => "name",
            Self::ProductType => "product_type",
            Self::Reference => "reference",
        }
    }
}

/// The broad class of an oil product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Crude,
    Refined,
}

impl ProductType {
    /// Parses a product type name, ignoring case.
    ///
    /// Returns `None` for anything other than crude or refined.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "crude" => Some(Self::Crude),
            "refined" => Some(Self::Refined),
            _ => None,
        }
    }
}

/// Uniform read access to an oil record, whatever its source shape.
///
/// Implementors provide the four raw lookups; culling and the other derived
/// views are shared by every record shape.
pub trait RecordSource {
    /// All entries of a measurement series, as recorded.
    fn measurements(&self, series: Series) -> Cow<'_, [RawMeasurement]>;

    /// A numeric property, if present.
    fn scalar(&self, scalar: Scalar) -> Option<f64>;

    /// A text property, if present.
    fn text(&self, text: Text) -> Option<Cow<'_, str>>;

    /// Distillation cuts, as recorded.
    fn cuts(&self) -> Cow<'_, [RawCut]>;

    /// Entries of `series` that carry every field in `required`.
    ///
    /// A missing weathering on a retained entry is set to zero.
    fn culled(&self, series: Series, required: &[Field]) -> Vec<RawMeasurement> {
        self.measurements(series)
            .iter()
            .filter(|m| required.iter().all(|&field| m.has(field)))
            .map(|m| RawMeasurement {
                weathering: Some(m.weathering.unwrap_or(0.0)),
                ..*m
            })
            .collect()
    }

    /// Complete measurements of `series`.
    fn culled_measurements(&self, series: Series) -> Vec<Measurement> {
        self.measurements(series)
            .iter()
            .filter_map(Measurement::from_raw)
            .collect()
    }

    /// Cuts forming a non-decreasing distillation curve.
    fn culled_cuts(&self) -> Vec<Cut> {
        cull_cuts(&self.cuts())
    }

    /// The record's product type, if it is crude or refined.
    fn product_type(&self) -> Option<ProductType> {
        self.text(Text::ProductType)
            .and_then(|name| ProductType::parse(&name))
    }
}
