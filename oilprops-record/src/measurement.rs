//! Measurements and distillation cuts, in raw and culled form.

use std::cmp::Ordering;

use oilprops_correlations::Quantity;
use serde::{Deserialize, Serialize};

/// A measurement series carried by an oil record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    /// Densities in kg/m³.
    Densities,

    /// Kinematic viscosities in m²/s.
    KinematicViscosities,

    /// Dynamic viscosities in kg/(m·s).
    DynamicViscosities,
}

impl Series {
    pub const ALL: [Series; 3] = [
        Series::Densities,
        Series::KinematicViscosities,
        Series::DynamicViscosities,
    ];

    /// Key of the series list in a serialized record.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Densities => "densities",
            Self::KinematicViscosities => "kvis",
            Self::DynamicViscosities => "dvis",
        }
    }

    /// Key of the SI value within a serialized entry.
    #[must_use]
    pub fn value_key(self) -> &'static str {
        match self {
            Self::Densities => "kg_m_3",
            Self::KinematicViscosities => "m_2_s",
            Self::DynamicViscosities => "kg_ms",
        }
    }

    /// Alternate value key in laboratory units, with that unit's name.
    #[must_use]
    pub fn alternate_value_key(self) -> (&'static str, &'static str) {
        match self {
            Self::Densities => ("g_cm_3", "g/cm^3"),
            Self::KinematicViscosities => ("cst", "cSt"),
            Self::DynamicViscosities => ("cp", "cP"),
        }
    }

    /// SI unit name of the series values.
    #[must_use]
    pub fn si_unit(self) -> &'static str {
        match self {
            Self::Densities => "kg/m^3",
            Self::KinematicViscosities => "m^2/s",
            Self::DynamicViscosities => "kg/ms",
        }
    }

    #[must_use]
    pub fn quantity(self) -> Quantity {
        match self {
            Self::Densities => Quantity::Density,
            Self::KinematicViscosities => Quantity::KinematicViscosity,
            Self::DynamicViscosities => Quantity::DynamicViscosity,
        }
    }
}

/// A field of a raw measurement that culling may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Value,
    RefTemp,
    Weathering,
}

/// A measurement as recorded, with any field possibly missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMeasurement {
    #[serde(alias = "kg_m_3", alias = "m_2_s", alias = "kg_ms")]
    pub value: Option<f64>,
    pub ref_temp_k: Option<f64>,
    pub weathering: Option<f64>,
}

impl RawMeasurement {
    #[must_use]
    pub fn new(value: f64, ref_temp_k: f64) -> Self {
        Self {
            value: Some(value),
            ref_temp_k: Some(ref_temp_k),
            weathering: None,
        }
    }

    #[must_use]
    pub fn with_weathering(mut self, weathering: f64) -> Self {
        self.weathering = Some(weathering);
        self
    }

    /// Whether `field` holds a value.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Value => self.value.is_some(),
            Field::RefTemp => self.ref_temp_k.is_some(),
            Field::Weathering => self.weathering.is_some(),
        }
    }
}

impl From<Measurement> for RawMeasurement {
    fn from(m: Measurement) -> Self {
        Self {
            value: Some(m.value),
            ref_temp_k: Some(m.ref_temp_k),
            weathering: Some(m.weathering),
        }
    }
}

/// A complete measurement at a reference temperature and weathering state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub ref_temp_k: f64,
    pub weathering: f64,
}

impl Measurement {
    #[must_use]
    pub fn new(value: f64, ref_temp_k: f64, weathering: f64) -> Self {
        Self {
            value,
            ref_temp_k,
            weathering,
        }
    }

    /// Culls a raw measurement, defaulting a missing weathering to fresh oil.
    ///
    /// Returns `None` if the value or reference temperature is missing.
    #[must_use]
    pub fn from_raw(raw: &RawMeasurement) -> Option<Self> {
        Some(Self {
            value: raw.value?,
            ref_temp_k: raw.ref_temp_k?,
            weathering: raw.weathering.unwrap_or(0.0),
        })
    }

    /// The `(weathering, temperature)` key identifying this measurement's state.
    #[must_use]
    pub fn key(&self) -> MeasurementKey {
        MeasurementKey {
            weathering: self.weathering,
            ref_temp_k: self.ref_temp_k,
        }
    }
}

/// Totally ordered `(weathering, reference temperature)` pair.
///
/// Orders by weathering first, then temperature, using IEEE total ordering.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementKey {
    pub weathering: f64,
    pub ref_temp_k: f64,
}

impl PartialEq for MeasurementKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MeasurementKey {}

impl PartialOrd for MeasurementKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MeasurementKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weathering
            .total_cmp(&other.weathering)
            .then_with(|| self.ref_temp_k.total_cmp(&other.ref_temp_k))
    }
}

/// A distillation cut as recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCut {
    pub vapor_temp_k: Option<f64>,
    pub liquid_temp_k: Option<f64>,
    pub fraction: Option<f64>,
}

impl RawCut {
    #[must_use]
    pub fn new(vapor_temp_k: f64, fraction: f64) -> Self {
        Self {
            vapor_temp_k: Some(vapor_temp_k),
            liquid_temp_k: None,
            fraction: Some(fraction),
        }
    }
}

impl From<Cut> for RawCut {
    fn from(cut: Cut) -> Self {
        Self {
            vapor_temp_k: Some(cut.vapor_temp_k),
            liquid_temp_k: cut.liquid_temp_k,
            fraction: Some(cut.fraction),
        }
    }
}

/// A distillation cut: the cumulative fraction evaporated at a vapor temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cut {
    pub vapor_temp_k: f64,
    pub liquid_temp_k: Option<f64>,
    pub fraction: f64,
}

impl Cut {
    #[must_use]
    pub fn new(vapor_temp_k: f64, fraction: f64) -> Self {
        Self {
            vapor_temp_k,
            liquid_temp_k: None,
            fraction,
        }
    }
}

/// Keeps the cuts that continue a non-decreasing distillation curve.
///
/// A cut missing its vapor temperature or fraction is dropped, as is any cut
/// whose temperature or fraction falls below the last kept cut.
#[must_use]
pub fn cull_cuts(cuts: &[RawCut]) -> Vec<Cut> {
    let mut prev_temp = 0.0;
    let mut prev_fraction = 0.0;

    cuts.iter()
        .filter_map(|raw| {
            let (vapor_temp_k, fraction) = (raw.vapor_temp_k?, raw.fraction?);

            if vapor_temp_k < prev_temp || fraction < prev_fraction {
                return None;
            }

            prev_temp = vapor_temp_k;
            prev_fraction = fraction;

            Some(Cut {
                vapor_temp_k,
                liquid_temp_k: raw.liquid_temp_k,
                fraction,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn culling_needs_value_and_temperature() {
        let complete = RawMeasurement::new(880.0, 288.15);
        let missing_temp = RawMeasurement {
            value: Some(880.0),
            ..RawMeasurement::default()
        };

        let culled = Measurement::from_raw(&complete).unwrap();
        assert_relative_eq!(culled.weathering, 0.0);
        assert!(Measurement::from_raw(&missing_temp).is_none());
    }

    #[test]
    fn keys_order_by_weathering_then_temperature() {
        let a = Measurement::new(1.0, 300.0, 0.0).key();
        let b = Measurement::new(2.0, 280.0, 0.1).key();
        let c = Measurement::new(3.0, 290.0, 0.1).key();

        let mut keys = [c, a, b];
        keys.sort();
        assert_eq!(keys, [a, b, c]);

        assert_eq!(a, Measurement::new(9.0, 300.0, 0.0).key());
    }

    #[test]
    fn decreasing_fraction_is_culled() {
        let cuts = cull_cuts(&[RawCut::new(310.15, 0.3), RawCut::new(400.0, 0.2)]);

        assert_eq!(cuts.len(), 1);
        assert_relative_eq!(cuts[0].vapor_temp_k, 310.15);
    }

    #[test]
    fn culling_compares_against_last_kept_cut() {
        let cuts = cull_cuts(&[
            RawCut::new(350.0, 0.1),
            RawCut::new(340.0, 0.2),
            RawCut::new(400.0, 0.15),
            RawCut {
                fraction: Some(0.4),
                ..RawCut::default()
            },
            RawCut::new(450.0, 0.3),
        ]);

        let temps: Vec<f64> = cuts.iter().map(|c| c.vapor_temp_k).collect();
        assert_eq!(temps, vec![350.0, 400.0, 450.0]);
    }

    #[test]
    fn serialized_value_keys() {
        let raw: RawMeasurement =
            serde_json::from_str(r#"{"kg_m_3": 880.0, "ref_temp_k": 288.15}"#).unwrap();

        assert_eq!(raw, RawMeasurement::new(880.0, 288.15));
    }
}
