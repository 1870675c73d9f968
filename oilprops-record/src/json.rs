//! Mapping-backed oil records read from JSON objects.
//!
//! A [`JsonRecord`] keeps the original object and reads fields on demand.
//! It is more forgiving than the fixed-field [`ImportedRecord`]:
//!
//! - numbers may be JSON numbers or numeric strings, and strings may carry a
//!   leading `<` or `>` qualifier,
//! - measurements may use laboratory units (`g_cm_3`, `cst`, `cp`, `ref_temp_c`),
//! - any kelvin scalar may instead be given in Celsius (`pour_point_min_c`),
//! - a single qualified `pour_point_k`, `pour_point_c`, `flash_point_k`, or
//!   `flash_point_c` supplies whichever bounds its qualifier allows.
//!
//! The whole object is checked when the record is created, so later lookups
//! never fail.
//!
//! [`ImportedRecord`]: crate::ImportedRecord

use std::{borrow::Cow, str::FromStr};

use oilprops_correlations::{Quantity, units};
use serde_json::{Map, Value};

use crate::{
    QualifiedValue, RecordError, RecordSource, Scalar, Text,
    measurement::{RawCut, RawMeasurement, Series},
};

/// An oil record backed by a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    map: Map<String, Value>,
}

impl JsonRecord {
    /// Wraps a JSON value, checking that every known field is readable.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, or any recognized
    /// field holds an unreadable number or has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let Value::Object(map) = value else {
            return Err(RecordError::NotAnObject);
        };

        let record = Self { map };
        record.check()?;

        Ok(record)
    }

    /// The underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    fn check(&self) -> Result<(), RecordError> {
        for scalar in Scalar::ALL {
            self.try_scalar(scalar)?;
        }

        for series in Series::ALL {
            self.try_measurements(series)?;
        }

        self.try_cuts()?;

        Ok(())
    }

    fn try_scalar(&self, scalar: Scalar) -> Result<Option<f64>, RecordError> {
        if let Some((stem, read_bound)) = bound_reader(scalar) {
            return self.try_bound(scalar, stem, read_bound);
        }

        if let Some(value) = number(&self.map, scalar.key())? {
            return Ok(Some(value));
        }

        let alias = match scalar {
            Scalar::Resins => Some("resins_fraction"),
            Scalar::Asphaltenes => Some("asphaltenes_fraction"),
            _ => None,
        };
        if let Some(value) = alias.map(|key| number(&self.map, key)).transpose()?.flatten() {
            return Ok(Some(value));
        }

        if scalar.is_temperature()
            && let Some(stem) = scalar.key().strip_suffix("_k")
            && let Some(celsius) = number(&self.map, &format!("{stem}_c"))?
        {
            return Ok(Some(celsius_to_kelvin(celsius)?));
        }

        Ok(None)
    }

    /// Reads a pour or flash point bound.
    ///
    /// An explicit bound key takes precedence over the single qualified
    /// value under `stem`. Either way the qualifier decides whether the value
    /// bounds in this direction, so `"<233"` is never a minimum.
    fn try_bound(
        &self,
        scalar: Scalar,
        stem: &str,
        read_bound: fn(&QualifiedValue) -> Option<f64>,
    ) -> Result<Option<f64>, RecordError> {
        let explicit_stem = scalar.key().strip_suffix("_k").unwrap_or(stem);

        if let Some(explicit) = self.qualified_temperature(explicit_stem)? {
            return Ok(read_bound(&explicit));
        }

        Ok(self
            .qualified_temperature(stem)?
            .and_then(|value| read_bound(&value)))
    }

    /// A single qualified temperature under `{stem}_k` or `{stem}_c`, in kelvin.
    fn qualified_temperature(&self, stem: &str) -> Result<Option<QualifiedValue>, RecordError> {
        if let Some(kelvin) = qualified(&self.map, &format!("{stem}_k"))? {
            return Ok(Some(kelvin));
        }

        match qualified(&self.map, &format!("{stem}_c"))? {
            Some(celsius) => Ok(Some(QualifiedValue {
                qualifier: celsius.qualifier,
                value: celsius_to_kelvin(celsius.value)?,
            })),
            None => Ok(None),
        }
    }

    fn try_measurements(&self, series: Series) -> Result<Vec<RawMeasurement>, RecordError> {
        entries(&self.map, series.key())?
            .into_iter()
            .map(|entry| -> Result<RawMeasurement, RecordError> {
                let value = match number(entry, series.value_key())? {
                    Some(value) => Some(value),
                    None => {
                        let (key, unit) = series.alternate_value_key();
                        number(entry, key)?
                            .map(|v| units::convert(series.quantity(), unit, series.si_unit(), v))
                            .transpose()?
                    }
                };

                Ok(RawMeasurement {
                    value,
                    ref_temp_k: temperature(entry, "ref_temp")?,
                    weathering: number(entry, "weathering")?,
                })
            })
            .collect()
    }

    fn try_cuts(&self) -> Result<Vec<RawCut>, RecordError> {
        entries(&self.map, "cuts")?
            .into_iter()
            .map(|entry| -> Result<RawCut, RecordError> {
                Ok(RawCut {
                    vapor_temp_k: temperature(entry, "vapor_temp")?,
                    liquid_temp_k: temperature(entry, "liquid_temp")?,
                    fraction: number(entry, "fraction")?,
                })
            })
            .collect()
    }
}

impl TryFrom<Value> for JsonRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl FromStr for JsonRecord {
    type Err = RecordError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| RecordError::Json(e.to_string()))?;

        Self::from_value(value)
    }
}

impl RecordSource for JsonRecord {
    fn measurements(&self, series: Series) -> Cow<'_, [RawMeasurement]> {
        Cow::Owned(self.try_measurements(series).unwrap_or_default())
    }

    fn scalar(&self, scalar: Scalar) -> Option<f64> {
        self.try_scalar(scalar).ok().flatten()
    }

    fn text(&self, text: Text) -> Option<Cow<'_, str>> {
        let value = match text {
            Text::RecordId => self.map.get(text.key()).or_else(|| self.map.get("adios_oil_id")),
            Text::Name => self.map.get(text.key()).or_else(|| self.map.get("oil_name")),
            _ => self.map.get(text.key()),
        };

        match value? {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    fn cuts(&self) -> Cow<'_, [RawCut]> {
        Cow::Owned(self.try_cuts().unwrap_or_default())
    }
}

/// The single-value stem and bound interpretation of a bound scalar.
fn bound_reader(scalar: Scalar) -> Option<(&'static str, fn(&QualifiedValue) -> Option<f64>)> {
    match scalar {
        Scalar::PourPointMinK => Some(("pour_point", QualifiedValue::as_min)),
        Scalar::PourPointMaxK => Some(("pour_point", QualifiedValue::as_max)),
        Scalar::FlashPointMinK => Some(("flash_point", QualifiedValue::as_min)),
        Scalar::FlashPointMaxK => Some(("flash_point", QualifiedValue::as_max)),
        _ => None,
    }
}

fn celsius_to_kelvin(celsius: f64) -> Result<f64, RecordError> {
    Ok(units::convert(Quantity::Temperature, "C", "K", celsius)?)
}

/// Reads `{stem}_k`, falling back to `{stem}_c` converted to kelvin.
fn temperature(map: &Map<String, Value>, stem: &str) -> Result<Option<f64>, RecordError> {
    if let Some(kelvin) = number(map, &format!("{stem}_k"))? {
        return Ok(Some(kelvin));
    }

    number(map, &format!("{stem}_c"))?
        .map(celsius_to_kelvin)
        .transpose()
}

fn number(map: &Map<String, Value>, key: &str) -> Result<Option<f64>, RecordError> {
    Ok(qualified(map, key)?.map(|q| q.plain()))
}

fn qualified(map: &Map<String, Value>, key: &str) -> Result<Option<QualifiedValue>, RecordError> {
    let invalid = |found: String| RecordError::InvalidNumber {
        field: key.to_string(),
        found,
    };

    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|v| Some(QualifiedValue::exact(v)))
            .ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) => QualifiedValue::parse(s)
            .map(Some)
            .map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

/// The objects of a list field; a missing or null list is empty.
fn entries<'a>(
    map: &'a Map<String, Value>,
    key: &str,
) -> Result<Vec<&'a Map<String, Value>>, RecordError> {
    let shape_error = || RecordError::InvalidShape {
        field: key.to_string(),
        expected: "a list of objects",
    };

    match map.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_object().ok_or_else(shape_error))
            .collect(),
        Some(_) => Err(shape_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    fn record(value: Value) -> JsonRecord {
        JsonRecord::from_value(value).unwrap()
    }

    #[test]
    fn reads_numbers_and_numeric_strings() {
        let oil = record(json!({
            "oil_id": "AD00010",
            "api": "30.5",
            "k0y": 2.024e-6,
            "resins_fraction": 0.1,
        }));

        assert_eq!(oil.text(Text::RecordId).as_deref(), Some("AD00010"));
        assert_relative_eq!(oil.scalar(Scalar::Api).unwrap(), 30.5);
        assert_relative_eq!(oil.scalar(Scalar::K0y).unwrap(), 2.024e-6);
        assert_relative_eq!(oil.scalar(Scalar::Resins).unwrap(), 0.1);
        assert_eq!(oil.scalar(Scalar::Asphaltenes), None);
    }

    #[test]
    fn converts_laboratory_units() {
        let oil = record(json!({
            "densities": [{"g_cm_3": 0.9, "ref_temp_c": 15.0}],
            "kvis": [{"cst": 100.0, "ref_temp_k": 288.15, "weathering": 0.1}],
            "dvis": [{"cp": "12", "ref_temp_c": 25}],
            "pour_point_min_c": -10.0,
        }));

        let densities = oil.culled_measurements(Series::Densities);
        assert_relative_eq!(densities[0].value, 900.0, epsilon = 1e-9);
        assert_relative_eq!(densities[0].ref_temp_k, 288.15, epsilon = 1e-9);
        assert_relative_eq!(densities[0].weathering, 0.0);

        let kvis = oil.culled_measurements(Series::KinematicViscosities);
        assert_relative_eq!(kvis[0].value, 1e-4, epsilon = 1e-15);
        assert_relative_eq!(kvis[0].weathering, 0.1);

        let dvis = oil.culled_measurements(Series::DynamicViscosities);
        assert_relative_eq!(dvis[0].value, 0.012, epsilon = 1e-12);
        assert_relative_eq!(dvis[0].ref_temp_k, 298.15, epsilon = 1e-9);

        assert_relative_eq!(oil.scalar(Scalar::PourPointMinK).unwrap(), 263.15, epsilon = 1e-9);
    }

    #[test]
    fn qualified_pour_point_sets_one_bound() {
        let oil = record(json!({ "pour_point_c": "<-40" }));

        assert_eq!(oil.scalar(Scalar::PourPointMinK), None);
        assert_relative_eq!(oil.scalar(Scalar::PourPointMaxK).unwrap(), 233.15, epsilon = 1e-9);

        let oil = record(json!({ "flash_point_k": ">350" }));
        assert_relative_eq!(oil.scalar(Scalar::FlashPointMinK).unwrap(), 350.0);
        assert_eq!(oil.scalar(Scalar::FlashPointMaxK), None);
    }

    #[test]
    fn explicit_bounds_win_over_qualified_value() {
        let oil = record(json!({
            "pour_point_max_k": 250.0,
            "pour_point_k": "<240",
        }));

        assert_relative_eq!(oil.scalar(Scalar::PourPointMaxK).unwrap(), 250.0);
    }

    #[test]
    fn explicit_bounds_honor_their_qualifier() {
        let oil = record(json!({
            "pour_point_min_k": "<233",
            "pour_point_max_k": ">250",
        }));

        assert_eq!(oil.scalar(Scalar::PourPointMinK), None);
        assert_eq!(oil.scalar(Scalar::PourPointMaxK), None);

        let oil = record(json!({
            "flash_point_min_c": ">60",
            "flash_point_max_k": "<400",
            "pour_point_min_k": "<233",
            "pour_point_k": 240.0,
        }));

        assert_relative_eq!(oil.scalar(Scalar::FlashPointMinK).unwrap(), 333.15, epsilon = 1e-9);
        assert_relative_eq!(oil.scalar(Scalar::FlashPointMaxK).unwrap(), 400.0);

        // An explicit key, even an unusable one, shadows the single value.
        assert_eq!(oil.scalar(Scalar::PourPointMinK), None);
        assert_relative_eq!(oil.scalar(Scalar::PourPointMaxK).unwrap(), 240.0);
    }

    #[test]
    fn cuts_accept_celsius() {
        let oil = record(json!({
            "cuts": [
                {"vapor_temp_c": 37.0, "fraction": 0.3},
                {"vapor_temp_k": 400.0, "fraction": 0.2},
            ]
        }));

        assert_eq!(oil.cuts().len(), 2);
        let culled = oil.culled_cuts();
        assert_eq!(culled.len(), 1);
        assert_relative_eq!(culled[0].vapor_temp_k, 310.15, epsilon = 1e-9);
    }

    #[test]
    fn malformed_fields_are_reported() {
        assert_eq!(
            JsonRecord::from_value(json!([1, 2])),
            Err(RecordError::NotAnObject)
        );

        assert!(matches!(
            JsonRecord::from_value(json!({ "api": "heavy" })),
            Err(RecordError::InvalidNumber { field, .. }) if field == "api"
        ));

        assert!(matches!(
            JsonRecord::from_value(json!({ "kvis": {"m_2_s": 1e-5} })),
            Err(RecordError::InvalidShape { field, .. }) if field == "kvis"
        ));

        assert!(matches!("{".parse::<JsonRecord>(), Err(RecordError::Json(_))));
    }
}
