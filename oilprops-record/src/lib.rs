//! Laboratory oil records and uniform access to their measurements.
//!
//! Records arrive in different shapes: a fixed-field [`ImportedRecord`], a
//! loosely typed [`JsonRecord`], or a finished output record. Every shape
//! implements [`RecordSource`], which exposes the same raw lookups and the
//! culled views the estimation code works from.
//!
//! The [`selection`] module picks measurements by reference temperature, and
//! [`QualifiedValue`] handles inequality-qualified laboratory values such as
//! `"<-40"`.

mod error;
mod imported;
mod json;
mod measurement;
mod qualified;
mod source;

pub mod selection;

pub use error::RecordError;
pub use imported::ImportedRecord;
pub use json::JsonRecord;
pub use measurement::{
    Cut, Field, Measurement, MeasurementKey, RawCut, RawMeasurement, Series, cull_cuts,
};
pub use qualified::{QualifiedValue, Qualifier};
pub use selection::ReferenceTemperature;
pub use source::{ProductType, RecordSource, Scalar, Text};
