use oilprops_correlations::UnitError;
use thiserror::Error;

/// Errors that may occur when reading a raw oil record.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// The input is not well-formed JSON.
    #[error("malformed JSON: {0}")]
    Json(String),

    /// The record itself is not a JSON object.
    #[error("oil record must be a JSON object")]
    NotAnObject,

    /// A field that should be a number holds something else.
    #[error("field `{field}` is not a number: {found}")]
    InvalidNumber { field: String, found: String },

    /// A field has the wrong JSON shape, such as a scalar where a list is expected.
    #[error("field `{field}` must be {expected}")]
    InvalidShape {
        field: String,
        expected: &'static str,
    },

    /// An inequality-qualified value could not be parsed.
    #[error("cannot parse qualified value `{0}`")]
    InvalidQualifiedValue(String),

    /// A unit conversion failed.
    #[error(transparent)]
    Unit(#[from] UnitError),
}
