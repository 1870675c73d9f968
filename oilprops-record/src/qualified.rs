//! Values that may carry a leading `<` or `>` qualifier.
//!
//! Laboratory sheets record a pour point below the test range as `"<-40"`.
//! Read as a lower bound such a value says nothing, while read as an upper
//! bound it is exact.

use std::str::FromStr;

use crate::RecordError;

/// The inequality attached to a [`QualifiedValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    LessThan,
    GreaterThan,
}

/// A number with an optional inequality qualifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualifiedValue {
    pub qualifier: Option<Qualifier>,
    pub value: f64,
}

impl QualifiedValue {
    /// Creates an unqualified value.
    #[must_use]
    pub fn exact(value: f64) -> Self {
        Self {
            qualifier: None,
            value,
        }
    }

    /// Parses a string such as `"12.5"`, `"<-40"`, or `"> 300"`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidQualifiedValue`] if the text after the
    /// optional qualifier is not a number.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let trimmed = text.trim();

        let (qualifier, rest) = match trimmed.chars().next() {
            Some('<') => (Some(Qualifier::LessThan), &trimmed[1..]),
            Some('>') => (Some(Qualifier::GreaterThan), &trimmed[1..]),
            _ => (None, trimmed),
        };

        let value = rest
            .trim()
            .parse::<f64>()
            .map_err(|_| RecordError::InvalidQualifiedValue(text.to_string()))?;

        Ok(Self { qualifier, value })
    }

    /// The value read as a lower bound.
    ///
    /// A `<` value gives no lower bound.
    #[must_use]
    pub fn as_min(&self) -> Option<f64> {
        match self.qualifier {
            Some(Qualifier::LessThan) => None,
            _ => Some(self.value),
        }
    }

    /// The value read as an upper bound.
    ///
    /// A `>` value gives no upper bound.
    #[must_use]
    pub fn as_max(&self) -> Option<f64> {
        match self.qualifier {
            Some(Qualifier::GreaterThan) => None,
            _ => Some(self.value),
        }
    }

    /// The value with any qualifier ignored.
    #[must_use]
    pub fn plain(&self) -> f64 {
        self.value
    }
}

impl FromStr for QualifiedValue {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
