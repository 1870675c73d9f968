use thiserror::Error;

/// Errors that may occur when evaluating a correlation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorrelationError {
    /// An input lies outside the domain where the correlation is defined.
    ///
    /// For example, a logarithmic correlation evaluated at a non-positive API gravity.
    #[error("`{correlation}` is undefined for {input} = {value}")]
    OutOfDomain {
        correlation: &'static str,
        input: &'static str,
        value: f64,
    },

    /// A curve fit could not be determined from the given points.
    #[error("curve fit failed with {points} point(s): {reason}")]
    DegenerateFit { points: usize, reason: &'static str },

    /// A constant in a correlation set is non-finite or non-physical.
    #[error("invalid correlation constant `{name}` = {value}")]
    InvalidConstant { name: &'static str, value: f64 },
}

impl CorrelationError {
    /// Creates a [`CorrelationError::OutOfDomain`] error.
    pub(crate) fn out_of_domain(correlation: &'static str, input: &'static str, value: f64) -> Self {
        Self::OutOfDomain {
            correlation,
            input,
            value,
        }
    }
}
