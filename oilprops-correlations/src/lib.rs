//! Empirical correlations for estimating petroleum oil properties.
//!
//! Each concern (density, viscosity, distillation, SARA composition,
//! emulsification, and miscellaneous properties) is a plain struct holding the
//! published regression constants, with methods implementing the formulas.
//! The groups are bundled into a versioned [`CorrelationSet`], so an alternate
//! set of constants can be substituted without touching the estimation code.
//!
//! All quantities are SI: temperatures in kelvin, densities in kg/m³,
//! kinematic viscosities in m²/s, dynamic viscosities in kg/(m·s),
//! and fractions as mass fractions in `[0, 1]`.

mod error;
mod set;

pub mod density;
pub mod distillation;
pub mod emulsion;
pub mod misc;
pub mod sara;
pub mod units;
pub mod viscosity;

pub use density::{DensityCorrelations, REFERENCE_TEMP_K};
pub use distillation::{ClampedInverse, DistillationCorrelations, LinearFit};
pub use emulsion::EmulsionCorrelations;
pub use error::CorrelationError;
pub use misc::MiscCorrelations;
pub use sara::SaraCorrelations;
pub use set::CorrelationSet;
pub use units::{Quantity, UnitError};
pub use viscosity::ViscosityCorrelations;
