//! Estimation of complete oil property records for spill modeling.
//!
//! Laboratory records are often missing properties a weathering model needs.
//! This crate fills the gaps from empirical correlations, checks the result
//! for plausibility, and scores how much of it was actually measured.
//!
//! The entry point is [`estimate`], which takes any
//! [`RecordSource`](oilprops_record::RecordSource) and returns an
//! [`Outcome`]: an accepted [`OilRecord`] or a [`Rejection`] listing why the
//! record could not be used. Individual properties can also be queried
//! directly through an [`Estimator`].
//!
//! ```
//! use oilprops_estimate::{EstimatorConfig, Outcome, estimate};
//! use oilprops_record::ImportedRecord;
//!
//! let record = ImportedRecord::new("AD00001")
//!     .with_product_type("Crude")
//!     .with_api(30.0)
//!     .with_kvis(1e-5, 288.15);
//!
//! let config = EstimatorConfig::default();
//! let Outcome::Accepted(oil) = estimate(&record, &config)? else {
//!     panic!("record should be accepted");
//! };
//!
//! assert_eq!(oil.cuts.len(), 10);
//! assert!(oil.estimated.cuts);
//! # Ok::<(), oilprops_estimate::EstimationError>(())
//! ```

mod batch;
mod builder;
mod config;
mod error;
mod estimator;
mod oil;
mod score;

pub use batch::{estimate_batch, estimate_batch_parallel};
pub use builder::{Draft, Estimated, Outcome, Rejection, RejectionReason, Screened, estimate};
pub use config::{ConfigError, EstimatorConfig, ValidationConfig};
pub use error::EstimationError;
pub use estimator::{
    Bounds, Estimate, Estimator, InertFractions, InterfacialTension, PseudoComponent, SaraType,
};
pub use oil::{EstimatedFlags, KvisEntry, OilRecord};
pub use score::{QualityScore, score};
