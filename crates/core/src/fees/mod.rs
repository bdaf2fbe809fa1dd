//! Fee preview: per-enrollment pricing of a bound fee package.

pub mod engine;
pub mod types;


pub use engine::FeePreviewEngine;
pub use types::{
    AdjustmentSource, EnrollmentFees, FeeAdjustment, FeeLine, FeePreview, PreviewOutcome,
};
