//! Low-level building blocks for custom search pipelines.
//!
//! These expose the scoring kernel directly. Most users should prefer
//! `Locator` and `BatchLocator`.

pub use crate::kernel::scalar::{opaque_sample_count, score_at, ColorMatchScalar};
pub use crate::kernel::{Kernel, ScoreParams};
