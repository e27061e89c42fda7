// SPDX-License-Identifier: GPL-3.0-only

//! Focal - thin-lens optics for sizing camera lenses
//!
//! This library provides the formula core and sweep engine behind the `focal`
//! command-line tool, which checks a camera and lens combination against a
//! detection requirement.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`optics`]: Thin-lens formulas for blur, depth of field and coverage
//! - [`sweep`]: Blur-vs-distance sampling over families of lens settings
//! - [`config`]: Camera profiles and detection requirements
//! - [`terminal`]: Interactive terminal chart
//! - [`constants`]: Unit factors and shared defaults
//!
//! # Example
//!
//! ```
//! use focal::optics;
//!
//! let hyperfocal_mm = optics::hyperfocal_distance(3.0, 5.6, 0.0088)?;
//! let far = optics::far_distance(3.0, hyperfocal_mm, hyperfocal_mm)?;
//! assert!(far.is_infinite());
//! # Ok::<(), focal::optics::OpticsError>(())
//! ```

pub mod config;
pub mod constants;
pub mod errors;
pub mod optics;
pub mod sweep;
pub mod terminal;

// Re-export commonly used types
pub use config::{CameraProfile, DetectionSpec};
pub use errors::{AppError, AppResult};
pub use optics::{DofBound, DofRange, OpticsError};
pub use sweep::{BlurUnit, DistanceGrid, FocusPolicy, SweepRequest, SweepSeries};
