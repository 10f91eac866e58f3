//! Layout and path engine for clonal-evolution timesweeps.
//!
//! [`compute_layout`] takes an ancestry tree plus sparse per-timepoint
//! prevalence and produces per-timepoint band intervals, normalized boundary
//! paths, pixel-space curves and labels. [`views`] and [`svg`] turn that
//! result into drawing commands and standalone SVG.

pub mod error;
pub mod input;
pub mod layout;
pub mod model;
pub mod palette;
pub mod paths;
pub mod pipeline;
pub mod svg;
pub mod views;

pub use error::{LayoutWarning, TimesweepError};
pub use input::parse_input;
pub use pipeline::{LayoutInput, LayoutResult, compute, compute_layout};
