//! # weld_core - Welding Calculation Engine
//!
//! `weld_core` is the computational heart of WeldEase: rod spacing along a
//! pipe, rod and time estimates for a joint, and invoice totals. All inputs
//! and outputs are JSON-serializable, so any front end (terminal, web, GUI)
//! can drive it.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Validate first**: Bad input is rejected with a field-level error before
//!   anything is computed
//! - **Rich Errors**: Structured error types, not just strings
//! - **Export at the edge**: Documents and sharing sit behind the
//!   [`export::Exporter`] trait
//!
//! ## Quick Start
//!
//! ```rust
//! use weld_core::calculations::{estimate_material, plan_spacing, JointType};
//! use weld_core::units::LengthUnit;
//!
//! let plan = plan_spacing(6000.0, LengthUnit::Mm, 12.0).unwrap();
//! assert_eq!(plan.coverage, 500.0);
//!
//! let estimate = estimate_material(1000.0, 10.0, JointType::Butt).unwrap();
//! assert_eq!(estimate.rods_needed, 5);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Spacing planner and material estimator
//! - [`invoice`] - Invoice line items and totals
//! - [`joints`] - Static joint reference guide
//! - [`report`] - Table, chart and text formatting of results
//! - [`export`] - Exporter trait, share outcomes, PDF exporter
//! - [`pdf`] - Typst PDF templates
//! - [`settings`] - User preferences
//! - [`units`] - Length units and conversion
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod export;
pub mod invoice;
pub mod joints;
pub mod pdf;
pub mod report;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CalcError, CalcResult};
pub use export::{Exporter, PdfExporter, ResultsRegion, ShareOutcome};
pub use invoice::{Invoice, LineItem};
pub use settings::ToolkitSettings;
pub use units::{Length, LengthUnit};
