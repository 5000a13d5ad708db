//! # Welding Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! Validation always runs first; a rejected input never yields a partial result.
//!
//! ## Available Calculations
//!
//! - [`spacing`] - Rod spacing along a pipe or seam
//! - [`material`] - Rod count and arc time for a joint

pub mod material;
pub mod spacing;

// Re-export commonly used types
pub use material::{estimate_material, JointType, MaterialInput, MaterialResult};
pub use spacing::{plan_spacing, SpacingInput, SpacingResult, SpacingSegment};
