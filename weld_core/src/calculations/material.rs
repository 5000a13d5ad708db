//! # Material & Time Estimate
//!
//! Rough consumable and arc-time estimate for a single weld run.
//!
//! ## Method
//!
//! - Weld volume (mm³) = joint length × thickness × deposition factor
//! - Rods needed = ⌈volume / 2800 mm³⌉, 2800 mm³ being the deposit of one 3.2 mm rod
//! - Time (min) = joint length / 150 mm/min travel speed
//!
//! | Joint  | Deposition factor |
//! |--------|-------------------|
//! | Butt   | 1.2               |
//! | Fillet | 0.5               |
//! | Lap    | 0.6               |
//!
//! These are shop-floor approximations; real consumption varies with process,
//! position and operator.
//!
//! ## Example
//!
//! ```rust
//! use weld_core::calculations::material::{estimate_material, JointType};
//!
//! let est = estimate_material(1000.0, 10.0, JointType::Butt).unwrap();
//! assert_eq!(est.rods_needed, 5);
//! assert!((est.time_minutes - 6.667).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::joints::{find_joint, JointReference};
use crate::units::{CubicMillimeters, Millimeters, Minutes};

/// Deposit volume of a single rod (mm³)
pub const ROD_DEPOSIT_VOLUME_MM3: f64 = 2800.0;

/// Assumed travel speed (mm/min)
pub const TRAVEL_SPEED_MM_PER_MIN: f64 = 150.0;

/// Joint types the estimator knows a deposition factor for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointType {
    #[default]
    Butt,
    Fillet,
    Lap,
}

impl JointType {
    /// All joint type variants for selection lists
    pub const ALL: [JointType; 3] = [JointType::Butt, JointType::Fillet, JointType::Lap];

    /// Weld volume per mm of joint per mm of thickness
    pub fn deposition_factor(&self) -> f64 {
        match self {
            JointType::Butt => 1.2,
            JointType::Fillet => 0.5,
            JointType::Lap => 0.6,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            JointType::Butt => "Butt Joint",
            JointType::Fillet => "Fillet Joint",
            JointType::Lap => "Lap Joint",
        }
    }

    /// Matching entry in the joints guide
    pub fn reference(&self) -> Option<&'static JointReference> {
        find_joint(self.display_name())
    }

    /// Parse from common string representations.
    ///
    /// Unknown names are rejected rather than estimated with a neutral factor.
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "butt" | "butt joint" | "butt weld" => Ok(JointType::Butt),
            "fillet" | "fillet joint" | "fillet weld" => Ok(JointType::Fillet),
            "lap" | "lap joint" | "lap weld" => Ok(JointType::Lap),
            _ => Err(CalcError::unknown_joint_type(s)),
        }
    }
}

impl std::fmt::Display for JointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for JointType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JointType::from_str_flexible(s)
    }
}

/// Input parameters for a material estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "joint_length_mm": 1000.0,
///   "thickness_mm": 10.0,
///   "joint_type": "butt"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInput {
    /// Length of the joint to weld (mm)
    pub joint_length_mm: f64,

    /// Material thickness (mm)
    pub thickness_mm: f64,

    /// Joint configuration
    #[serde(default)]
    pub joint_type: JointType,
}

impl MaterialInput {
    pub fn new(joint_length_mm: f64, thickness_mm: f64, joint_type: JointType) -> Self {
        MaterialInput {
            joint_length_mm,
            thickness_mm,
            joint_type,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.joint_length_mm.is_finite() || self.joint_length_mm <= 0.0 {
            return Err(CalcError::invalid_length(
                "joint_length_mm",
                self.joint_length_mm.to_string(),
                "Please enter a valid, positive joint length",
            ));
        }
        if !self.thickness_mm.is_finite() || self.thickness_mm <= 0.0 {
            return Err(CalcError::invalid_length(
                "thickness_mm",
                self.thickness_mm.to_string(),
                "Please enter a valid, positive material thickness",
            ));
        }
        Ok(())
    }

    /// Weld bead volume V = L × t × factor
    pub fn weld_volume(&self) -> CubicMillimeters {
        CubicMillimeters(self.joint_length_mm * self.thickness_mm * self.joint_type.deposition_factor())
    }

    /// Joint length as a typed quantity
    pub fn joint_length(&self) -> Millimeters {
        Millimeters(self.joint_length_mm)
    }
}

/// Results from a material estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "weld_volume_mm3": 12000.0,
///   "rods_needed": 5,
///   "time_minutes": 6.666666666666667
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialResult {
    /// Estimated weld bead volume (mm³)
    pub weld_volume_mm3: f64,
    /// Rods to have on hand (always at least 1)
    pub rods_needed: u64,
    /// Estimated arc time (minutes)
    pub time_minutes: f64,
}

impl MaterialResult {
    /// Arc time as a typed quantity
    pub fn time(&self) -> Minutes {
        Minutes(self.time_minutes)
    }
}

/// Estimate rods and time for a joint.
///
/// # Arguments
///
/// * `joint_length_mm` - Joint length (mm)
/// * `thickness_mm` - Material thickness (mm)
/// * `joint_type` - Joint configuration
///
/// # Returns
///
/// * `Ok(MaterialResult)` - The estimate
/// * `Err(CalcError::InvalidLength)` - If a dimension is not a positive number
pub fn estimate_material(joint_length_mm: f64, thickness_mm: f64, joint_type: JointType) -> CalcResult<MaterialResult> {
    calculate(&MaterialInput::new(joint_length_mm, thickness_mm, joint_type))
}

/// Calculate a material estimate from an input record.
pub fn calculate(input: &MaterialInput) -> CalcResult<MaterialResult> {
    input.validate()?;

    let volume = input.weld_volume();
    let rods = (volume.0 / ROD_DEPOSIT_VOLUME_MM3).ceil();
    if !rods.is_finite() || rods >= u64::MAX as f64 {
        return Err(CalcError::invalid_length(
            "joint_length_mm",
            input.joint_length_mm.to_string(),
            "Joint is too large to estimate",
        ));
    }
    let rods_needed = rods as u64;
    let time = Minutes(input.joint_length().0 / TRAVEL_SPEED_MM_PER_MIN);

    tracing::debug!(
        joint_type = %input.joint_type,
        weld_volume_mm3 = volume.0,
        rods_needed,
        "estimated material"
    );

    Ok(MaterialResult {
        weld_volume_mm3: volume.0,
        rods_needed,
        time_minutes: time.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_butt_joint_estimate() {
        let est = estimate_material(1000.0, 10.0, JointType::Butt).unwrap();
        // V = 1000 * 10 * 1.2 = 12000 mm³ -> ceil(12000 / 2800) = 5
        assert!((est.weld_volume_mm3 - 12000.0).abs() < 1e-9);
        assert_eq!(est.rods_needed, 5);
        // 1000 / 150 = 6.67 min
        assert!((est.time_minutes - 6.6667).abs() < 0.001);
    }

    #[test]
    fn test_fillet_and_lap_factors() {
        let fillet = estimate_material(1000.0, 10.0, JointType::Fillet).unwrap();
        assert!((fillet.weld_volume_mm3 - 5000.0).abs() < 1e-9);
        assert_eq!(fillet.rods_needed, 2);

        let lap = estimate_material(1000.0, 10.0, JointType::Lap).unwrap();
        assert!((lap.weld_volume_mm3 - 6000.0).abs() < 1e-9);
        assert_eq!(lap.rods_needed, 3);
    }

    #[test]
    fn test_tiny_joint_still_needs_a_rod() {
        let est = estimate_material(1.0, 1.0, JointType::Fillet).unwrap();
        assert_eq!(est.rods_needed, 1);
        assert!(est.time_minutes > 0.0);
    }

    #[test]
    fn test_exact_multiple_does_not_round_up() {
        // 2800 * 3 = 8400 = 1400 * 5 * 1.2
        let est = estimate_material(1400.0, 5.0, JointType::Butt).unwrap();
        assert_eq!(est.rods_needed, 3);
    }

    #[test]
    fn test_invalid_dimensions_name_the_field() {
        match estimate_material(0.0, 10.0, JointType::Butt).unwrap_err() {
            CalcError::InvalidLength { field, .. } => assert_eq!(field, "joint_length_mm"),
            other => panic!("unexpected error {:?}", other),
        }
        match estimate_material(100.0, -2.0, JointType::Butt).unwrap_err() {
            CalcError::InvalidLength { field, .. } => assert_eq!(field, "thickness_mm"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(estimate_material(f64::NAN, 10.0, JointType::Lap).is_err());
    }

    #[test]
    fn test_oversized_joint_is_rejected() {
        // volume overflows to infinity
        let err = estimate_material(f64::MAX, 10.0, JointType::Butt).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_LENGTH");

        // finite volume, but more rods than a u64 holds
        let err = estimate_material(1.0e20, 1.0e10, JointType::Lap).unwrap_err();
        match err {
            CalcError::InvalidLength { reason, .. } => assert!(reason.contains("too large")),
            other => panic!("unexpected error {:?}", other),
        }

        let big = estimate_material(1.0e10, 1.0e6, JointType::Butt).unwrap();
        assert!(big.rods_needed > 1_000_000);
    }

    #[test]
    fn test_unknown_joint_type_is_rejected() {
        assert_eq!(JointType::from_str_flexible("Fillet Weld").unwrap(), JointType::Fillet);
        assert_eq!("LAP".parse::<JointType>().unwrap(), JointType::Lap);
        let err = JointType::from_str_flexible("plug").unwrap_err();
        assert_eq!(err, CalcError::unknown_joint_type("plug"));
    }

    #[test]
    fn test_joint_types_link_to_guide() {
        for joint in JointType::ALL {
            let entry = joint.reference().expect("every estimator joint is in the guide");
            assert_eq!(entry.name, joint.display_name());
        }
    }

    #[test]
    fn test_idempotent() {
        let a = estimate_material(733.0, 6.4, JointType::Lap).unwrap();
        let b = estimate_material(733.0, 6.4, JointType::Lap).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.time_minutes.to_bits(), b.time_minutes.to_bits());
    }

    #[test]
    fn test_unknown_joint_in_json_is_rejected() {
        let parsed: Result<MaterialInput, _> = serde_json::from_str(
            r#"{"joint_length_mm": 100.0, "thickness_mm": 5.0, "joint_type": "plug"}"#,
        );
        assert!(parsed.is_err());
    }
}
