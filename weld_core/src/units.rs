//! # Unit Types
//!
//! Length units for welding layouts plus light newtype wrappers for the
//! quantities the estimator produces.
//!
//! ## Conversion Table
//!
//! Every length unit is a fixed scale factor relative to millimeters:
//!
//! | Unit | Factor |
//! |------|--------|
//! | mm   | 1      |
//! | cm   | 10     |
//! | m    | 1000   |
//! | in   | 25.4   |
//! | ft   | 304.8  |
//!
//! No rounding happens here; formatting for display lives in [`crate::report`].
//!
//! ## Example
//!
//! ```rust
//! use weld_core::units::{from_millimeters, to_millimeters, Length, LengthUnit};
//!
//! assert_eq!(to_millimeters(2.0, LengthUnit::Ft), 609.6);
//! assert_eq!(from_millimeters(1500.0, LengthUnit::M), 1.5);
//!
//! let pipe = Length::new(6.0, LengthUnit::M);
//! assert_eq!(pipe.to(LengthUnit::Cm).magnitude, 600.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Length Units
// ============================================================================

/// Supported length units. The set is closed; front ends present it as a
/// fixed choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Millimeters
    #[default]
    Mm,
    /// Centimeters
    Cm,
    /// Meters
    M,
    /// Inches
    In,
    /// Feet
    Ft,
}

impl LengthUnit {
    /// All units, in the order they are offered for selection
    pub const ALL: [LengthUnit; 5] = [
        LengthUnit::Mm,
        LengthUnit::Cm,
        LengthUnit::M,
        LengthUnit::In,
        LengthUnit::Ft,
    ];

    /// Millimeters per one of this unit
    pub fn mm_factor(&self) -> f64 {
        match self {
            LengthUnit::Mm => 1.0,
            LengthUnit::Cm => 10.0,
            LengthUnit::M => 1000.0,
            LengthUnit::In => 25.4,
            LengthUnit::Ft => 304.8,
        }
    }

    /// Short symbol used in tables ("mm", "in", ...)
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Mm => "mm",
            LengthUnit::Cm => "cm",
            LengthUnit::M => "m",
            LengthUnit::In => "in",
            LengthUnit::Ft => "ft",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            LengthUnit::Mm => "Millimeters",
            LengthUnit::Cm => "Centimeters",
            LengthUnit::M => "Meters",
            LengthUnit::In => "Inches",
            LengthUnit::Ft => "Feet",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Ok(LengthUnit::Mm),
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => Ok(LengthUnit::Cm),
            "m" | "meter" | "meters" | "metre" | "metres" => Ok(LengthUnit::M),
            "in" | "inch" | "inches" | "\"" => Ok(LengthUnit::In),
            "ft" | "foot" | "feet" | "'" => Ok(LengthUnit::Ft),
            _ => Err(CalcError::invalid_input(
                "unit",
                s,
                "Unit must be one of mm, cm, m, in, ft",
            )),
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LengthUnit::from_str_flexible(s)
    }
}

/// Convert a value in `unit` to millimeters.
pub fn to_millimeters(value: f64, unit: LengthUnit) -> f64 {
    value * unit.mm_factor()
}

/// Convert a millimeter value to `unit`.
pub fn from_millimeters(mm_value: f64, unit: LengthUnit) -> f64 {
    mm_value / unit.mm_factor()
}

/// A magnitude tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub magnitude: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn new(magnitude: f64, unit: LengthUnit) -> Self {
        Length { magnitude, unit }
    }

    /// This length in millimeters
    pub fn millimeters(&self) -> Millimeters {
        Millimeters(to_millimeters(self.magnitude, self.unit))
    }

    /// Same length expressed in another unit. The source is left untouched.
    pub fn to(&self, unit: LengthUnit) -> Length {
        Length {
            magnitude: from_millimeters(self.millimeters().0, unit),
            unit,
        }
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

// ============================================================================
// Quantity Newtypes
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Volume in cubic millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMillimeters(pub f64);

/// Duration in minutes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Minutes(pub f64);

impl From<Millimeters> for Length {
    fn from(mm: Millimeters) -> Self {
        Length::new(mm.0, LengthUnit::Mm)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(CubicMillimeters);
impl_arithmetic!(Minutes);

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_conversion_factors() {
        assert_eq!(to_millimeters(1.0, LengthUnit::Mm), 1.0);
        assert_eq!(to_millimeters(3.0, LengthUnit::Cm), 30.0);
        assert_eq!(to_millimeters(1.5, LengthUnit::M), 1500.0);
        assert_eq!(to_millimeters(1.0, LengthUnit::In), 25.4);
        assert_eq!(to_millimeters(1.0, LengthUnit::Ft), 304.8);
    }

    #[test]
    fn test_length_conversion_leaves_source() {
        let pipe = Length::new(2.0, LengthUnit::Ft);
        let inches = pipe.to(LengthUnit::In);
        assert!((inches.magnitude - 24.0).abs() < 1e-9);
        assert_eq!(pipe.magnitude, 2.0);
        assert_eq!(pipe.unit, LengthUnit::Ft);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(LengthUnit::from_str_flexible("MM").unwrap(), LengthUnit::Mm);
        assert_eq!(LengthUnit::from_str_flexible(" feet ").unwrap(), LengthUnit::Ft);
        assert_eq!("in".parse::<LengthUnit>().unwrap(), LengthUnit::In);
        let err = LengthUnit::from_str_flexible("yd").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(10.0);
        let b = Millimeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&LengthUnit::Ft).unwrap();
        assert_eq!(json, "\"ft\"");
        let len = Length::new(12.5, LengthUnit::Cm);
        let roundtrip: Length = serde_json::from_str(&serde_json::to_string(&len).unwrap()).unwrap();
        assert_eq!(len, roundtrip);
        assert_eq!(serde_json::to_string(&Minutes(6.5)).unwrap(), "6.5");
    }

    proptest! {
        #[test]
        fn unit_round_trip(x in -1.0e9f64..1.0e9, idx in 0usize..5) {
            let unit = LengthUnit::ALL[idx];
            let back = from_millimeters(to_millimeters(x, unit), unit);
            let tolerance = 1e-9 * x.abs().max(1.0);
            prop_assert!((back - x).abs() <= tolerance);
        }
    }
}
