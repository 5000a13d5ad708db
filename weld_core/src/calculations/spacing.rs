//! # Rod Spacing Calculation
//!
//! Splits a pipe or seam length into equal, contiguous segments, one per rod.
//!
//! ## Method
//!
//! 1. Convert the total length to millimeters
//! 2. Coverage per rod = total / rod count
//! 3. Rod `i` spans `[(i-1) * coverage, i * coverage]`, converted back to the
//!    caller's unit
//!
//! Adjacent segments share one computed boundary, so rod `k`'s end is exactly
//! rod `k+1`'s start.
//!
//! ## Example
//!
//! ```rust
//! use weld_core::calculations::spacing::plan_spacing;
//! use weld_core::units::LengthUnit;
//!
//! let result = plan_spacing(6000.0, LengthUnit::Mm, 12.0).unwrap();
//! assert_eq!(result.coverage, 500.0);
//! assert_eq!(result.plan.len(), 12);
//! assert_eq!(result.plan[11].start, 5500.0);
//! assert_eq!(result.plan[11].end, 6000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{from_millimeters, to_millimeters, LengthUnit};

/// Upper bound on rods in a single plan. Thin segments are allowed; this only
/// keeps a mistyped count from allocating an enormous table.
pub const MAX_ROD_COUNT: usize = 1_000_000;

/// Input parameters for a spacing plan.
///
/// `rod_count` is taken as a raw number so a fractional count can be reported
/// as such instead of being silently truncated.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_length": 6000.0,
///   "unit": "mm",
///   "rod_count": 12
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingInput {
    /// Pipe or seam length in `unit`
    pub total_length: f64,

    /// Unit for both input and output lengths
    #[serde(default)]
    pub unit: LengthUnit,

    /// Number of rods to spread over the length
    pub rod_count: f64,
}

impl SpacingInput {
    pub fn new(total_length: f64, unit: LengthUnit, rod_count: f64) -> Self {
        SpacingInput {
            total_length,
            unit,
            rod_count,
        }
    }

    /// Validate input parameters, returning the rod count as an integer.
    pub fn validate(&self) -> CalcResult<usize> {
        if !self.total_length.is_finite() || self.total_length <= 0.0 {
            return Err(CalcError::invalid_length(
                "total_length",
                self.total_length.to_string(),
                "Please enter a valid, positive pipe length",
            ));
        }
        if !self.rod_count.is_finite() || self.rod_count <= 0.0 {
            return Err(CalcError::invalid_rod_count(
                self.rod_count.to_string(),
                "Please enter a valid, positive number of rods",
            ));
        }
        if self.rod_count.fract() != 0.0 {
            return Err(CalcError::invalid_rod_count(
                self.rod_count.to_string(),
                "Number of rods must be a whole number",
            ));
        }
        if self.rod_count > MAX_ROD_COUNT as f64 {
            return Err(CalcError::invalid_rod_count(
                self.rod_count.to_string(),
                format!("Plans are limited to {} rods to bound memory use", MAX_ROD_COUNT),
            ));
        }
        Ok(self.rod_count as usize)
    }
}

/// One rod's stretch of the length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingSegment {
    /// 1-based rod number
    pub rod: usize,
    /// Start point in the plan's unit
    pub start: f64,
    /// End point in the plan's unit
    pub end: f64,
}

impl SpacingSegment {
    /// Segment length in the plan's unit
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Results from a spacing calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_length": 1000.0,
///   "unit": "mm",
///   "rod_count": 2,
///   "coverage": 500.0,
///   "plan": [
///     { "rod": 1, "start": 0.0, "end": 500.0 },
///     { "rod": 2, "start": 500.0, "end": 1000.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingResult {
    /// Total length as entered
    pub total_length: f64,
    /// Unit of every length in this record
    pub unit: LengthUnit,
    /// Number of rods (equals `plan.len()`)
    pub rod_count: usize,
    /// Average length covered by each rod
    pub coverage: f64,
    /// Segments in rod order
    pub plan: Vec<SpacingSegment>,
}

impl SpacingResult {
    /// The last segment's end point (the planned total)
    pub fn planned_end(&self) -> f64 {
        self.plan.last().map(|s| s.end).unwrap_or(0.0)
    }
}

/// Plan rod spacing over a length.
///
/// # Arguments
///
/// * `total_length` - Length to cover, in `unit`
/// * `unit` - Unit for input and output
/// * `rod_count` - Number of rods; must be a positive whole number
///
/// # Returns
///
/// * `Ok(SpacingResult)` - The plan
/// * `Err(CalcError::InvalidLength | CalcError::InvalidRodCount)` - If inputs are invalid
pub fn plan_spacing(total_length: f64, unit: LengthUnit, rod_count: f64) -> CalcResult<SpacingResult> {
    calculate(&SpacingInput::new(total_length, unit, rod_count))
}

/// Calculate a spacing plan from an input record.
pub fn calculate(input: &SpacingInput) -> CalcResult<SpacingResult> {
    let rods = input.validate()?;
    let unit = input.unit;

    let total_mm = to_millimeters(input.total_length, unit);
    if !total_mm.is_finite() {
        return Err(CalcError::invalid_length(
            "total_length",
            input.total_length.to_string(),
            "Length is too large",
        ));
    }
    let coverage_mm = total_mm / rods as f64;

    // The last boundary is the total itself so rounding cannot push it past f64::MAX
    let boundary = |i: usize| {
        let mm = if i == rods { total_mm } else { i as f64 * coverage_mm };
        from_millimeters(mm, unit)
    };

    let plan: Vec<SpacingSegment> = (1..=rods)
        .map(|rod| SpacingSegment {
            rod,
            start: boundary(rod - 1),
            end: boundary(rod),
        })
        .collect();

    tracing::debug!(
        total_length = input.total_length,
        unit = %unit,
        rods,
        coverage_mm,
        "planned rod spacing"
    );

    Ok(SpacingResult {
        total_length: input.total_length,
        unit,
        rod_count: rods,
        coverage: from_millimeters(coverage_mm, unit),
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_twelve_rods_over_six_meters() {
        let result = plan_spacing(6000.0, LengthUnit::Mm, 12.0).unwrap();
        assert_eq!(result.coverage, 500.0);
        assert_eq!(result.plan.len(), 12);
        assert_eq!(result.plan[0], SpacingSegment { rod: 1, start: 0.0, end: 500.0 });
        assert_eq!(result.plan[11], SpacingSegment { rod: 12, start: 5500.0, end: 6000.0 });
    }

    #[test]
    fn test_single_rod_spans_everything() {
        let result = plan_spacing(3.5, LengthUnit::Ft, 1.0).unwrap();
        assert_eq!(result.plan.len(), 1);
        assert_eq!(result.plan[0].start, 0.0);
        assert!(close(result.plan[0].end, 3.5));
        assert!(close(result.coverage, 3.5));
    }

    #[test]
    fn test_output_in_input_unit() {
        // 1 m over 3 rods: 333.33 mm each, reported in meters
        let result = plan_spacing(1.0, LengthUnit::M, 3.0).unwrap();
        assert!(close(result.coverage, 1.0 / 3.0));
        assert!(close(result.plan[1].start, 1.0 / 3.0));
        assert!(close(result.planned_end(), 1.0));
    }

    #[test]
    fn test_thin_segments_are_allowed() {
        // More rods than millimeters is unusual but not rejected
        let result = plan_spacing(10.0, LengthUnit::Mm, 40.0).unwrap();
        assert_eq!(result.plan.len(), 40);
        assert!(close(result.coverage, 0.25));
    }

    #[test]
    fn test_invalid_length() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = plan_spacing(bad, LengthUnit::Mm, 4.0).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_LENGTH", "length {}", bad);
        }
    }

    #[test]
    fn test_invalid_rod_count_reasons() {
        let err = plan_spacing(100.0, LengthUnit::Mm, 0.0).unwrap_err();
        match err {
            CalcError::InvalidRodCount { reason, .. } => assert!(reason.contains("positive")),
            other => panic!("unexpected error {:?}", other),
        }

        let err = plan_spacing(100.0, LengthUnit::Mm, 2.5).unwrap_err();
        match err {
            CalcError::InvalidRodCount { reason, .. } => assert!(reason.contains("whole number")),
            other => panic!("unexpected error {:?}", other),
        }

        let err = plan_spacing(100.0, LengthUnit::Mm, f64::NAN).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ROD_COUNT");
    }

    #[test]
    fn test_length_checked_before_rod_count() {
        let err = plan_spacing(-1.0, LengthUnit::Mm, -1.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_LENGTH");
    }

    #[test]
    fn test_rod_count_cap() {
        match plan_spacing(100.0, LengthUnit::Mm, (MAX_ROD_COUNT + 1) as f64).unwrap_err() {
            CalcError::InvalidRodCount { reason, .. } => assert!(reason.contains("limited to")),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(plan_spacing(100.0, LengthUnit::Mm, MAX_ROD_COUNT as f64).unwrap().plan.len(), MAX_ROD_COUNT);
    }

    #[test]
    fn test_length_overflowing_millimeters_is_rejected() {
        // 1e308 ft is finite but not in millimeters
        match plan_spacing(1.0e308, LengthUnit::Ft, 4.0).unwrap_err() {
            CalcError::InvalidLength { field, reason, .. } => {
                assert_eq!(field, "total_length");
                assert!(reason.contains("too large"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_largest_length_stays_finite() {
        let result = plan_spacing(f64::MAX, LengthUnit::Mm, 3.0).unwrap();
        assert_eq!(result.plan[0].start, 0.0);
        assert_eq!(result.planned_end(), f64::MAX);
        assert!(result.coverage.is_finite());
        for seg in &result.plan {
            assert!(seg.start.is_finite() && seg.end.is_finite());
        }
        for pair in result.plan.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_serialization() {
        let input = SpacingInput::new(6.0, LengthUnit::M, 4.0);
        let json = serde_json::to_string(&input).unwrap();
        let roundtrip: SpacingInput = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.unit, LengthUnit::M);

        let parsed: SpacingInput =
            serde_json::from_str(r#"{"total_length": 100.0, "rod_count": 4}"#).unwrap();
        assert_eq!(parsed.unit, LengthUnit::Mm);
    }

    proptest! {
        #[test]
        fn plan_is_contiguous_and_complete(
            total in 0.001f64..1.0e6,
            rods in 1usize..500,
            idx in 0usize..5,
        ) {
            let unit = LengthUnit::ALL[idx];
            let result = plan_spacing(total, unit, rods as f64).unwrap();

            prop_assert_eq!(result.plan.len(), rods);
            prop_assert_eq!(result.plan[0].start, 0.0);
            for pair in result.plan.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                prop_assert_eq!(pair[0].rod + 1, pair[1].rod);
            }
            prop_assert!(close(result.planned_end(), total));
            prop_assert!(close(result.coverage, total / rods as f64));
        }

        #[test]
        fn plan_is_idempotent(total in 0.001f64..1.0e6, rods in 1usize..200) {
            let a = plan_spacing(total, LengthUnit::In, rods as f64).unwrap();
            let b = plan_spacing(total, LengthUnit::In, rods as f64).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn non_positive_rod_counts_rejected(rods in -1000.0f64..=0.0) {
            let err = plan_spacing(100.0, LengthUnit::Mm, rods).unwrap_err();
            prop_assert_eq!(err.error_code(), "INVALID_ROD_COUNT");
        }
    }
}
