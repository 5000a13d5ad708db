//! # Toolkit Settings
//!
//! User preferences shared by every calculator: the name printed on invoices,
//! the currency symbol, the default length unit, the PDF paper size and where
//! shared documents go.
//!
//! Settings are a JSON file. Every field has a default, so a file only needs
//! the keys a user wants to change:
//!
//! ```json
//! { "welder_name": "A. Welder", "default_unit": "in" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::LengthUnit;

/// Supported PDF paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaperSize {
    #[default]
    A4,
    UsLetter,
}

impl PaperSize {
    /// Typst paper name
    pub fn typst_name(&self) -> &'static str {
        match self {
            PaperSize::A4 => "a4",
            PaperSize::UsLetter => "us-letter",
        }
    }
}

/// Preferences applied across calculators and exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitSettings {
    /// Printed as "From" / "Prepared by" on invoices
    pub welder_name: String,

    /// Prefix for money amounts
    pub currency_symbol: String,

    /// Unit used when a spacing request does not name one
    pub default_unit: LengthUnit,

    /// Paper size for PDF exports
    pub paper: PaperSize,

    /// Folder that shared documents are copied into; sharing is unavailable without one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_dir: Option<PathBuf>,
}

impl Default for ToolkitSettings {
    fn default() -> Self {
        ToolkitSettings {
            welder_name: "Welder".to_string(),
            currency_symbol: "₹".to_string(),
            default_unit: LengthUnit::Mm,
            paper: PaperSize::A4,
            share_dir: None,
        }
    }
}

impl ToolkitSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> CalcResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from JSON text.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let settings: ToolkitSettings = serde_json::from_str(json)?;
        if settings.currency_symbol.chars().count() > 4 {
            return Err(CalcError::invalid_input(
                "currency_symbol",
                settings.currency_symbol,
                "Currency symbol must be at most 4 characters",
            ));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ToolkitSettings::default();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.default_unit, LengthUnit::Mm);
        assert_eq!(settings.paper.typst_name(), "a4");
        assert!(settings.share_dir.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = ToolkitSettings::from_json(r#"{"default_unit": "ft", "paper": "us-letter"}"#).unwrap();
        assert_eq!(settings.default_unit, LengthUnit::Ft);
        assert_eq!(settings.paper, PaperSize::UsLetter);
        assert_eq!(settings.welder_name, "Welder");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ToolkitSettings::from_json(r#"{"default_unit": "yd"}"#).is_err());
        let err = ToolkitSettings::from_json(r#"{"currency_symbol": "RUPEES"}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weldease.json");
        fs::write(&path, r#"{"welder_name": "A. Welder", "currency_symbol": "$"}"#).unwrap();

        let settings = ToolkitSettings::load(&path).unwrap();
        assert_eq!(settings.welder_name, "A. Welder");
        assert_eq!(settings.currency_symbol, "$");

        let missing = ToolkitSettings::load(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(missing.error_code(), "FILE_ERROR");
    }
}
