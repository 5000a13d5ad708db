//! # Export & Share
//!
//! Turning a displayed result into a document and handing it somewhere.
//!
//! The calculation engine knows nothing about documents. Front ends describe
//! what is on screen with a [`ResultsRegion`] and pass it to an [`Exporter`],
//! which renders bytes and optionally offers them to a share mechanism.
//!
//! Share outcomes are data, not errors: a user cancelling a share is normal and
//! [`ShareOutcome::into_result`] maps it to `Ok(false)`. Only a missing
//! capability or a real failure becomes a [`CalcError`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use weld_core::calculations::plan_spacing;
//! use weld_core::export::{save_document, Exporter, PdfExporter, ResultsRegion};
//! use weld_core::settings::ToolkitSettings;
//! use weld_core::units::LengthUnit;
//! use std::path::Path;
//!
//! let plan = plan_spacing(6000.0, LengthUnit::Mm, 12.0).unwrap();
//! let exporter = PdfExporter::new(ToolkitSettings::default());
//! let doc = exporter.render(&ResultsRegion::spacing(plan)).unwrap();
//! save_document(&doc, Path::new(&doc.file_name)).unwrap();
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calculations::{MaterialInput, MaterialResult, SpacingResult};
use crate::errors::{CalcError, CalcResult};
use crate::invoice::Invoice;
use crate::pdf::{render_invoice_pdf, render_plan_pdf};
use crate::settings::ToolkitSettings;

/// A material estimate together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    pub input: MaterialInput,
    pub result: MaterialResult,
}

/// What is currently displayed and should be exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ResultsRegion {
    /// Calculator results: spacing plan, estimate, or both
    Plan {
        spacing: Option<SpacingResult>,
        estimate: Option<EstimateRecord>,
    },
    /// A completed invoice
    Invoice(Invoice),
}

impl ResultsRegion {
    pub fn spacing(result: SpacingResult) -> Self {
        ResultsRegion::Plan {
            spacing: Some(result),
            estimate: None,
        }
    }

    pub fn estimate(input: MaterialInput, result: MaterialResult) -> Self {
        ResultsRegion::Plan {
            spacing: None,
            estimate: Some(EstimateRecord { input, result }),
        }
    }

    /// Suggested download name
    pub fn file_name(&self) -> &'static str {
        match self {
            ResultsRegion::Plan { .. } => "welding-plan.pdf",
            ResultsRegion::Invoice(_) => "invoice.pdf",
        }
    }

    /// Share sheet title
    pub fn title(&self) -> &'static str {
        match self {
            ResultsRegion::Plan { .. } => "Welding Plan",
            ResultsRegion::Invoice(_) => "Invoice",
        }
    }
}

/// Rendered bytes ready to save or share
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub media_type: &'static str,
    pub file_name: String,
}

/// Text accompanying a shared document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareMetadata {
    pub title: String,
    pub text: String,
}

impl ShareMetadata {
    /// Default metadata for a region
    pub fn for_region(region: &ResultsRegion) -> Self {
        ShareMetadata {
            title: region.title().to_string(),
            text: format!(
                "Here is the {} I generated with WeldEase Planner.",
                region.title().to_lowercase()
            ),
        }
    }
}

/// How a share attempt ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason")]
pub enum ShareOutcome {
    Completed,
    /// User dismissed the share; not an error
    Cancelled,
    /// No share mechanism in this environment
    Unsupported,
    Failed(String),
}

impl ShareOutcome {
    /// `Ok(true)` when shared, `Ok(false)` when cancelled, errors otherwise.
    pub fn into_result(self) -> CalcResult<bool> {
        match self {
            ShareOutcome::Completed => Ok(true),
            ShareOutcome::Cancelled => Ok(false),
            ShareOutcome::Unsupported => Err(CalcError::unsupported_environment("share")),
            ShareOutcome::Failed(reason) => Err(CalcError::export_failed("share", reason)),
        }
    }
}

/// Renders displayed results and hands them to the host environment.
pub trait Exporter {
    /// Render a region to document bytes.
    fn render(&self, region: &ResultsRegion) -> CalcResult<RenderedDocument>;

    /// Offer a rendered document to the platform share mechanism.
    fn offer_share(&self, document: &RenderedDocument, metadata: &ShareMetadata) -> ShareOutcome;

    /// Render then share, mapping the outcome per [`ShareOutcome::into_result`].
    fn render_and_share(&self, region: &ResultsRegion) -> CalcResult<bool> {
        let document = self.render(region)?;
        self.offer_share(&document, &ShareMetadata::for_region(region))
            .into_result()
    }
}

/// Typst-backed exporter producing PDF documents.
///
/// Sharing copies the document into a share directory (a synced folder, an
/// outbox); without one configured, sharing is unsupported.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    settings: ToolkitSettings,
    share_dir: Option<PathBuf>,
}

impl PdfExporter {
    pub fn new(settings: ToolkitSettings) -> Self {
        PdfExporter {
            settings,
            share_dir: None,
        }
    }

    /// Enable sharing into `dir`
    pub fn with_share_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.share_dir = Some(dir.into());
        self
    }

    pub fn settings(&self) -> &ToolkitSettings {
        &self.settings
    }
}

impl Exporter for PdfExporter {
    fn render(&self, region: &ResultsRegion) -> CalcResult<RenderedDocument> {
        let bytes = match region {
            ResultsRegion::Plan { spacing, estimate } => render_plan_pdf(
                spacing.as_ref(),
                estimate.as_ref().map(|e| (&e.input, &e.result)),
                &self.settings,
            ),
            ResultsRegion::Invoice(invoice) => render_invoice_pdf(invoice, &self.settings),
        }
        .map_err(|err| match err {
            CalcError::Internal { message } => CalcError::export_failed("render", message),
            other => other,
        })?;

        tracing::debug!(file_name = region.file_name(), bytes = bytes.len(), "rendered document");

        Ok(RenderedDocument {
            bytes,
            media_type: "application/pdf",
            file_name: region.file_name().to_string(),
        })
    }

    fn offer_share(&self, document: &RenderedDocument, metadata: &ShareMetadata) -> ShareOutcome {
        let Some(dir) = &self.share_dir else {
            return ShareOutcome::Unsupported;
        };
        if !dir.is_dir() {
            return ShareOutcome::Failed(format!("share directory '{}' does not exist", dir.display()));
        }

        let target = dir.join(&document.file_name);
        match save_document(document, &target) {
            Ok(()) => {
                tracing::info!(title = %metadata.title, path = %target.display(), "shared document");
                ShareOutcome::Completed
            }
            Err(err) => ShareOutcome::Failed(err.to_string()),
        }
    }
}

/// Write a document with an atomic save: write to `.tmp`, sync, rename.
pub fn save_document(document: &RenderedDocument, path: &Path) -> CalcResult<()> {
    let tmp_path = path.with_extension("tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(&document.bytes).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{estimate_material, plan_spacing, JointType};
    use crate::units::LengthUnit;
    use std::cell::Cell;

    /// Exporter double that records render calls and returns a fixed outcome
    struct ScriptedExporter {
        outcome: ShareOutcome,
        renders: Cell<usize>,
    }

    impl Exporter for ScriptedExporter {
        fn render(&self, region: &ResultsRegion) -> CalcResult<RenderedDocument> {
            self.renders.set(self.renders.get() + 1);
            Ok(RenderedDocument {
                bytes: vec![1, 2, 3],
                media_type: "image/png",
                file_name: region.file_name().replace(".pdf", ".png"),
            })
        }

        fn offer_share(&self, _document: &RenderedDocument, _metadata: &ShareMetadata) -> ShareOutcome {
            self.outcome.clone()
        }
    }

    fn scripted(outcome: ShareOutcome) -> ScriptedExporter {
        ScriptedExporter {
            outcome,
            renders: Cell::new(0),
        }
    }

    fn sample_region() -> ResultsRegion {
        ResultsRegion::spacing(plan_spacing(6000.0, LengthUnit::Mm, 12.0).unwrap())
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(ShareOutcome::Completed.into_result(), Ok(true));
        assert_eq!(ShareOutcome::Cancelled.into_result(), Ok(false));
        assert_eq!(
            ShareOutcome::Unsupported.into_result().unwrap_err(),
            CalcError::unsupported_environment("share")
        );
        let err = ShareOutcome::Failed("denied".into()).into_result().unwrap_err();
        assert!(err.is_export_error());
    }

    #[test]
    fn test_cancelled_share_is_silent() {
        let exporter = scripted(ShareOutcome::Cancelled);
        assert_eq!(exporter.render_and_share(&sample_region()), Ok(false));
        assert_eq!(exporter.renders.get(), 1);
    }

    #[test]
    fn test_region_metadata() {
        let region = sample_region();
        assert_eq!(region.file_name(), "welding-plan.pdf");
        let meta = ShareMetadata::for_region(&region);
        assert_eq!(meta.title, "Welding Plan");
        assert!(meta.text.contains("welding plan"));

        let invoice = ResultsRegion::Invoice(Invoice::new("a", "b", "c"));
        assert_eq!(invoice.file_name(), "invoice.pdf");
    }

    #[test]
    fn test_pdf_exporter_without_share_dir() {
        let exporter = PdfExporter::new(ToolkitSettings::default());
        let doc = exporter.render(&sample_region()).unwrap();
        assert_eq!(doc.media_type, "application/pdf");
        assert!(doc.bytes.starts_with(b"%PDF"));

        let outcome = exporter.offer_share(&doc, &ShareMetadata::for_region(&sample_region()));
        assert_eq!(outcome, ShareOutcome::Unsupported);
    }

    #[test]
    fn test_pdf_exporter_shares_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PdfExporter::new(ToolkitSettings::default()).with_share_dir(dir.path());

        let input = MaterialInput::new(1000.0, 10.0, JointType::Butt);
        let result = estimate_material(1000.0, 10.0, JointType::Butt).unwrap();
        let region = ResultsRegion::estimate(input, result);

        assert_eq!(exporter.render_and_share(&region), Ok(true));
        let written = fs::read(dir.path().join("welding-plan.pdf")).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_share_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PdfExporter::new(ToolkitSettings::default()).with_share_dir(dir.path().join("gone"));
        let doc = RenderedDocument {
            bytes: b"%PDF-stub".to_vec(),
            media_type: "application/pdf",
            file_name: "welding-plan.pdf".to_string(),
        };
        let outcome = exporter.offer_share(&doc, &ShareMetadata::for_region(&sample_region()));
        assert!(matches!(outcome, ShareOutcome::Failed(_)));
    }

    #[test]
    fn test_invalid_invoice_render_is_input_error() {
        let exporter = PdfExporter::new(ToolkitSettings::default());
        let err = exporter
            .render(&ResultsRegion::Invoice(Invoice::new("", "b", "c")))
            .unwrap_err();
        assert!(!err.is_export_error());
    }

    #[test]
    fn test_save_document_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.pdf");
        let doc = RenderedDocument {
            bytes: b"%PDF-1.7 test".to_vec(),
            media_type: "application/pdf",
            file_name: "plan.pdf".to_string(),
        };
        save_document(&doc, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), doc.bytes);
        assert!(!dir.path().join("plan.tmp").exists());
    }
}
