//! # PDF Generation Module
//!
//! Renders welding plans and invoices to PDF using Typst.
//!
//! ## Architecture
//!
//! - Typst templates are embedded as string constants
//! - Data is injected by placeholder replacement before compilation; user text
//!   goes in as Typst string literals so it is never parsed as markup
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use weld_core::calculations::plan_spacing;
//! use weld_core::pdf::render_plan_pdf;
//! use weld_core::settings::ToolkitSettings;
//! use weld_core::units::LengthUnit;
//!
//! let plan = plan_spacing(6000.0, LengthUnit::Mm, 12.0).unwrap();
//! let pdf_bytes = render_plan_pdf(Some(&plan), None, &ToolkitSettings::default()).unwrap();
//! std::fs::write("welding-plan.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Local;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::{MaterialInput, MaterialResult, SpacingResult};
use crate::errors::{CalcError, CalcResult};
use crate::invoice::{line_amount, Invoice};
use crate::report::{estimate_summary, format_length, format_money, spacing_bars, DEFAULT_MAX_BARS};
use crate::settings::ToolkitSettings;

/// Rows printed in the spacing table before the rest are summarised
pub const MAX_PDF_ROWS: usize = 500;

/// Chart colours, indexed by `SpacingBar::color_index`
const BAR_COLORS: [&str; 5] = ["#e4572e", "#29335c", "#f3a712", "#669bbc", "#a8c686"];

// ============================================================================
// Typst World Implementation
// ============================================================================

/// Bundled fonts, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

static FONT_BOOK: Lazy<LazyHash<FontBook>> = Lazy::new(|| LazyHash::new(FontBook::from_fonts(FONTS.iter())));

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONT_BOOK
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Local::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup shared by both documents
const PAGE_PREAMBLE: &str = r##"
#set page(
  paper: "{{PAPER}}",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 8pt, fill: gray)[WeldEase Planner]],
      align(right)[#text(size: 8pt, fill: gray)[{{DATE}} - Page #counter(page).display()]],
    )
  ]
)

#set text(font: ("Libertinus Serif", "DejaVu Sans Mono"), size: 10pt)
"##;

const PLAN_TITLE: &str = r##"
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Welding Plan]
    #v(2pt)
    #text(size: 10pt, fill: gray)[Prepared by #{{WELDER}}]
  ]
]
#v(12pt)
"##;

const SPACING_SECTION: &str = r##"
== Spacing Plan

#grid(
  columns: (1fr, 1fr, 1fr),
  [Pipe length: *#{{LENGTH}}*],
  [Rods: *{{RODS}}*],
  [Coverage per rod: *#{{COVERAGE}}*],
)

#v(8pt)
=== Graphical Plan
#block(width: 100%, height: 22pt, clip: true, radius: 3pt, stroke: 0.5pt + gray)[
  #stack(dir: ltr, {{BARS}})
]
#text(size: 8pt, fill: gray)[{{BAR_NOTE}}]

#v(8pt)
=== Rod Table
#table(
  columns: (auto, 1fr, 1fr),
  inset: 6pt,
  stroke: 0.5pt,
  align: (center, right, right),
  table.header([*Rod \#*], [*Start Point*], [*End Point*]),
  {{ROWS}}
)
{{ROW_NOTE}}
"##;

const ESTIMATE_SECTION: &str = r##"
#v(12pt)
== Material Estimate

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  [Joint type], [#{{JOINT}}],
  [Joint length], [{{JOINT_LENGTH}} mm],
  [Material thickness], [{{THICKNESS}} mm],
  [Weld volume], [{{VOLUME}} mm³],
  [*Estimated rods needed*], [*{{ROD_COUNT}}*],
  [*Estimated welding time*], [*{{TIME}}*],
)
#text(size: 8pt, fill: gray)[Assumes 2800 mm³ deposit per rod and 150 mm/min travel speed.]
"##;

const INVOICE_TEMPLATE: &str = r##"
#grid(
  columns: (1fr, 1fr),
  [
    #text(size: 24pt, weight: "bold")[Invoice]
    #v(2pt)
    #text(fill: gray)[From: #{{WELDER}}]
    #v(2pt)
    #text(fill: gray)[Date: {{ISSUED}}]
  ],
  align(right)[
    #text(size: 13pt, weight: "bold")[Bill To:]
    #v(2pt)
    #{{CLIENT}}
  ],
)

#v(16pt)
*Job:* #{{JOB}}

#v(8pt)
#table(
  columns: (1fr, auto, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  fill: (_, y) => if y == 0 { rgb("#f0f0f0") },
  align: (left, center, center, center, right),
  table.header([*Description*], [*Quantity*], [*Kgs*], [*Unit Price*], [*Amount*]),
  {{ROWS}}
)

#v(8pt)
#align(right)[#text(size: 14pt, weight: "bold")[Total Amount: #{{TOTAL}}]]

#v(24pt)
#align(center)[
  #text(size: 9pt, fill: gray)[Thank you for your business!]
  #v(2pt)
  #text(size: 9pt, fill: gray)[Prepared by: #{{WELDER}}]
]
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Render a welding plan: spacing table and chart, material estimate, or both.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF bytes
/// * `Err(CalcError)` - If there is nothing to render or rendering fails
pub fn render_plan_pdf(
    spacing: Option<&SpacingResult>,
    estimate: Option<(&MaterialInput, &MaterialResult)>,
    settings: &ToolkitSettings,
) -> CalcResult<Vec<u8>> {
    if spacing.is_none() && estimate.is_none() {
        return Err(CalcError::missing_field("results"));
    }

    let mut source = preamble(settings);
    source.push_str(&fill_template(PLAN_TITLE, &[("WELDER", typst_str(&settings.welder_name).as_str())]));

    if let Some(result) = spacing {
        source.push_str(&spacing_section(result));
    }
    if let Some((input, result)) = estimate {
        source.push_str(&estimate_section(input, result));
    }

    compile_pdf(source)
}

/// Render an invoice. The invoice is validated first.
pub fn render_invoice_pdf(invoice: &Invoice, settings: &ToolkitSettings) -> CalcResult<Vec<u8>> {
    invoice.validate()?;

    let currency = &settings.currency_symbol;
    let header = &invoice.header;

    let rows: String = invoice
        .items
        .iter()
        .map(|item| {
            format!(
                "[#{}], [{}], [#{}], [#{}], [#{}],\n  ",
                typst_str(&item.description),
                format_length(item.quantity),
                typst_str(&item.weight_kg.map(format_length).unwrap_or_else(|| "-".to_string())),
                typst_str(&format_money(item.unit_price, currency)),
                typst_str(&format_money(line_amount(item), currency)),
            )
        })
        .collect();

    let mut source = preamble(settings);
    source.push_str(&fill_template(
        INVOICE_TEMPLATE,
        &[
            ("WELDER", typst_str(&header.welder_name).as_str()),
            ("CLIENT", typst_str(&header.client_name).as_str()),
            ("JOB", typst_str(&header.job_description).as_str()),
            ("ISSUED", header.issued.format("%Y-%m-%d").to_string().as_str()),
            ("TOTAL", typst_str(&format_money(invoice.total(), currency)).as_str()),
            ("ROWS", rows.as_str()),
        ],
    ));

    compile_pdf(source)
}

fn preamble(settings: &ToolkitSettings) -> String {
    fill_template(
        PAGE_PREAMBLE,
        &[
            ("PAPER", settings.paper.typst_name()),
            ("DATE", Local::now().format("%Y-%m-%d").to_string().as_str()),
        ],
    )
}

fn spacing_section(result: &SpacingResult) -> String {
    let unit = result.unit;

    let bars = spacing_bars(result, DEFAULT_MAX_BARS);
    let bar_source: String = bars
        .iter()
        .map(|bar| {
            format!(
                "rect(width: {:.4}%, height: 22pt, fill: rgb(\"{}\"), stroke: none), ",
                (bar.width_fraction * 100.0).max(0.0),
                BAR_COLORS[bar.color_index % BAR_COLORS.len()],
            )
        })
        .collect();
    let bar_note = if bars.len() == result.rod_count {
        "Each band is one rod.".to_string()
    } else {
        format!(
            "Each band groups {} consecutive rods.",
            result.rod_count.div_ceil(bars.len().max(1))
        )
    };

    let rows: String = result
        .plan
        .iter()
        .take(MAX_PDF_ROWS)
        .map(|seg| {
            format!(
                "[{}], [{} {}], [{} {}],\n  ",
                seg.rod,
                format_length(seg.start),
                unit,
                format_length(seg.end),
                unit
            )
        })
        .collect();
    let row_note = if result.plan.len() > MAX_PDF_ROWS {
        format!(
            "#text(size: 8pt, fill: gray)[{} more rods not listed. The last rod ends at {} {}.]",
            result.plan.len() - MAX_PDF_ROWS,
            format_length(result.planned_end()),
            unit
        )
    } else {
        String::new()
    };

    fill_template(
        SPACING_SECTION,
        &[
            ("LENGTH", typst_str(&format!("{} {}", format_length(result.total_length), unit)).as_str()),
            ("RODS", result.rod_count.to_string().as_str()),
            ("COVERAGE", typst_str(&format!("{} {}", format_length(result.coverage), unit)).as_str()),
            ("BARS", bar_source.as_str()),
            ("BAR_NOTE", bar_note.as_str()),
            ("ROWS", rows.as_str()),
            ("ROW_NOTE", row_note.as_str()),
        ],
    )
}

fn estimate_section(input: &MaterialInput, result: &MaterialResult) -> String {
    let summary = estimate_summary(result);
    fill_template(
        ESTIMATE_SECTION,
        &[
            ("JOINT", typst_str(input.joint_type.display_name()).as_str()),
            ("JOINT_LENGTH", format_length(input.joint_length_mm).as_str()),
            ("THICKNESS", format_length(input.thickness_mm).as_str()),
            ("VOLUME", format!("{:.0}", result.weld_volume_mm3).as_str()),
            ("ROD_COUNT", summary.rods.as_str()),
            ("TIME", summary.time.as_str()),
        ],
    )
}

/// Substitute `{{KEY}}` placeholders in a single left-to-right pass.
///
/// Inserted values are never scanned again, so text that happens to contain
/// `{{...}}` is copied as-is. Unknown keys are left in place.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let hit = after.find("}}").and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors
            .iter()
            .map(|e| e.message.to_string())
            .collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })?;

    tracing::debug!(bytes = pdf_bytes.len(), "rendered PDF");
    Ok(pdf_bytes)
}

/// Quote text as a Typst string literal (used after `#` in markup).
fn typst_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
