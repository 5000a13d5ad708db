//! # Result Formatting
//!
//! Stateless projections of calculation results into what a front end shows:
//! table rows, stacked-bar segments, summary lines and plain-text blocks.
//! Nothing here changes a result; calling any function twice gives the same
//! output.

use std::fmt::Write as _;

use serde::Serialize;

use crate::calculations::{MaterialResult, SpacingResult};
use crate::invoice::{line_amount, Invoice};
use crate::joints::JointReference;

/// Default number of bars before consecutive rods are merged
pub const DEFAULT_MAX_BARS: usize = 24;

/// Number of distinct chart colours bars cycle through
pub const BAR_PALETTE_LEN: usize = 5;

const RULE: &str = "═══════════════════════════════════════";

/// Whole numbers print bare, everything else with two decimals.
pub fn format_length(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Two-decimal money amount with a currency prefix
pub fn format_money(amount: f64, currency_symbol: &str) -> String {
    format!("{}{:.2}", currency_symbol, amount)
}

/// One row of the spacing table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacingRow {
    pub rod: usize,
    pub start: String,
    pub end: String,
}

/// Table rows for a spacing plan, lengths suffixed with the unit
pub fn spacing_rows(result: &SpacingResult) -> Vec<SpacingRow> {
    result
        .plan
        .iter()
        .map(|seg| SpacingRow {
            rod: seg.rod,
            start: format!("{} {}", format_length(seg.start), result.unit),
            end: format!("{} {}", format_length(seg.end), result.unit),
        })
        .collect()
}

/// One segment of the horizontal stacked bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacingBar {
    /// "Rod 3" or "Rods 1-4" when rods are merged
    pub label: String,
    pub first_rod: usize,
    pub last_rod: usize,
    /// Where the bar starts, as a fraction of the total length
    pub offset_fraction: f64,
    /// Bar width as a fraction of the total length
    pub width_fraction: f64,
    /// Index into a palette of [`BAR_PALETTE_LEN`] colours
    pub color_index: usize,
}

/// Bars for a spacing plan.
///
/// With more rods than `max_bars`, consecutive rods share a bar. Fractions
/// always span the full length.
pub fn spacing_bars(result: &SpacingResult, max_bars: usize) -> Vec<SpacingBar> {
    let total = result.planned_end();
    if result.plan.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let per_bar = result.plan.len().div_ceil(max_bars.max(1));

    result
        .plan
        .chunks(per_bar)
        .enumerate()
        .map(|(i, chunk)| {
            let first = chunk[0];
            let last = chunk[chunk.len() - 1];
            let label = if first.rod == last.rod {
                format!("Rod {}", first.rod)
            } else {
                format!("Rods {}-{}", first.rod, last.rod)
            };
            SpacingBar {
                label,
                first_rod: first.rod,
                last_rod: last.rod,
                offset_fraction: first.start / total,
                width_fraction: (last.end - first.start) / total,
                color_index: i % BAR_PALETTE_LEN,
            }
        })
        .collect()
}

/// Headline numbers for a material estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateSummary {
    pub rods: String,
    pub time: String,
}

pub fn estimate_summary(result: &MaterialResult) -> EstimateSummary {
    EstimateSummary {
        rods: result.rods_needed.to_string(),
        time: format!("{:.1} minutes", result.time_minutes),
    }
}

/// "Each rod covers an average of ..." line
pub fn coverage_line(result: &SpacingResult) -> String {
    format!(
        "Each rod covers an average of {} {}.",
        format_length(result.coverage),
        result.unit
    )
}

/// Text bar, `width` characters wide, alternating fill characters per bar
pub fn render_bar_text(bars: &[SpacingBar], width: usize) -> String {
    const FILLS: [char; 2] = ['█', '▒'];
    let mut line = String::with_capacity(width * 3);
    let mut drawn = 0usize;
    for (i, bar) in bars.iter().enumerate() {
        let end = ((bar.offset_fraction + bar.width_fraction) * width as f64).round() as usize;
        let end = if i == bars.len() - 1 { width } else { end.min(width) };
        let cells = end.saturating_sub(drawn);
        line.extend(std::iter::repeat(FILLS[i % FILLS.len()]).take(cells));
        drawn += cells;
    }
    line
}

/// Plain-text spacing report: summary, table and bar
pub fn render_spacing_text(result: &SpacingResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  SPACING PLAN");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(
        out,
        "  Length: {} {}   Rods: {}",
        format_length(result.total_length),
        result.unit,
        result.rod_count
    );
    let _ = writeln!(out, "  {}", coverage_line(result));
    let _ = writeln!(out);

    let rows = spacing_rows(result);
    let width = rows
        .iter()
        .map(|r| r.start.len().max(r.end.len()))
        .max()
        .unwrap_or(0)
        .max("Start Point".len());
    let _ = writeln!(out, "  {:>5}  {:>w$}  {:>w$}", "Rod #", "Start Point", "End Point", w = width);
    for row in &rows {
        let _ = writeln!(out, "  {:>5}  {:>w$}  {:>w$}", row.rod, row.start, row.end, w = width);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", render_bar_text(&spacing_bars(result, DEFAULT_MAX_BARS), 60));
    out
}

/// Plain-text estimate report
pub fn render_estimate_text(result: &MaterialResult) -> String {
    let summary = estimate_summary(result);
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  MATERIAL ESTIMATE");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  Weld volume:           {:.0} mm³", result.weld_volume_mm3);
    let _ = writeln!(out, "  Estimated rods needed: {}", summary.rods);
    let _ = writeln!(out, "  Estimated welding time: {}", summary.time);
    out
}

/// Plain-text invoice
pub fn render_invoice_text(invoice: &Invoice, currency_symbol: &str) -> String {
    let header = &invoice.header;
    let mut out = String::new();
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  INVOICE");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "  From:    {}", header.welder_name);
    let _ = writeln!(out, "  Bill To: {}", header.client_name);
    let _ = writeln!(out, "  Job:     {}", header.job_description);
    let _ = writeln!(out, "  Date:    {}", header.issued.format("%Y-%m-%d"));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<24} {:>8} {:>8} {:>12} {:>12}",
        "Description", "Qty", "Kgs", "Unit Price", "Amount"
    );
    for item in &invoice.items {
        let kgs = item
            .weight_kg
            .map(format_length)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:<24} {:>8} {:>8} {:>12} {:>12}",
            item.description,
            format_length(item.quantity),
            kgs,
            format_money(item.unit_price, currency_symbol),
            format_money(line_amount(item), currency_symbol),
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  Total Amount: {}",
        format_money(invoice.total(), currency_symbol)
    );
    out
}

/// Plain-text joints guide
pub fn render_joints_text(joints: &[JointReference]) -> String {
    let mut out = String::new();
    for joint in joints {
        let _ = writeln!(out, "{}", joint.name);
        let _ = writeln!(out, "  {}", joint.description);
        for (label, text) in joint.details() {
            let _ = writeln!(out, "  - {}: {}", label, text);
        }
        let _ = writeln!(out);
    }
    out
}
