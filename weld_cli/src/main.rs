//! # WeldEase CLI Application
//!
//! Terminal front end for the welding toolkit: rod spacing, material
//! estimates, invoices and the joints guide.
//!
//! Results print as text tables, or as JSON with `--json`. `--pdf <file>`
//! saves the same results as a PDF; `--share` hands the PDF to the configured
//! share folder.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weld_core::calculations::{material, spacing, JointType, MaterialInput, SpacingInput};
use weld_core::export::{save_document, EstimateRecord, Exporter, PdfExporter, ResultsRegion, ShareMetadata};
use weld_core::invoice::Invoice;
use weld_core::joints::{all_joints, find_joint};
use weld_core::report;
use weld_core::{CalcError, LengthUnit, ToolkitSettings};

/// Environment variable naming a settings file
const CONFIG_ENV: &str = "WELDEASE_CONFIG";

#[derive(Parser, Debug)]
#[command(name = "weldease", version)]
#[command(about = "A toolkit for welders: calculate rod spacing, estimate materials, write invoices")]
struct Cli {
    /// Settings file (JSON); falls back to $WELDEASE_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spread rods evenly along a pipe or seam
    Spacing {
        #[command(flatten)]
        spacing: SpacingArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Estimate rods and welding time for a joint
    Estimate {
        #[command(flatten)]
        estimate: EstimateArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Spacing plan and material estimate in one report
    Plan {
        #[command(flatten)]
        spacing: SpacingArgs,
        #[command(flatten)]
        estimate: EstimateArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Total an invoice described in a JSON file
    Invoice {
        /// Invoice JSON (header + items)
        #[arg(long)]
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show the welding joints guide
    Joints {
        /// Show a single joint (e.g. "butt", "tee")
        #[arg(long)]
        name: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct SpacingArgs {
    /// Pipe or seam length
    #[arg(long, allow_negative_numbers = true)]
    length: f64,

    /// Length unit: mm, cm, m, in, ft (defaults to the configured unit)
    #[arg(long, value_parser = parse_unit)]
    unit: Option<LengthUnit>,

    /// Number of rods
    #[arg(long, allow_negative_numbers = true)]
    rods: f64,
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Joint length in mm
    #[arg(long, allow_negative_numbers = true)]
    joint_length: f64,

    /// Material thickness in mm
    #[arg(long, allow_negative_numbers = true)]
    thickness: f64,

    /// Joint type: butt, fillet, lap
    #[arg(long, default_value = "butt", value_parser = parse_joint_type)]
    joint_type: JointType,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Save the results as a PDF
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Share the PDF into the share folder
    #[arg(long)]
    share: bool,

    /// Share folder (overrides the settings file)
    #[arg(long)]
    share_dir: Option<PathBuf>,
}

fn parse_unit(s: &str) -> Result<LengthUnit, String> {
    LengthUnit::from_str_flexible(s).map_err(|e| e.to_string())
}

fn parse_joint_type(s: &str) -> Result<JointType, String> {
    JointType::from_str_flexible(s).map_err(|e| e.to_string())
}

/// Initialize tracing on stderr so stdout stays clean for `--json`
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "weld_cli=info,weld_core=warn",
        1 => "weld_cli=debug,weld_core=debug",
        _ => "weld_cli=trace,weld_core=trace",
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `--config`, then `$WELDEASE_CONFIG`, then built-in defaults
fn load_settings(explicit: Option<&Path>) -> anyhow::Result<ToolkitSettings> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            Ok(ToolkitSettings::load(&path)?)
        }
        None => Ok(ToolkitSettings::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<CalcError>() {
        Some(calc) if calc.is_export_error() => {
            tracing::warn!(code = calc.error_code(), "export failed");
            eprintln!("Export error: {}", calc);
        }
        Some(calc) => {
            tracing::warn!(code = calc.error_code(), "input rejected");
            eprintln!("Error: {}", calc);
            if let Ok(json) = serde_json::to_string_pretty(calc) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Spacing { spacing, output } => {
            let result = spacing::calculate(&spacing.to_input(&settings))?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_spacing_text(&result));
            }
            export(ResultsRegion::spacing(result), &output, &settings)
        }
        Commands::Estimate { estimate, output } => {
            let input = estimate.to_input();
            let result = material::calculate(&input)?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_estimate_text(&result));
            }
            export(ResultsRegion::estimate(input, result), &output, &settings)
        }
        Commands::Plan {
            spacing,
            estimate,
            output,
        } => {
            let spacing_result = spacing::calculate(&spacing.to_input(&settings))?;
            let input = estimate.to_input();
            let estimate_result = material::calculate(&input)?;
            let region = ResultsRegion::Plan {
                spacing: Some(spacing_result),
                estimate: Some(EstimateRecord {
                    input,
                    result: estimate_result,
                }),
            };
            if output.json {
                println!("{}", serde_json::to_string_pretty(&region)?);
            } else if let ResultsRegion::Plan {
                spacing: Some(s),
                estimate: Some(e),
            } = &region
            {
                print!("{}", report::render_spacing_text(s));
                println!();
                print!("{}", report::render_estimate_text(&e.result));
            }
            export(region, &output, &settings)
        }
        Commands::Invoice { file, output } => {
            let invoice = load_invoice(&file, &settings, &mut std::io::stderr())?;
            if output.json {
                let summary = serde_json::json!({
                    "invoice": &invoice,
                    "amounts": invoice.amounts(),
                    "total": invoice.total(),
                });
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", report::render_invoice_text(&invoice, &settings.currency_symbol));
            }
            export(ResultsRegion::Invoice(invoice), &output, &settings)
        }
        Commands::Joints { name, json } => {
            let joints = match name {
                Some(name) => {
                    let joint = find_joint(&name)
                        .ok_or_else(|| CalcError::invalid_input("name", name.as_str(), "No such joint in the guide"))?;
                    std::slice::from_ref(joint)
                }
                None => all_joints(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(joints)?);
            } else {
                print!("{}", report::render_joints_text(joints));
            }
            Ok(())
        }
    }
}

impl SpacingArgs {
    fn to_input(&self, settings: &ToolkitSettings) -> SpacingInput {
        SpacingInput::new(self.length, self.unit.unwrap_or(settings.default_unit), self.rods)
    }
}

impl EstimateArgs {
    fn to_input(&self) -> MaterialInput {
        MaterialInput::new(self.joint_length, self.thickness, self.joint_type)
    }
}

/// Read an invoice file, defaulting the welder name from settings.
///
/// A single problem is returned as is. With several, each is written to
/// `problems` in invoice order and a summary error is returned.
fn load_invoice(path: &Path, settings: &ToolkitSettings, problems: &mut impl Write) -> anyhow::Result<Invoice> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading invoice file '{}'", path.display()))?;
    let mut invoice = Invoice::from_json(&json)?;
    if invoice.header.welder_name.trim().is_empty() {
        invoice.header.welder_name = settings.welder_name.clone();
    }

    let mut errors = invoice.validation_errors();
    match errors.len() {
        0 => Ok(invoice),
        1 => Err(errors.remove(0).into()),
        count => {
            for err in &errors {
                writeln!(problems, "  - {}", err)?;
            }
            Err(CalcError::invalid_input(
                "invoice",
                path.display().to_string(),
                format!("{} problems found", count),
            )
            .into())
        }
    }
}

/// Save and/or share the displayed results
fn export(region: ResultsRegion, output: &OutputArgs, settings: &ToolkitSettings) -> anyhow::Result<()> {
    if output.pdf.is_none() && !output.share {
        return Ok(());
    }

    let mut exporter = PdfExporter::new(settings.clone());
    if let Some(dir) = output.share_dir.clone().or_else(|| settings.share_dir.clone()) {
        exporter = exporter.with_share_dir(dir);
    }

    let document = exporter.render(&region)?;

    if let Some(path) = &output.pdf {
        save_document(&document, path)?;
        tracing::info!(path = %path.display(), "saved PDF");
        eprintln!("Saved {}", path.display());
    }

    if output.share {
        let metadata = ShareMetadata::for_region(&region);
        if exporter.offer_share(&document, &metadata).into_result()? {
            eprintln!("Shared {}", document.file_name);
        }
    }

    Ok(())
}
