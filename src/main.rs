//! CLI for hwp2docx - HWP/HWPX to DOCX converter

use clap::{ArgAction, Parser, ValueEnum};
use hwp2docx::{ConvertOptions, ConverterKind, FontRule, HwpToDocx, Points};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "HWP/HWPX to DOCX converter with font and size control", long_about = None)]
struct Args {
    /// Source .hwp/.hwpx file
    input: PathBuf,

    /// Target .docx file
    output: PathBuf,

    /// Conversion backend
    #[arg(long, value_enum, default_value_t = Mode::Office)]
    mode: Mode,

    /// Font name for all text runs (e.g. "Batang")
    #[arg(long)]
    font_name: Option<String>,

    /// Decrease existing font sizes by this many points (in 0.5pt steps)
    #[arg(long, default_value = "0", value_parser = parse_delta)]
    size_delta: Points,

    /// Explicitly set all font sizes to this point value (in 0.5pt steps)
    #[arg(long, value_parser = parse_size)]
    font_size: Option<Points>,

    /// Office suite executable used by the office backend
    #[arg(long, default_value = hwp2docx::converter::DEFAULT_OFFICE_PROGRAM)]
    soffice: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// LibreOffice headless conversion (full fidelity)
    #[value(alias = "uno")]
    Office,
    /// Text-only extraction
    #[value(alias = "python")]
    Text,
}

impl From<Mode> for ConverterKind {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Office => ConverterKind::Office,
            Mode::Text => ConverterKind::Text,
        }
    }
}

/// Parses a point value, rejecting anything DOCX half-points cannot hold.
fn parse_delta(value: &str) -> Result<Points, String> {
    let points: Points = value.parse()?;
    let requested: f64 = value
        .trim()
        .trim_end_matches("pt")
        .parse()
        .map_err(|_| format!("'{value}' is not a number of points"))?;
    if f64::from(points.half_points()) != requested * 2.0 {
        return Err(format!("'{value}' is not a multiple of 0.5pt"));
    }
    Ok(points)
}

fn parse_size(value: &str) -> Result<Points, String> {
    let size = parse_delta(value)?;
    if size < Points::MIN {
        return Err(format!("font size must be at least {}", Points::MIN));
    }
    Ok(size)
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();

    let options = ConvertOptions {
        mode: args.mode.into(),
        font_rule: FontRule::new(args.font_name, args.font_size, args.size_delta),
        office_program: args.soffice,
    };

    let converter = HwpToDocx::new(options);

    match converter.convert(&args.input, &args.output) {
        Ok(report) => {
            if let Some(report) = report.filter(|r| !r.skipped.is_empty()) {
                eprintln!(
                    "Warning: {} element(s) left unadjusted",
                    report.skipped.len()
                );
            }
            println!(
                "Converted '{}' → '{}'",
                args.input.display(),
                args.output.display()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
