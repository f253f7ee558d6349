//! Bracket generator
//!
//! Command-line front end for the dovetail-brackets library:
//! - Write OpenSCAD source for either bracket
//! - Export one or both brackets as a 3MF package
//! - Run the geometric sanity checks
//!
//! Set `RUST_LOG=debug` to see every lowered object.

#![forbid(unsafe_code)]

use clap::{Parser, Subcommand, ValueEnum};
use dovetail_brackets::brackets::{LOWER_BRACKET, UPPER_BRACKET};
use dovetail_brackets::checks::{self, Severity};
use dovetail_brackets::scad::to_scad;
use dovetail_brackets::{DesignConfig, Model, Part};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the bracket generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON design file; missing fields take default values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Circle facet count, overriding the design file
    #[arg(short, long, value_name = "N")]
    facets: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write OpenSCAD source for one bracket
    Scad {
        /// Which bracket to write
        #[arg(short, long, value_enum)]
        part: PartArg,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Export brackets as a 3MF package
    Export {
        /// Output .3mf file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Brackets to export (both when omitted)
        #[arg(short, long, value_enum)]
        part: Vec<PartArg>,
    },
    /// Run the geometric sanity checks
    Check,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PartArg {
    Upper,
    Lower,
}

impl PartArg {
    fn name(self) -> &'static str {
        match self {
            PartArg::Upper => UPPER_BRACKET,
            PartArg::Lower => LOWER_BRACKET,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut design = match args.config {
        Some(ref path) => {
            info!(path = %path.display(), "Loading design");
            DesignConfig::from_path(path)?
        }
        None => DesignConfig::default(),
    };
    if let Some(facets) = args.facets {
        design.facets = facets;
    }

    match args.command {
        Command::Scad { part, output } => {
            let part = design.part(part.name())?;
            let source = to_scad(&part, design.facets)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, source)?;
                    info!(part = %part.name, path = %path.display(), "Wrote OpenSCAD source");
                }
                None => print!("{}", source),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { output, part } => {
            let parts: Vec<Part> = if part.is_empty() {
                design.parts()?
            } else {
                part.iter()
                    .map(|p| design.part(p.name()))
                    .collect::<Result<_, _>>()?
            };

            let model = Model::from_parts(&parts, &design.export_config())?;
            model.write_to_file(&output)?;
            info!(
                path = %output.display(),
                objects = model.resources.objects.len(),
                "Wrote 3MF package"
            );
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let report = checks::check_all(&design)?;
            for finding in &report.findings {
                let label = match finding.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                };
                println!("{}: [{}] {}", label, finding.check, finding.message);
            }
            println!(
                "{} checks run, {} finding(s)",
                report.checks.len(),
                report.findings.len()
            );
            Ok(if report.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
