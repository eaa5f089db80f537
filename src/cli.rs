//! Command line interface.

use crate::config::{PolicyTemplate, TEMPLATE_ENV};
use crate::output::write_policy;
use crate::processing::ExportOptions;
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Build a per-campus source IP access policy from a campus IP range export.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct CliArgs {
    /// Campus IP range export (CSV blocks separated by blank lines)
    pub csv: PathBuf,

    /// JSON file overriding parts of the built-in policy template
    #[arg(short, long, env = TEMPLATE_ENV)]
    pub template: Option<PathBuf>,

    /// Write the policy to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log and skip invalid records instead of stopping at the first one
    #[arg(long)]
    pub skip_invalid: bool,

    /// log4rs configuration file
    #[arg(long, default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}

impl CliArgs {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            skip_invalid_records: self.skip_invalid,
        }
    }
}

/// Generate the policy described by `args` and write it out.
pub fn run(args: &CliArgs) -> Result<(), Box<dyn Error>> {
    log::debug!("run({:?})", args);
    let template = PolicyTemplate::load_or_default(args.template.as_deref())?;
    let policy = crate::generate_policy(&args.csv, &template, &args.export_options())?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Error creating output file {}: {e}", path.display()))?;
            write_policy(&policy, BufWriter::new(file))?;
            log::info!("Policy written to {}", path.display());
        }
        None => write_policy(&policy, std::io::stdout().lock())?,
    }

    Ok(())
}
