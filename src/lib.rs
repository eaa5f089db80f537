pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod processing;

use config::PolicyTemplate;
use output::{build_policy, PolicyDocument};
use processing::{read_campus_export, ExportOptions};
use std::error::Error;
use std::path::Path;

pub use models::{parse_address, AddressError, Campus, CidrBlock, IpRange};
pub use processing::summarize_range;

/// Read a campus export and build its policy document.
pub fn generate_policy<P: AsRef<Path>>(
    csv: P,
    template: &PolicyTemplate,
    opts: &ExportOptions,
) -> Result<PolicyDocument, Box<dyn Error>> {
    let campuses = read_campus_export(csv, opts)?;
    for campus in campuses.iter() {
        log::info!(
            "Campus '{}': {} block(s)",
            campus.name,
            campus.ranges.len()
        );
    }
    Ok(build_policy(template, &campuses))
}
