//! Campus export parsing.
//!
//! The export is a text file of blocks separated by blank lines. The first
//! block is a file header. Every other block describes one campus:
//!
//! ```text
//! University of California, Berkeley (UCB)
//! Start,End,Description
//! 128.032.000.000,128.032.255.255,main campus
//! ```

use crate::models::{AddressError, Campus, CidrBlock, IpRange};
use crate::processing::summarize_range;
use colored::Colorize;
use regex::Regex;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

/// Regex for the short name between the first `(` and the last `)`.
static CAMPUS_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_campus_name_regex() -> &'static Regex {
    CAMPUS_NAME_REGEX.get_or_init(|| Regex::new(r"\((.*)\)").expect("Invalid Regex"))
}

/// How invalid records are handled while reading an export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    /// Log and skip invalid records instead of aborting the run.
    pub skip_invalid_records: bool,
}

/// Failure while reading a campus export. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The campus line has no `(short name)`.
    MalformedCampusHeader { line: usize, header: String },
    /// The campus block ends before its column header line.
    MissingColumnHeader { line: usize, campus: String },
    /// The record has no second (end address) field.
    MissingEndAddress {
        line: usize,
        campus: String,
        record: String,
    },
    /// An endpoint or the range itself is invalid.
    InvalidRecord {
        line: usize,
        campus: String,
        record: String,
        source: AddressError,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportError::MalformedCampusHeader { line, header } => write!(
                f,
                "line {line}: campus header '{header}' has no '(short name)'"
            ),
            ExportError::MissingColumnHeader { line, campus } => write!(
                f,
                "line {line}: campus '{campus}' has no column header line"
            ),
            ExportError::MissingEndAddress {
                line,
                campus,
                record,
            } => write!(
                f,
                "line {line}: campus '{campus}' record '{record}' has no end address"
            ),
            ExportError::InvalidRecord {
                line,
                campus,
                record,
                source,
            } => write!(
                f,
                "line {line}: campus '{campus}' record '{record}': {source}"
            ),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExportError::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Non-blank lines between blank lines, with the line number of the first one.
///
/// Block 0 is always the file header. It is empty when the text opens with a
/// blank line followed by another blank line.
#[derive(Debug)]
struct Block<'a> {
    first_line: usize,
    lines: Vec<&'a str>,
}

/// Read and parse a campus export file.
pub fn read_campus_export<P: AsRef<Path>>(
    path: P,
    opts: &ExportOptions,
) -> Result<Vec<Campus>, Box<dyn Error>> {
    let path = path.as_ref();
    log::info!("Reading campus export: {}", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading export file {}: {e}", path.display()))?;
    Ok(parse_campus_export(&text, opts)?)
}

/// Parse the text of a campus export into campuses, in input order.
pub fn parse_campus_export(text: &str, opts: &ExportOptions) -> Result<Vec<Campus>, ExportError> {
    let mut blocks = split_blocks(text).into_iter();
    if let Some(header) = blocks.next() {
        log::debug!(
            "Skipping file header block at line {} ({} line(s))",
            header.first_line,
            header.lines.len()
        );
    }

    let campuses = blocks
        .map(|block| parse_campus_block(&block, opts))
        .collect::<Result<Vec<Campus>, ExportError>>()?;

    log::info!("# Got campus count = {}", campuses.len());
    Ok(campuses)
}

/// Extract the lower-cased short name from a campus header line.
///
/// Returns None when the `( … )` pair is missing or empty.
pub fn campus_name(header: &str) -> Option<String> {
    let name = get_campus_name_regex()
        .captures(header)?
        .get(1)?
        .as_str()
        .trim()
        .to_lowercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if let Some(block) = current.take() {
                blocks.push(block);
            } else if blocks.is_empty() && i > 0 {
                // Blank lines at the top: the file header block is empty
                blocks.push(Block {
                    first_line: 1,
                    lines: vec![],
                });
            }
        } else {
            current
                .get_or_insert_with(|| Block {
                    first_line: i + 1,
                    lines: vec![],
                })
                .lines
                .push(line);
        }
    }
    if let Some(block) = current {
        blocks.push(block);
    }

    blocks
}

fn parse_campus_block(block: &Block, opts: &ExportOptions) -> Result<Campus, ExportError> {
    let mut lines = block.lines.iter().enumerate();

    // Campus blocks are never empty
    let header = lines.next().map(|(_, l)| l.trim()).unwrap_or_default();
    let name = campus_name(header).ok_or_else(|| ExportError::MalformedCampusHeader {
        line: block.first_line,
        header: header.to_string(),
    })?;
    let mut campus = Campus::new(&name);

    if lines.next().is_none() {
        return Err(ExportError::MissingColumnHeader {
            line: block.first_line,
            campus: name,
        });
    }

    for (offset, record) in lines {
        let line = block.first_line + offset;
        match parse_record(record, line, &name) {
            Ok(blocks) => campus.ranges.extend(blocks),
            Err(e) if opts.skip_invalid_records => {
                log::warn!("{skipped} {e}", skipped = "skipped".on_red());
            }
            Err(e) => return Err(e),
        }
    }

    if campus.ranges.is_empty() {
        log::warn!(
            "Campus '{}' at line {} has no address ranges",
            campus.name,
            block.first_line
        );
    }
    log::debug!(
        "Campus '{}': {} block(s), {} address(es)",
        campus.name,
        campus.ranges.len(),
        campus.address_count()
    );

    Ok(campus)
}

/// Summarize one `start,end[,…]` record.
fn parse_record(record: &str, line: usize, campus: &str) -> Result<Vec<CidrBlock>, ExportError> {
    let mut fields = record.split(',').map(|f| f.trim().trim_matches('"'));
    let start = fields.next().unwrap_or_default();
    let end = fields.next().ok_or_else(|| ExportError::MissingEndAddress {
        line,
        campus: campus.to_string(),
        record: record.to_string(),
    })?;

    let invalid = |source: AddressError| ExportError::InvalidRecord {
        line,
        campus: campus.to_string(),
        record: record.to_string(),
        source,
    };
    let range = IpRange::parse(start, end).map_err(invalid)?;
    summarize_range(range.start(), range.end()).map_err(invalid)
}
