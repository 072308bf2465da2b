//! Plan file reading and writing.
//!
//! A plan file is a persisted topology, one link per line:
//!
//! ```text
//! 10.0.0.1:10.0.0.2:10mbit
//! 10.0.0.1:10.0.0.3:1mbit
//! ```
//!
//! Tokens cannot contain `:`; there is no escaping. When a plan is applied,
//! malformed lines are reported and skipped, and the remaining lines are
//! still processed.

use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};

use crate::command::{link_commands, Command};
use crate::topology::{BandwidthTier, Endpoint, Link, Topology};

/// Why a plan line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanLineError {
    #[error("expected 3 ':'-separated fields, found {0}")]
    MissingFields(usize),

    #[error("field {0} is empty")]
    EmptyField(usize),
}

/// Render a topology in plan file form, newline terminated.
pub fn render_plan(topology: &Topology) -> String {
    let mut out = String::new();
    for link in topology {
        out.push_str(&link.to_string());
        out.push('\n');
    }
    out
}

/// Write a topology to `path` in one piece.
pub fn write_plan(path: &Path, topology: &Topology) -> Result<()> {
    fs::write(path, render_plan(topology))
        .wrap_err_with(|| format!("Failed to write plan file '{}'", path.display()))?;
    info!("Wrote {} links to plan file {:?}", topology.len(), path);
    Ok(())
}

/// Parse one plan line. Fields past the third are ignored.
pub fn parse_plan_line(line: &str) -> Result<Link, PlanLineError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < 3 {
        return Err(PlanLineError::MissingFields(fields.len()));
    }
    if let Some(index) = fields[..3].iter().position(|f| f.is_empty()) {
        return Err(PlanLineError::EmptyField(index + 1));
    }

    Ok(Link::new(
        Endpoint::from(fields[0]),
        Endpoint::from(fields[1]),
        BandwidthTier::from(fields[2]),
    ))
}

/// Parse plan file contents, skipping malformed lines with a warning.
pub fn parse_plan(contents: &str) -> Vec<Link> {
    let mut links = Vec::new();
    for (number, line) in contents.lines().enumerate() {
        match parse_plan_line(line) {
            Ok(link) => links.push(link),
            Err(e) => warn!("Invalid line {} ({}), skipping request: {:?}", number + 1, e, line),
        }
    }
    links
}

/// Both directional throttle commands for every valid line, in file order.
pub fn plan_commands(contents: &str) -> Vec<Command> {
    parse_plan(contents).iter().flat_map(link_commands).collect()
}

/// Read a plan file from disk and build its throttle commands.
pub fn read_plan_commands(path: &Path) -> Result<Vec<Command>> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read plan file '{}'", path.display()))?;
    let commands = plan_commands(&contents);
    info!("Loaded {} requests from plan file {:?}", commands.len(), path);
    Ok(commands)
}
