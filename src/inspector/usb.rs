//! USB topology scan through the platform inventory utility.

use crate::config::InspectorConfig;
use std::io::{self, Write};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

/// Failure to obtain the inventory text.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The configured command line is empty.
    #[error("no inventory command configured")]
    NoCommand,

    /// The program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// One keyword hit in the inventory output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbMatch {
    /// Index of the matching line.
    pub line: usize,
    /// First line of the context window.
    pub start: usize,
    /// One past the last line of the context window.
    pub end: usize,
}

/// Find every line containing one of `keywords` (case-insensitive).
///
/// Each match carries a window of `before` lines before and `after` lines
/// after the hit, clamped to the text.
pub fn find_matches(lines: &[&str], keywords: &[String], before: usize, after: usize) -> Vec<UsbMatch> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.to_lowercase();
            keywords.iter().any(|k| line.contains(k.as_str()))
        })
        .map(|(i, _)| UsbMatch {
            line: i,
            start: i.saturating_sub(before),
            end: (i + after + 1).min(lines.len()),
        })
        .collect()
}

/// Run the inventory command and return its stdout.
///
/// A non-zero exit status is logged; whatever was printed is still returned.
pub fn run_inventory(command: &[String]) -> Result<String, InventoryError> {
    let (program, args) = command.split_first().ok_or(InventoryError::NoCommand)?;
    debug!("Running {} {:?}", program, args);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| InventoryError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        warn!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Print every Pico-related line of `inventory` with its context.
pub fn write_usb_matches<W: Write>(
    inventory: &str,
    config: &InspectorConfig,
    out: &mut W,
) -> io::Result<usize> {
    let lines: Vec<&str> = inventory.lines().collect();
    let matches = find_matches(
        &lines,
        &config.usb_keywords,
        config.context_before,
        config.context_after,
    );

    for m in &matches {
        writeln!(out, "📱 Found Pico-related device:")?;
        for line in &lines[m.start..m.end] {
            writeln!(out, "   {}", line)?;
        }
        writeln!(out)?;
    }

    if matches.is_empty() {
        writeln!(out, "❌ No Pico-related USB devices found")?;
    }
    Ok(matches.len())
}

/// Run the inventory utility and report matches. Never fails on the
/// utility's account; only terminal output errors propagate.
pub fn report_usb_devices<W: Write>(config: &InspectorConfig, out: &mut W) -> io::Result<()> {
    writeln!(out, "🔍 Checking USB devices...")?;

    let command = config.usb_command();
    match run_inventory(&command) {
        Ok(inventory) => {
            write_usb_matches(&inventory, config, out)?;
        }
        Err(e) => {
            warn!("USB inventory failed: {}", e);
            writeln!(out, "Error running {}: {}", command.join(" "), e)?;
        }
    }
    Ok(())
}
