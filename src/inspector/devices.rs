//! Serial device-file listing (`/dev/cu.*` on macOS, `/dev/ttyACM*` on Linux).

use crate::config::InspectorConfig;
use regex::Regex;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Entries of `dir` whose file name matches `pattern`, sorted.
pub fn list_device_files(dir: &Path, pattern: &Regex) -> io::Result<Vec<PathBuf>> {
    let mut devices = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if pattern.is_match(&entry.file_name().to_string_lossy()) {
            devices.push(entry.path());
        }
    }
    devices.sort();
    debug!("{} device file(s) in {} match {}", devices.len(), dir.display(), pattern);
    Ok(devices)
}

/// Print the matching device files; absence and errors are reported.
pub fn report_device_files<W: Write>(config: &InspectorConfig, out: &mut W) -> io::Result<()> {
    let Some(dir) = config.device_dir.as_deref() else {
        writeln!(out, "🔍 Device file listing is not available on this platform")?;
        return Ok(());
    };

    writeln!(
        out,
        "🔍 Checking {} devices matching {}:",
        dir.display(),
        config.device_pattern
    )?;

    let pattern = match Regex::new(&config.device_pattern) {
        Ok(pattern) => pattern,
        Err(e) => {
            writeln!(out, "   Error: {}", e)?;
            return Ok(());
        }
    };

    match list_device_files(dir, &pattern) {
        Ok(devices) if devices.is_empty() => {
            writeln!(out, "   No matching devices found")?;
        }
        Ok(devices) => {
            for device in devices {
                writeln!(out, "   {}", device.display())?;
            }
        }
        Err(e) => {
            writeln!(out, "   Error: {}", e)?;
        }
    }
    Ok(())
}
