use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArchiveFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one scan, matches in enumeration order.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub class_name: String,
    pub directory: PathBuf,
    pub candidates: usize,
    pub matches: Vec<PathBuf>,
    pub failures: Vec<ArchiveFailure>,
    pub duration_ms: u64,
}

impl ScanReport {
    pub fn found(&self) -> bool {
        !self.matches.is_empty()
    }
}

pub fn write_banner(out: &mut dyn Write, class_name: &str, directory: &Path) -> Result<()> {
    writeln!(
        out,
        "🔍 Starting search for class '{class_name}' in JARs under '{}'...\n",
        directory.display()
    )?;
    out.flush()?;
    Ok(())
}

pub fn write_warning(err: &mut dyn Write, archive_name: &str, error: &anyhow::Error) -> Result<()> {
    writeln!(err, "⚠️  Failed to inspect {archive_name}: {error:#}")?;
    Ok(())
}

pub fn write_text_summary(out: &mut dyn Write, report: &ScanReport) -> Result<()> {
    if report.found() {
        writeln!(
            out,
            "✅ Found '{}' in {} JAR file(s):",
            report.class_name,
            report.matches.len()
        )?;
        for jar in &report.matches {
            writeln!(out, "  - {}", jar.display())?;
        }
    } else {
        writeln!(out, "❌ No matches found for '{}'.", report.class_name)?;
    }
    Ok(())
}

pub fn write_json_summary(out: &mut dyn Write, report: &ScanReport) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}
