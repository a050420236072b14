use anyhow::{Result, bail};
use std::env;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, ListerKind, OutputFormat, ProgressMode};
use crate::jar_tool::JarTool;
use crate::lister::ArchiveLister;
use crate::probe::ZipLister;

pub const LISTER_ENV: &str = "CLASS_SCAN_LISTER";
pub const JAR_BIN_ENV: &str = "CLASS_SCAN_JAR";
pub const LOG_ENV: &str = "CLASS_SCAN_LOG";

pub fn resolve_lister_kind(cli: &Cli) -> Result<ListerKind> {
    if let Some(kind) = cli.lister {
        return Ok(kind);
    }
    match env::var(LISTER_ENV) {
        Ok(raw) => parse_lister_kind(&raw),
        Err(_) => Ok(ListerKind::Native),
    }
}

fn parse_lister_kind(raw: &str) -> Result<ListerKind> {
    match raw.trim() {
        "" | "native" => Ok(ListerKind::Native),
        "jar-tool" | "jar" => Ok(ListerKind::JarTool),
        other => bail!("Unknown {LISTER_ENV} value: {other} (expected native or jar-tool)"),
    }
}

pub fn resolve_jar_bin(cli: &Cli) -> PathBuf {
    jar_bin_from(
        cli.jar_bin.clone(),
        env::var_os(JAR_BIN_ENV).map(PathBuf::from),
        env::var_os("JAVA_HOME").map(PathBuf::from).as_deref(),
    )
}

fn jar_bin_from(
    cli_value: Option<PathBuf>,
    env_value: Option<PathBuf>,
    java_home: Option<&Path>,
) -> PathBuf {
    if let Some(p) = cli_value {
        return p;
    }
    if let Some(p) = env_value.filter(|p| !p.as_os_str().is_empty()) {
        return p;
    }
    if let Some(home) = java_home {
        let candidate = home.join("bin").join(jar_file_name());
        if candidate.exists() {
            return candidate;
        }
    }
    PathBuf::from("jar")
}

fn jar_file_name() -> &'static str {
    if cfg!(windows) { "jar.exe" } else { "jar" }
}

pub fn build_lister(cli: &Cli) -> Result<Box<dyn ArchiveLister>> {
    Ok(match resolve_lister_kind(cli)? {
        ListerKind::Native => Box::new(ZipLister),
        ListerKind::JarTool => Box::new(JarTool::new(resolve_jar_bin(cli))),
    })
}

/// JSON output owns stdout, so it never shares it with a progress display.
pub fn effective_progress_mode(cli: &Cli) -> ProgressMode {
    match cli.format {
        OutputFormat::Json => ProgressMode::None,
        OutputFormat::Text => cli.progress,
    }
}
