use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::lister::{ArchiveLister, EntryListing};

/// Lists archives by running the JDK `jar tf <archive>` command.
#[derive(Debug, Clone)]
pub struct JarTool {
    jar_bin: PathBuf,
}

impl JarTool {
    pub fn new(jar_bin: PathBuf) -> Self {
        Self { jar_bin }
    }

    fn command(&self) -> Command {
        #[cfg(windows)]
        {
            let lower = self.jar_bin.to_string_lossy().to_ascii_lowercase();
            if lower.ends_with(".cmd") || lower.ends_with(".bat") {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").arg(&self.jar_bin);
                return cmd;
            }
        }

        Command::new(&self.jar_bin)
    }
}

impl ArchiveLister for JarTool {
    fn list_entries(&self, archive: &Path) -> Result<EntryListing> {
        debug!("{} tf {}", self.jar_bin.display(), archive.display());
        let output = self
            .command()
            .arg("tf")
            .arg(archive)
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute {} (ensure a JDK is installed, or use --jar-bin)",
                    self.jar_bin.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            match output.status.code() {
                Some(code) => bail!("jar tf exited with status {code}: {}", stderr.trim()),
                None => bail!("jar tf was terminated by a signal: {}", stderr.trim()),
            }
        }

        Ok(EntryListing::from_text(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}
