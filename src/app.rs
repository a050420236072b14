use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use rayon::prelude::*;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::cli::{Cli, OutputFormat};
use crate::config;
use crate::lister::ArchiveLister;
use crate::matcher::contains_class;
use crate::progress::{self, ProgressSink};
use crate::report::{self, ArchiveFailure, ScanReport};
use crate::scan::{Archive, enumerate_archives};

pub const EXIT_USAGE: u8 = 1;
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub directory: PathBuf,
    pub class_name: String,
}

impl From<&Cli> for ScanTarget {
    fn from(cli: &Cli) -> Self {
        Self {
            directory: cli.directory.clone(),
            class_name: cli.class_name.clone(),
        }
    }
}

/// Parses `args`, builds the lister and progress display from configuration
/// and runs one scan.
pub fn run<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match parse_args(args, stdout, stderr) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    let lister = match config::build_lister(&cli) {
        Ok(lister) => lister,
        Err(err) => return fatal(stderr, &err),
    };
    let mut progress = progress::sink_for(config::effective_progress_mode(&cli));
    execute(&cli, lister.as_ref(), progress.as_mut(), stdout, stderr)
}

/// Same as [`run`] with the lister and progress display supplied by the caller.
pub fn run_with<I, T>(
    args: I,
    lister: &dyn ArchiveLister,
    progress: &mut dyn ProgressSink,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match parse_args(args, stdout, stderr) {
        Ok(cli) => execute(&cli, lister, progress, stdout, stderr),
        Err(code) => code,
    }
}

fn parse_args<I, T>(args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<Cli, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|err| {
        if err.use_stderr() {
            let _ = write!(stderr, "{err}");
            ExitCode::from(EXIT_USAGE)
        } else {
            let _ = write!(stdout, "{err}");
            ExitCode::SUCCESS
        }
    })
}

pub fn execute(
    cli: &Cli,
    lister: &dyn ArchiveLister,
    progress: &mut dyn ProgressSink,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ExitCode {
    match scan_and_report(cli, lister, progress, stdout, stderr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fatal(stderr, &err),
    }
}

fn scan_and_report(
    cli: &Cli,
    lister: &dyn ArchiveLister,
    progress: &mut dyn ProgressSink,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let target = ScanTarget::from(cli);
    if cli.format == OutputFormat::Text {
        report::write_banner(stdout, &target.class_name, &target.directory)?;
    }

    let report = Scanner::new(lister)
        .jobs(cli.jobs)
        .scan(&target, progress, stderr)?;

    match cli.format {
        OutputFormat::Text => report::write_text_summary(stdout, &report)?,
        OutputFormat::Json => report::write_json_summary(stdout, &report)?,
    }
    stdout.flush()?;
    Ok(())
}

fn fatal(stderr: &mut dyn Write, err: &anyhow::Error) -> ExitCode {
    let _ = writeln!(stderr, "Error: {err:#}");
    ExitCode::from(EXIT_FATAL)
}

/// Drives enumeration, listing, matching and progress for one target.
pub struct Scanner<'a> {
    lister: &'a dyn ArchiveLister,
    jobs: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(lister: &'a dyn ArchiveLister) -> Self {
        Self { lister, jobs: 1 }
    }

    /// `1` keeps the scan on the calling thread; `0` sizes the pool to the CPU count.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Fails only when the directory cannot be enumerated. Archives that
    /// cannot be listed are reported on `warnings` and recorded as failures.
    pub fn scan(
        &self,
        target: &ScanTarget,
        progress: &mut dyn ProgressSink,
        warnings: &mut dyn Write,
    ) -> Result<ScanReport> {
        let start = Instant::now();
        let archives = enumerate_archives(&target.directory)?;
        debug!(
            "scanning {} archive(s) for '{}' with {} job(s)",
            archives.len(),
            target.class_name,
            self.jobs
        );

        let mut matches = Vec::new();
        let mut failures = Vec::new();

        if self.jobs == 1 || archives.len() < 2 {
            let total = archives.len();
            for (idx, archive) in archives.iter().enumerate() {
                progress.update(idx + 1, total, &archive.name);
                match self.inspect(archive, &target.class_name) {
                    Ok(true) => matches.push(archive.path.clone()),
                    Ok(false) => {}
                    Err(err) => {
                        progress.clear();
                        report::write_warning(warnings, &archive.name, &err)?;
                        failures.push(failure(archive, &err));
                    }
                }
            }
            progress.finish();
        } else {
            let outcomes = self.inspect_parallel(&archives, &target.class_name, progress)?;
            progress.finish();
            for (archive, outcome) in archives.iter().zip(outcomes) {
                match outcome {
                    Ok(true) => matches.push(archive.path.clone()),
                    Ok(false) => {}
                    Err(err) => {
                        report::write_warning(warnings, &archive.name, &err)?;
                        failures.push(failure(archive, &err));
                    }
                }
            }
        }
        warnings.flush()?;

        Ok(ScanReport {
            class_name: target.class_name.clone(),
            directory: target.directory.clone(),
            candidates: archives.len(),
            matches,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn inspect(&self, archive: &Archive, class_name: &str) -> Result<bool> {
        let listing = self.lister.list_entries(&archive.path)?;
        Ok(contains_class(&listing, class_name))
    }

    /// Outcomes come back in `archives` order whatever order workers finish in.
    fn inspect_parallel(
        &self,
        archives: &[Archive],
        class_name: &str,
        progress: &mut dyn ProgressSink,
    ) -> Result<Vec<Result<bool>>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .context("Failed to build worker pool")?;

        let total = archives.len();
        let display = Mutex::new((0usize, progress));
        let outcomes = pool.install(|| {
            archives
                .par_iter()
                .map(|archive| {
                    {
                        let mut guard = display.lock().unwrap_or_else(PoisonError::into_inner);
                        let (started, sink) = &mut *guard;
                        *started += 1;
                        sink.update(*started, total, &archive.name);
                    }
                    self.inspect(archive, class_name)
                })
                .collect::<Vec<_>>()
        });
        Ok(outcomes)
    }
}

fn failure(archive: &Archive, err: &anyhow::Error) -> ArchiveFailure {
    ArchiveFailure {
        path: archive.path.clone(),
        error: format!("{err:#}"),
    }
}
