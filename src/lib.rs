//! # class-scan
//!
//! Searches the JAR files directly inside a directory for a class name and
//! reports which archives mention it.
//!
//! ## Architecture
//!
//! - **scan**: candidate discovery (`*.jar` directly inside the target directory)
//! - **lister**: the `ArchiveLister` seam and the `EntryListing` it returns
//! - **probe**: in-process zip central-directory lister
//! - **jar_tool**: lister backed by the JDK `jar tf` command
//! - **matcher**: substring test of a class name against a listing
//! - **progress**: in-place terminal, plain and hidden progress displays
//! - **report**: banner, warnings, and text/JSON summaries
//! - **app**: argument handling, scan orchestration and exit codes
//! - **config**: lister, jar binary and progress resolution from flags and environment

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod jar_tool;
pub mod lister;
pub mod matcher;
pub mod probe;
pub mod progress;
pub mod report;
pub mod scan;
