use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-scan", version)]
#[command(about = "Search a directory of JAR files for a class name and report which archives contain it")]
pub struct Cli {
    /// Directory whose `.jar` files are scanned (not recursive)
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Class name to look for, matched as a substring of each archive listing
    #[arg(value_name = "CLASS_NAME", allow_hyphen_values = true)]
    pub class_name: String,

    #[arg(long, value_enum, value_name = "KIND")]
    pub lister: Option<ListerKind>,

    #[arg(long, value_name = "FILE")]
    pub jar_bin: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ProgressMode::Auto)]
    pub progress: ProgressMode,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Worker threads; 1 scans sequentially, 0 uses one per CPU
    #[arg(short = 'j', long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ListerKind {
    Native,
    JarTool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ProgressMode {
    Auto,
    Plain,
    None,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
