use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub fn get_styles() -> clap::builder::Styles {
    clap::builder::Styles::styled()
        .usage(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .header(
            anstyle::Style::new()
                .bold()
                .underline()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
        )
        .literal(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
        )
        .placeholder(
            anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))),
        )
}

/// Execution backend the launcher script is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Run the workflow on this machine
    Local,
    /// Submit the workflow jobs to a SLURM cluster
    Slurm,
}

impl RunMode {
    pub fn default_jobs(&self) -> u32 {
        match self {
            RunMode::Local => 4,
            RunMode::Slurm => 40,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Local => write!(f, "local"),
            RunMode::Slurm => write!(f, "slurm"),
        }
    }
}

/// How lanes are combined in the FASTQ output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergingStrategy {
    /// One FASTQ per sample with all lanes merged
    Merge,
    /// One FASTQ per sample and lane
    None,
}

// bcl2fastq options grouped as in the generated config
#[derive(Parser, Clone, Debug)]
pub struct Bcl2FastqOptions {
    /// Sample sheet (defaults to SampleSheet.csv inside the BCL directory)
    #[arg(long, required = false)]
    pub sample_sheet: Option<PathBuf>,

    /// Number of mismatches allowed per index
    #[arg(long, default_value = "0")]
    pub barcode_mismatch: u8,

    /// Fail on missing BCL files instead of treating them as no-calls
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_ignore_missing_bcls: bool,

    /// Lane merging strategy
    #[arg(long, value_enum, default_value = "merge")]
    pub merging_strategy: MergingStrategy,

    /// Threads given to bcl2fastq
    #[arg(long, default_value = "4")]
    pub threads: u32,
}

#[derive(Parser, Clone, Debug)]
#[command(
    name = "sequana_pipelines_demultiplex",
    version,
    about = "Prepare a working directory to demultiplex a sequencing run (BCL to FASTQ)",
    long_about = None,
    styles = get_styles()
)]
pub struct Cli {
    /// Run folder containing the BCL files (RunInfo.xml, Data/Intensities/BaseCalls)
    #[arg(long)]
    pub bcl_directory: PathBuf,

    #[command(flatten)]
    pub bcl2fastq: Bcl2FastqOptions,

    /// Execution backend for the launcher script
    #[arg(long, value_enum, default_value = "local")]
    pub run_mode: RunMode,

    /// Number of concurrent workflow jobs (4 locally, 40 on slurm)
    #[arg(long, required = false)]
    pub jobs: Option<u32>,

    /// Where the pipeline files are written
    #[arg(long, default_value = "fastq")]
    pub working_directory: PathBuf,

    /// Overwrite an existing, non-empty working directory
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub force: bool,

    /// Verbosity level
    #[arg(short, long, required = false, default_value = "2")]
    pub verbose: u8,
}

impl Cli {
    pub fn jobs(&self) -> u32 {
        self.jobs.unwrap_or_else(|| self.run_mode.default_jobs())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_mode_defaults_to_local() {
        let cli = Cli::parse_from(["prog", "--bcl-directory", "run"]);
        assert_eq!(cli.run_mode, RunMode::Local);
        assert_eq!(cli.jobs(), 4);
        assert_eq!(cli.working_directory, PathBuf::from("fastq"));
        assert!(!cli.force);
        assert_eq!(cli.bcl2fastq.merging_strategy, MergingStrategy::Merge);
    }

    #[test]
    fn slurm_raises_default_jobs_unless_given() {
        let cli = Cli::parse_from(["prog", "--bcl-directory", "run", "--run-mode", "slurm"]);
        assert_eq!(cli.jobs(), 40);

        let cli = Cli::parse_from([
            "prog",
            "--bcl-directory",
            "run",
            "--run-mode",
            "slurm",
            "--jobs",
            "8",
        ]);
        assert_eq!(cli.jobs(), 8);
    }

    #[test]
    fn unknown_run_mode_is_rejected() {
        let err = Cli::try_parse_from(["prog", "--bcl-directory", "run", "--run-mode", "sge"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn bcl_directory_is_required() {
        let err = Cli::try_parse_from(["prog", "--force"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn verbosity_maps_to_log_levels() {
        let cli = Cli::parse_from(["prog", "--bcl-directory", "run", "-v", "0"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Error);
        let cli = Cli::parse_from(["prog", "--bcl-directory", "run", "-v", "9"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Trace);
    }
}
