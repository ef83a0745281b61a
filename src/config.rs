//! Pipeline configuration written to `config.yaml`.
//!
//! The layout mirrors what the `demultiplex.rules` workflow reads: a
//! `general` section locating the run and a `bcl2fastq` section with the
//! tool options.

use crate::cli::{Cli, MergingStrategy};
use crate::errors::{DemultiplexError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct General {
    pub input_directory: PathBuf,
    /// Sample sheet name relative to the working directory, empty when unknown
    pub sample_sheet_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bcl2Fastq {
    pub threads: u32,
    pub barcode_mismatch: u8,
    pub ignore_missing_bcls: bool,
    pub no_bgzf_compression: bool,
    pub merge_all_lanes: bool,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemultiplexConfig {
    pub general: General,
    pub bcl2fastq: Bcl2Fastq,
}

impl DemultiplexConfig {
    pub fn from_cli(cli: &Cli, input_directory: PathBuf, sample_sheet: Option<&Path>) -> Result<Self> {
        let options = &cli.bcl2fastq;
        if options.barcode_mismatch > 2 {
            return Err(DemultiplexError::InvalidBarcodeMismatch(options.barcode_mismatch));
        }

        // The sheet is copied next to the config, so only its name is kept
        let sample_sheet_file = sample_sheet
            .and_then(|sheet| sheet.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            general: General {
                input_directory,
                sample_sheet_file,
            },
            bcl2fastq: Bcl2Fastq {
                threads: options.threads,
                barcode_mismatch: options.barcode_mismatch,
                ignore_missing_bcls: !options.no_ignore_missing_bcls,
                no_bgzf_compression: true,
                merge_all_lanes: options.merging_strategy == MergingStrategy::Merge,
                options: String::new(),
            },
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
