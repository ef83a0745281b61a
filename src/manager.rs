use crate::cli::{Cli, RunMode};
use crate::config::{CONFIG_FILE, DemultiplexConfig};
use crate::errors::{DemultiplexError, Result};
use crate::utils::{absolute, resolve_sample_sheet, tool_on_path, validate_bcl_directory};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const WORKFLOW_FILE: &str = "demultiplex.rules";
pub const LAUNCHER_FILE: &str = "demultiplex.sh";
pub const INFO_DIR: &str = ".sequana";
pub const INFO_FILE: &str = "info.json";

const WORKFLOW: &str = include_str!("../sequana/demultiplex.rules");

/// Record of how a working directory was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
    pub version: String,
    pub command_line: Vec<String>,
    pub run_mode: RunMode,
    pub working_directory: PathBuf,
}

/// Prepares a working directory from which the demultiplexing workflow can be launched.
pub struct PipelineManager {
    cli: Cli,
    command_line: Vec<String>,
    bcl_directory: PathBuf,
    working_directory: PathBuf,
    sample_sheet: Option<PathBuf>,
}

impl PipelineManager {
    pub fn new(cli: Cli, command_line: Vec<String>) -> Result<Self> {
        let bcl_directory = absolute(&cli.bcl_directory)?;
        let working_directory = absolute(&cli.working_directory)?;

        Ok(PipelineManager {
            cli,
            command_line,
            bcl_directory,
            working_directory,
            sample_sheet: None,
        })
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn validate(&mut self) -> Result<()> {
        validate_bcl_directory(&self.bcl_directory)?;
        self.sample_sheet =
            resolve_sample_sheet(&self.bcl_directory, self.cli.bcl2fastq.sample_sheet.as_deref())?;
        Ok(())
    }

    pub fn prepare_working_directory(&self) -> Result<()> {
        let wd = &self.working_directory;

        if wd.exists() {
            if !wd.is_dir() {
                return Err(DemultiplexError::NotADirectory(wd.clone()));
            }

            let mut entries = std::fs::read_dir(wd).map_err(|e| DemultiplexError::io(wd, e))?;
            if entries.next().is_some() {
                if !self.cli.force {
                    return Err(DemultiplexError::WorkingDirectoryExists(wd.clone()));
                }
                warn!("Working directory {} is not empty, overwriting (--force)", wd.display());
            }
        } else {
            std::fs::create_dir_all(wd).map_err(|e| DemultiplexError::io(wd, e))?;
            debug!("Created working directory {}", wd.display());
        }

        Ok(())
    }

    pub fn write_config(&self) -> Result<()> {
        let input_directory = self.bcl_directory.clone();
        let config =
            DemultiplexConfig::from_cli(&self.cli, input_directory, self.sample_sheet.as_deref())?;
        self.write_file(Path::new(CONFIG_FILE), config.to_yaml()?.as_bytes())
    }

    pub fn write_workflow(&self) -> Result<()> {
        self.write_file(Path::new(WORKFLOW_FILE), WORKFLOW.as_bytes())
    }

    pub fn write_launcher(&self) -> Result<()> {
        let script = self.launcher_script();
        self.write_file(Path::new(LAUNCHER_FILE), script.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let path = self.working_directory.join(LAUNCHER_FILE);
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .map_err(|e| DemultiplexError::io(&path, e))?;
        }

        Ok(())
    }

    pub fn launcher_script(&self) -> String {
        let jobs = self.cli.jobs();
        let header = format!(
            "#!/bin/sh\n# generated by sequana_pipelines_demultiplex {}\n",
            env!("CARGO_PKG_VERSION")
        );

        match self.cli.run_mode {
            RunMode::Local => format!(
                "{header}\nsnakemake -s {WORKFLOW_FILE} --cores {jobs} --stats stats.txt\n"
            ),
            RunMode::Slurm => format!(
                "{header}#SBATCH --job-name=demultiplex\n\n\
                 snakemake -s {WORKFLOW_FILE} --jobs {jobs} \\\n    \
                 --cluster \"sbatch --cpus-per-task {{threads}}\" \\\n    \
                 --latency-wait 60 --stats stats.txt\n"
            ),
        }
    }

    pub fn copy_sample_sheet(&self) -> Result<()> {
        let Some(sheet) = &self.sample_sheet else {
            return Ok(());
        };
        let Some(name) = sheet.file_name() else {
            return Ok(());
        };

        let target = self.working_directory.join(name);
        if target.exists() {
            let source = std::fs::canonicalize(sheet).map_err(|e| DemultiplexError::io(sheet, e))?;
            let existing =
                std::fs::canonicalize(&target).map_err(|e| DemultiplexError::io(&target, e))?;
            if source == existing {
                debug!("Sample sheet {} is already in the working directory", target.display());
                return Ok(());
            }
        }

        std::fs::copy(sheet, &target).map_err(|e| DemultiplexError::io(&target, e))?;
        debug!("Copied sample sheet to {}", target.display());
        Ok(())
    }

    pub fn write_info(&self) -> Result<()> {
        let dir = self.working_directory.join(INFO_DIR);
        std::fs::create_dir_all(&dir).map_err(|e| DemultiplexError::io(&dir, e))?;

        let info = RunInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            command_line: self.command_line.clone(),
            run_mode: self.cli.run_mode,
            working_directory: self.working_directory.clone(),
        };
        let json = serde_json::to_string_pretty(&info)?;
        self.write_file(&Path::new(INFO_DIR).join(INFO_FILE), json.as_bytes())
    }

    pub fn teardown(&self) {
        if !tool_on_path("snakemake") {
            warn!("snakemake not found in PATH. Install it before launching the pipeline");
        }

        let wd = self.working_directory.display();
        match self.cli.run_mode {
            RunMode::Local => info!("Pipeline ready. Run: cd {} && sh {}", wd, LAUNCHER_FILE),
            RunMode::Slurm => info!("Pipeline ready. Run: cd {} && sbatch {}", wd, LAUNCHER_FILE),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        debug!("Preparing {} run from {}", self.cli.run_mode, self.bcl_directory.display());
        self.validate()?;
        self.prepare_working_directory()?;
        self.write_config()?;
        self.write_workflow()?;
        self.write_launcher()?;
        self.copy_sample_sheet()?;
        self.write_info()?;
        self.teardown();
        Ok(())
    }

    // Artefacts are replaced atomically via a sibling temp file
    fn write_file(&self, relative: &Path, contents: &[u8]) -> Result<()> {
        let target = self.working_directory.join(relative);
        let parent = target.parent().unwrap_or(&self.working_directory);

        let mut file =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| DemultiplexError::io(parent, e))?;
        file.write_all(contents)
            .map_err(|e| DemultiplexError::io(&target, e))?;

        // NamedTempFile is created 0600
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| DemultiplexError::io(&target, e))?;
        }

        file.persist(&target)
            .map_err(|e| DemultiplexError::io(&target, e.error))?;

        debug!("Wrote {}", target.display());
        Ok(())
    }
}
