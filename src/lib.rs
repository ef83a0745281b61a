pub mod cli;
pub mod config;
pub mod errors;
pub mod manager;
pub mod utils;

pub use cli::{Cli, MergingStrategy, RunMode};
pub use errors::DemultiplexError;
pub use manager::PipelineManager;

use clap::Parser;
use clap::error::ErrorKind;
use log::info;
use std::ffi::OsString;

/// Sets up the `colog` logger. Only the first call installs it; later calls adjust the level.
pub fn init_logging(level: log::LevelFilter) {
    let _ = colog::basic_builder().filter_level(level).try_init();
    log::set_max_level(level);
}

/// Entry point of `sequana_pipelines_demultiplex`, driven by an explicit argument list.
///
/// The first item is the program name, as with [`std::env::args_os`]. Help and
/// version requests are printed and return `Ok(())` without touching the file system.
pub fn main_with_args<I, T>(args: I) -> errors::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print().map_err(|e| DemultiplexError::io("<stdout>", e))?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    init_logging(cli.log_level());

    let command_line = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let mut manager = PipelineManager::new(cli, command_line)?;
    manager.run()?;

    info!("Successfully prepared {}", manager.working_directory().display());
    Ok(())
}
