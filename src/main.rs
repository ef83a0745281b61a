use anyhow::{Context, Result};
use sequana_demultiplex::DemultiplexError;

fn main() -> Result<()> {
    match sequana_demultiplex::main_with_args(std::env::args_os()) {
        Ok(()) => Ok(()),
        // Usage errors keep clap's rendering and exit code
        Err(DemultiplexError::Cli(err)) => err.exit(),
        Err(err) => Err(err).context("Failed to prepare the demultiplexing pipeline"),
    }
}
