mod config;
mod session;

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use canvas::doc::NoteStore;
use canvas::engine::EngineCore;
use canvas::storage::FileBlobStore;
use clap::Parser;
use tracing::{error, info};

use crate::config::Config;
use crate::session::{HostError, run_session};

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let config = Config::parse();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "stickyboard failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), HostError> {
    info!(data_dir = %config.data_dir.display(), "opening board");
    let store = NoteStore::load(Box::new(FileBlobStore::new(&config.data_dir)));
    let mut core = EngineCore::new(store, config.trash_rect(), config.seed);

    let stdout = io::stdout().lock();
    let stats = match &config.input {
        Some(path) => run_session(&mut core, BufReader::new(File::open(path)?), stdout)?,
        None => run_session(&mut core, io::stdin().lock(), stdout)?,
    };

    info!(events = stats.events, skipped = stats.skipped, notes = core.notes().len(), "session finished");
    Ok(())
}
