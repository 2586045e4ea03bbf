//! Application entry point and dispatch.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use pfft_cli::output::write_to_file;
use pfft_cli::{presenter_for, read_samples};
use pfft_engine::{Engine, TracingObserver};
use pfft_shmem::CancelHandle;

use crate::config::AppConfig;
use crate::version;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        pfft_cli::completion::generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(());
    }

    debug!(version = %version::full_version(), "starting");
    let samples = read_samples(&config.input, config.lenient)?;
    let engine = Engine::new(config.run_options()?)?;
    ctrlc_handler(engine.cancel_handle());

    let result = engine.execute(&samples, &TracingObserver)?;

    let presenter = presenter_for(config.format, config.quiet, config.stats);
    if let Some(path) = &config.output {
        let mut rendered = Vec::new();
        presenter.present(&result, &mut rendered)?;
        write_to_file(path, &rendered)
            .with_context(|| format!("cannot write {}", path.display()))?;
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        presenter.present(&result, &mut out)?;
        out.flush()?;
    }
    Ok(())
}

fn ctrlc_handler(cancel: CancelHandle) {
    if let Err(err) = ctrlc::set_handler(move || cancel.cancel()) {
        warn!(%err, "could not install Ctrl+C handler");
    }
}
