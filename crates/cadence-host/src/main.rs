mod app;
mod cli;
mod stats;
mod sys;

use anyhow::Result;
use clap::Parser;

use cadence_engine::logging::{init_logging, LoggingConfig};
use cadence_engine::runtime::{RunMode, Runtime};
use cadence_engine::window::{WindowConfig, WindowSession};

use crate::app::HostApp;
use crate::cli::HostArgs;
use crate::sys::MemoryPool;

fn main() {
    let args = HostArgs::parse();
    init_logging(LoggingConfig::from_verbosity(args.verbose));

    log::info!("Initializing cadence v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        sys::fatal(format!("{e:#}"));
    }
}

fn run(args: &HostArgs) -> Result<()> {
    args.validate()?;

    let pool = MemoryPool::reserve(args.heap_bytes())?;
    log::info!(
        "reserved {:.1} MiB memory pool",
        pool.capacity() as f64 / (1024.0 * 1024.0)
    );

    let session = match args.mode() {
        RunMode::Dedicated => None,
        RunMode::Interactive => Some(WindowSession::new(WindowConfig {
            title: format!("cadence v{}", env!("CARGO_PKG_VERSION")),
            ..WindowConfig::default()
        })?),
    };

    let mut app = HostApp::new(args.settings(), session, pool);
    Runtime::run_system(args.runtime_config(), &mut app)
}
