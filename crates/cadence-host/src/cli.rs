use anyhow::{ensure, Result};
use clap::Parser;

use cadence_engine::runtime::{RunMode, RuntimeConfig};

/// Default memory pool: 384 MiB, in KiB.
pub const DEFAULT_HEAP_KB: u64 = 384 * 1024;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Paced frame loop host", long_about = None)]
pub struct HostArgs {
    /// Run headless: no window, coarse tic-rate gate before each frame.
    #[arg(long)]
    pub dedicated: bool,

    /// Memory pool to reserve at startup, in KiB.
    #[arg(long, value_name = "KB", default_value_t = DEFAULT_HEAP_KB)]
    pub heapsize: u64,

    /// Frame rate cap; the frame interval is its reciprocal.
    #[arg(long, default_value_t = 72.0)]
    pub maxfps: f64,

    /// Minimum seconds between frames in dedicated mode.
    #[arg(long, default_value_t = 0.05)]
    pub ticrate: f64,

    /// Exit after this many frames.
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Per-frame settings the host app answers the loop's queries with.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HostSettings {
    pub frame_interval: f64,
    pub min_tic_interval: f64,
    pub frame_limit: Option<u64>,
}

impl HostArgs {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.maxfps.is_finite() && self.maxfps > 0.0,
            "--maxfps must be a positive number, got {}",
            self.maxfps
        );
        ensure!(
            self.ticrate.is_finite() && self.ticrate >= 0.0,
            "--ticrate must not be negative, got {}",
            self.ticrate
        );
        ensure!(self.frames != Some(0), "--frames must be at least 1");
        Ok(())
    }

    pub fn mode(&self) -> RunMode {
        if self.dedicated {
            RunMode::Dedicated
        } else {
            RunMode::Interactive
        }
    }

    pub fn heap_bytes(&self) -> usize {
        usize::try_from(self.heapsize.saturating_mul(1024)).unwrap_or(usize::MAX)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            mode: self.mode(),
            ..RuntimeConfig::default()
        }
    }

    pub fn settings(&self) -> HostSettings {
        HostSettings {
            frame_interval: 1.0 / self.maxfps,
            min_tic_interval: self.ticrate,
            frame_limit: self.frames,
        }
    }
}
