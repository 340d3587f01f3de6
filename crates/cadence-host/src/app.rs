use anyhow::{Context, Result};

use cadence_engine::core::{App, AppControl, FrameCtx};
use cadence_engine::runtime::RunMode;
use cadence_engine::window::WindowSession;

use crate::cli::HostSettings;
use crate::stats::FrameStats;
use crate::sys::MemoryPool;

/// The host's frame callback.
///
/// Stands in for the simulation/render work: pumps the window (interactive
/// mode), keeps frame statistics and honors the frame limit.
pub struct HostApp {
    settings: HostSettings,
    session: Option<WindowSession>,
    stats: FrameStats,
    _pool: MemoryPool,
}

impl HostApp {
    pub fn new(settings: HostSettings, session: Option<WindowSession>, pool: MemoryPool) -> Self {
        Self {
            settings,
            session,
            stats: FrameStats::new(1.0),
            _pool: pool,
        }
    }
}

impl App for HostApp {
    fn frame_interval(&self) -> f64 {
        self.settings.frame_interval
    }

    fn min_tic_interval(&self) -> f64 {
        self.settings.min_tic_interval
    }

    fn has_input_focus_or_unpaused(&self) -> bool {
        self.session
            .as_ref()
            .is_none_or(|s| s.has_input_focus_or_unpaused())
    }

    fn is_minimized(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_minimized())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx) -> Result<AppControl> {
        if let Some(session) = &mut self.session {
            session.pump().context("window session failed")?;
            if session.close_requested() {
                log::info!("window closed after {} frames", ctx.time.frame_index);
                return Ok(AppControl::Exit);
            }
        }

        if let Some(summary) = self.stats.record(&ctx.time, ctx.skip_render) {
            match ctx.mode {
                RunMode::Dedicated => log::info!("{summary}"),
                RunMode::Interactive => {
                    log::debug!("{summary}");
                    if let Some(session) = &self.session {
                        session.set_title(&format!("cadence | {:.1} fps", summary.fps));
                    }
                }
            }
        }

        if let Some(limit) = self.settings.frame_limit {
            if ctx.time.frame_index + 1 >= limit {
                log::info!("frame limit of {limit} reached");
                return Ok(AppControl::Exit);
            }
        }

        Ok(AppControl::Continue)
    }
}
