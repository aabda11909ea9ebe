//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame pacing (fixed-step accumulator, stop/resume)
//! - Visibility changes and the screen wake lock
//! - Logging setup on web

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta we accept before clamping (tab stalls, debugger)
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-step accumulator driven by the display refresh.
///
/// Stopping withdraws future ticks only; state is never touched here.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    dt: f32,
    accumulator: f32,
    running: bool,
    /// Set by visibility; the loop runs only if not hidden and not stopped
    hidden: bool,
    ticks: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FrameLoop {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            running: true,
            hidden: false,
            ticks: 0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Total fixed steps handed out
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.hidden
    }

    /// Add frame time and return how many fixed steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.dt && steps < MAX_SUBSTEPS {
            self.accumulator -= self.dt;
            steps += 1;
        }
        // Drop whatever the cap left behind so we never spiral
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.dt);
        }
        self.ticks += steps as u64;
        steps
    }

    /// Interpolation alpha between the last two steps
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Frame loop stopped after {} ticks", self.ticks);
        }
        self.running = false;
    }

    /// Resume; time spent stopped is discarded
    pub fn resume(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    pub fn on_visibility(&mut self, visible: bool) {
        if self.hidden == !visible {
            return;
        }
        self.hidden = !visible;
        if visible {
            self.accumulator = 0.0;
            log::info!("Visible again, frame loop resumed");
        } else {
            log::info!("Hidden, frame loop suspended");
        }
    }
}

/// Screen wake lock bookkeeping.
///
/// The actual request is async on the web; the host reports its result via
/// [`WakeLock::acquired`]. The browser drops the lock when the page hides,
/// so it is re-requested on visibility regain if still wanted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WakeLock {
    wanted: bool,
    held: bool,
    failures: u32,
}

impl WakeLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn is_wanted(&self) -> bool {
        self.wanted
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Ask for the lock. Returns true if the host should issue a request.
    pub fn request(&mut self) -> bool {
        self.wanted = true;
        !self.held
    }

    /// Record the outcome of a request.
    ///
    /// Returns true if the host must release the lock it just got, because
    /// it was released while the request was in flight.
    pub fn acquired(&mut self, ok: bool) -> bool {
        if !self.wanted {
            self.held = false;
            return ok;
        }
        self.held = ok;
        if !ok {
            self.failures += 1;
            log::warn!("Wake lock unavailable ({} failures)", self.failures);
        }
        false
    }

    /// Stop wanting the lock. Returns true if the host holds one to drop.
    pub fn release(&mut self) -> bool {
        self.wanted = false;
        std::mem::replace(&mut self.held, false)
    }

    /// Returns true if the host should re-request the lock
    pub fn on_visibility(&mut self, visible: bool) -> bool {
        if visible {
            self.wanted && !self.held
        } else {
            self.held = false;
            false
        }
    }
}
