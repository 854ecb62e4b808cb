//! Drawing-surface geometry and debounced resize handling.

use glam::Vec2;

/// Opaque handle for a pending platform timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerToken(pub i32);

/// One-shot timers provided by the host (`setTimeout` in the browser).
/// When a timer fires the host calls back into the engine.
pub trait TimerHost {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerToken>;
    fn clear_timeout(&mut self, token: TimerToken);
}

/// Logical (CSS) and physical (device) size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub logical_width: f64,
    pub logical_height: f64,
    /// Device pixel ratio after capping.
    pub dpr: f64,
    pub physical_width: u32,
    pub physical_height: u32,
}

impl SurfaceConfig {
    pub fn new(
        logical_width: f64,
        logical_height: f64,
        device_pixel_ratio: f64,
        dpr_cap: f64,
    ) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(dpr_cap)
        } else {
            1.0
        };
        let logical_width = sanitize_len(logical_width);
        let logical_height = sanitize_len(logical_height);
        Self {
            logical_width,
            logical_height,
            dpr,
            physical_width: physical_len(logical_width, dpr),
            physical_height: physical_len(logical_height, dpr),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.physical_width as f32
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.physical_height as f32
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width() * 0.5, self.height() * 0.5)
    }

    /// Convert a container-relative CSS position into device pixels.
    #[inline]
    pub fn to_device(&self, css: Vec2) -> Vec2 {
        css * self.dpr as f32
    }

    pub fn same_physical_size(&self, other: &SurfaceConfig) -> bool {
        self.physical_width == other.physical_width && self.physical_height == other.physical_height
    }
}

fn sanitize_len(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

fn physical_len(logical: f64, dpr: f64) -> u32 {
    ((logical * dpr).floor() as u32).max(1)
}

#[derive(Clone, Copy, Debug)]
struct PendingSize {
    width: f64,
    height: f64,
    dpr: f64,
}

/// Owns the current `SurfaceConfig` and collapses bursts of resize events
/// into a single resync once the debounce window elapses.
pub struct SurfaceManager {
    config: SurfaceConfig,
    dpr_cap: f64,
    debounce_ms: u32,
    pending: Option<PendingSize>,
    timer: Option<TimerToken>,
    timers: Box<dyn TimerHost>,
    resyncs: u32,
    torn_down: bool,
}

impl SurfaceManager {
    pub fn new(
        initial: SurfaceConfig,
        dpr_cap: f64,
        debounce_ms: u32,
        timers: Box<dyn TimerHost>,
    ) -> Self {
        Self {
            config: initial,
            dpr_cap,
            debounce_ms,
            pending: None,
            timer: None,
            timers,
            resyncs: 0,
            torn_down: false,
        }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Number of completed resyncs since construction.
    pub fn resync_count(&self) -> u32 {
        self.resyncs
    }

    pub fn has_pending_resize(&self) -> bool {
        self.timer.is_some()
    }

    /// Record the latest container size and re-arm the debounce timer.
    pub fn on_resize(&mut self, logical_width: f64, logical_height: f64, device_pixel_ratio: f64) {
        if self.torn_down {
            return;
        }
        self.pending = Some(PendingSize {
            width: logical_width,
            height: logical_height,
            dpr: device_pixel_ratio,
        });
        if let Some(t) = self.timer.take() {
            self.timers.clear_timeout(t);
        }
        self.timer = self.timers.set_timeout(self.debounce_ms);
        if self.timer.is_none() {
            log::warn!("[surface] could not arm resize timer; resize ignored");
        }
    }

    /// Called by the host when the debounce timer fires. Returns the new
    /// config when the physical size actually changed.
    pub fn on_debounce_elapsed(&mut self) -> Option<SurfaceConfig> {
        self.timer = None;
        if self.torn_down {
            return None;
        }
        let pending = self.pending.take()?;
        let next = SurfaceConfig::new(pending.width, pending.height, pending.dpr, self.dpr_cap);
        self.resyncs += 1;
        let changed = !next.same_physical_size(&self.config);
        self.config = next;
        log::debug!(
            "[surface] resync #{} -> {}x{} (dpr {:.2}, changed={})",
            self.resyncs,
            next.physical_width,
            next.physical_height,
            next.dpr,
            changed
        );
        changed.then_some(next)
    }

    /// Cancel any pending resync. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(t) = self.timer.take() {
            self.timers.clear_timeout(t);
        }
        self.pending = None;
        self.torn_down = true;
    }
}
