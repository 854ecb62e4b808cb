//! The engine ties the surface, motion policy, simulation, renderer and frame
//! scheduler together and owns the lifecycle state machine:
//!
//! `Uninitialized -> Seeded -> Running <-> Paused -> TornDown`
//!
//! Every platform callback (frame, timer, pointer, visibility, preference)
//! lands on one of the `on_*` methods. After teardown they are all no-ops.

use crate::config::{EngineSettings, Intensity, IntensityProfile, Variant};
use crate::core::motion::{ListenerId, MotionPolicy, PreferenceStore};
use crate::core::render::{Renderer, Scene};
use crate::core::scheduler::{FrameClock, FrameDecision, FrameScheduler};
use crate::core::sim::{MotionModel, Simulation};
use crate::core::surface::{SurfaceConfig, SurfaceManager, TimerHost};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Seeded,
    Running,
    Paused,
    TornDown,
}

impl EngineState {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Seeded => "seeded",
            EngineState::Running => "running",
            EngineState::Paused => "paused",
            EngineState::TornDown => "torn-down",
        }
    }
}

/// Platform services handed to the engine at construction.
pub struct EngineHosts {
    pub frames: Box<dyn FrameClock>,
    pub timers: Box<dyn TimerHost>,
    pub renderer: Box<dyn Renderer>,
}

/// Platform signals sampled once at mount.
#[derive(Clone, Copy, Debug)]
pub struct MountSignals {
    pub logical_width: f64,
    pub logical_height: f64,
    pub device_pixel_ratio: f64,
    pub reduced_motion: bool,
    pub page_visible: bool,
}

pub struct Engine {
    variant: Variant,
    state: EngineState,
    profile: IntensityProfile,
    surface: SurfaceManager,
    motion: MotionPolicy,
    sim: Simulation,
    scheduler: FrameScheduler,
    renderer: Box<dyn Renderer>,
    page_visible: bool,
    /// Last pointer in container CSS pixels; re-projected on every resync.
    pointer_css: Option<Vec2>,
    elapsed_ms: f64,
    frames_drawn: u64,
}

impl Engine {
    pub fn new(
        settings: &EngineSettings,
        signals: MountSignals,
        store: &dyn PreferenceStore,
        hosts: EngineHosts,
    ) -> Self {
        let settings = settings.clone().sanitized();
        let initial = SurfaceConfig::new(
            signals.logical_width,
            signals.logical_height,
            signals.device_pixel_ratio,
            settings.dpr_cap,
        );
        let motion = MotionPolicy::new(signals.reduced_motion, store);
        let profile = IntensityProfile::for_variant(settings.variant, motion.current_intensity());
        let model = match settings.variant {
            Variant::NetworkGraph => MotionModel::FlowField,
            _ => MotionModel::Drift,
        };
        let mut sim = Simulation::new(model, settings.seed.unwrap_or_else(rand::random));
        sim.set_speed(profile.speed);
        Self {
            variant: settings.variant,
            state: EngineState::Uninitialized,
            profile,
            surface: SurfaceManager::new(
                initial,
                settings.dpr_cap,
                settings.resize_debounce_ms,
                hosts.timers,
            ),
            motion,
            sim,
            scheduler: FrameScheduler::new(hosts.frames, settings.target_frame_interval_ms()),
            renderer: hosts.renderer,
            page_visible: signals.page_visible,
            pointer_css: None,
            elapsed_ms: 0.0,
            frames_drawn: 0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn profile(&self) -> &IntensityProfile {
        &self.profile
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn surface(&self) -> &SurfaceConfig {
        self.surface.config()
    }

    pub fn surface_manager(&self) -> &SurfaceManager {
        &self.surface
    }

    pub fn motion(&self) -> &MotionPolicy {
        &self.motion
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_frame_scheduled(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    pub fn subscribe_intensity(&mut self, callback: impl FnMut(Intensity) + 'static) -> ListenerId {
        self.motion.on_intensity_change(callback)
    }

    pub fn subscribe_reduced_motion(&mut self, callback: impl FnMut(bool) + 'static) -> ListenerId {
        self.motion.on_reduced_motion_change(callback)
    }

    /// Size the surface, seed the simulation and start animating if the
    /// motion policy and page visibility allow it. Otherwise the static
    /// fallback is drawn and no frame is ever requested.
    pub fn mount(&mut self) {
        if self.state != EngineState::Uninitialized {
            return;
        }
        let cfg = *self.surface.config();
        self.renderer.resize(&cfg);
        self.reseed();
        self.state = EngineState::Seeded;
        log::info!(
            "[engine] mounted {} at {}x{} (dpr {:.2}, intensity {}, reduced_motion {})",
            self.variant,
            cfg.physical_width,
            cfg.physical_height,
            cfg.dpr,
            self.profile.intensity,
            self.motion.reduced_motion()
        );
        if self.motion.allows_animation() {
            self.try_run();
            if self.state == EngineState::Seeded {
                // hidden at mount: wait for visibility
                self.state = EngineState::Paused;
            }
        } else {
            self.renderer.draw_static(&cfg);
        }
    }

    pub fn on_frame(&mut self, timestamp_ms: f64) {
        if self.state != EngineState::Running {
            return;
        }
        if let FrameDecision::Step(delta_ms) = self.scheduler.on_frame(timestamp_ms) {
            self.sim.step(delta_ms, None);
            self.elapsed_ms += delta_ms;
            self.draw();
        }
    }

    /// Pointer position relative to the container, in CSS pixels.
    pub fn on_pointer_move(&mut self, x_css: f32, y_css: f32) {
        if self.state == EngineState::TornDown {
            return;
        }
        let css = Vec2::new(x_css, y_css);
        self.pointer_css = Some(css);
        self.sim.set_pointer_target(Some(self.surface.config().to_device(css)));
    }

    pub fn on_resize(&mut self, logical_width: f64, logical_height: f64, device_pixel_ratio: f64) {
        if self.state == EngineState::TornDown {
            return;
        }
        self.surface.on_resize(logical_width, logical_height, device_pixel_ratio);
    }

    /// The resize debounce timer fired.
    pub fn on_resize_timer(&mut self) {
        if self.state == EngineState::TornDown {
            return;
        }
        if let Some(cfg) = self.surface.on_debounce_elapsed() {
            self.renderer.resize(&cfg);
            if self.state != EngineState::Uninitialized {
                self.reseed();
            }
            // the stored target is in device pixels of the old dpr
            if let Some(css) = self.pointer_css {
                self.sim.set_pointer_target(Some(cfg.to_device(css)));
            }
            if !self.motion.allows_animation() {
                self.renderer.draw_static(&cfg);
            }
        }
    }

    pub fn on_visibility_change(&mut self, visible: bool) {
        if self.state == EngineState::TornDown || self.page_visible == visible {
            return;
        }
        self.page_visible = visible;
        if visible {
            self.try_run();
        } else {
            self.pause("page hidden");
        }
    }

    pub fn on_reduced_motion_change(&mut self, active: bool) {
        if self.state == EngineState::TornDown || !self.motion.set_reduced_motion(active) {
            return;
        }
        if active {
            self.pause("reduced motion requested");
            if self.state != EngineState::Uninitialized {
                let cfg = *self.surface.config();
                self.renderer.draw_static(&cfg);
            }
        } else {
            self.try_run();
        }
    }

    /// New raw preference value (same-tab event or cross-tab storage). The
    /// profile is replaced as a whole and the elements are reseeded.
    pub fn on_intensity_preference(&mut self, raw: Option<&str>) {
        if self.state == EngineState::TornDown {
            return;
        }
        let Some(next) = self.motion.apply_preference(raw) else {
            return;
        };
        self.profile = IntensityProfile::for_variant(self.variant, next);
        self.sim.set_speed(self.profile.speed);
        if self.state != EngineState::Uninitialized {
            self.reseed();
        }
        log::info!(
            "[engine] intensity -> {} ({} elements)",
            next,
            self.sim.elements().len()
        );
    }

    /// Cancel the frame chain and resize timer, drop listeners and release
    /// the renderer. Idempotent.
    pub fn teardown(&mut self) {
        if self.state == EngineState::TornDown {
            return;
        }
        self.scheduler.pause();
        self.surface.teardown();
        self.motion.clear_listeners();
        self.renderer.release();
        self.state = EngineState::TornDown;
        log::info!("[engine] torn down after {} frames", self.frames_drawn);
    }

    fn reseed(&mut self) {
        let cfg = *self.surface.config();
        let count = if self.variant.has_elements() {
            self.profile.element_count_for(cfg.logical_width, cfg.logical_height)
        } else {
            0
        };
        self.sim.seed(count, &cfg);
    }

    fn try_run(&mut self) {
        let can_run = matches!(self.state, EngineState::Seeded | EngineState::Paused)
            && self.motion.allows_animation()
            && self.page_visible;
        if can_run {
            self.scheduler.start();
            self.state = EngineState::Running;
            log::debug!("[engine] running");
        }
    }

    fn pause(&mut self, reason: &str) {
        if self.state == EngineState::Running {
            self.scheduler.pause();
            self.state = EngineState::Paused;
            log::debug!("[engine] paused: {}", reason);
        }
    }

    fn draw(&mut self) {
        let scene = Scene {
            simulation: &self.sim,
            profile: &self.profile,
            surface: self.surface.config(),
            elapsed_ms: self.elapsed_ms,
        };
        self.renderer.draw(&scene);
        self.frames_drawn += 1;
    }
}
