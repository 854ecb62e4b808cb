// Host-side fakes for the platform seams: frame clock, timers, draw target
// and renderer. Each fake records into a shared log so tests can inspect it
// after handing ownership to the engine.

#![allow(dead_code)]

use ambient_bg::core::*;
use ambient_bg::{EngineSettings, Variant};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default, Debug)]
pub struct ClockLog {
    pub requested: u32,
    pub cancelled: Vec<i32>,
    pub outstanding: Option<i32>,
    next: i32,
}

#[derive(Clone, Default)]
pub struct FakeClock(pub Rc<RefCell<ClockLog>>);

impl FrameClock for FakeClock {
    fn request_frame(&mut self) -> Option<FrameToken> {
        let mut log = self.0.borrow_mut();
        log.requested += 1;
        log.next += 1;
        log.outstanding = Some(log.next);
        Some(FrameToken(log.next))
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut log = self.0.borrow_mut();
        log.cancelled.push(token.0);
        if log.outstanding == Some(token.0) {
            log.outstanding = None;
        }
    }
}

#[derive(Default, Debug)]
pub struct TimerLog {
    pub armed: u32,
    pub cleared: u32,
    pub active: Option<i32>,
    pub last_delay: Option<u32>,
    next: i32,
}

#[derive(Clone, Default)]
pub struct FakeTimers(pub Rc<RefCell<TimerLog>>);

impl FakeTimers {
    pub fn is_armed(&self) -> bool {
        self.0.borrow().active.is_some()
    }
}

impl TimerHost for FakeTimers {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerToken> {
        let mut log = self.0.borrow_mut();
        log.armed += 1;
        log.next += 1;
        log.active = Some(log.next);
        log.last_delay = Some(delay_ms);
        Some(TimerToken(log.next))
    }

    fn clear_timeout(&mut self, token: TimerToken) {
        let mut log = self.0.borrow_mut();
        log.cleared += 1;
        if log.active == Some(token.0) {
            log.active = None;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Background(Wash),
    Glow(Vec2, f32, f32),
    Line(Vec2, Vec2, f32),
    Disc(Vec2, f32, f32),
}

#[derive(Default)]
pub struct RecordingTarget {
    pub calls: Vec<Call>,
    pub resized: Vec<(u32, u32)>,
}

impl RecordingTarget {
    pub fn lines(&self) -> Vec<(Vec2, Vec2, f32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Line(a, b, alpha) => Some((*a, *b, *alpha)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl DrawTarget for RecordingTarget {
    fn resize(&mut self, surface: &SurfaceConfig) {
        self.resized.push((surface.physical_width, surface.physical_height));
    }

    fn fill_background(&mut self, wash: &Wash, _width: f64, _height: f64) {
        self.calls.push(Call::Background(wash.clone()));
    }

    fn radial_glow(&mut self, center: Vec2, radius: f32, _color: Rgb, alpha: f32) {
        self.calls.push(Call::Glow(center, radius, alpha));
    }

    fn line(&mut self, from: Vec2, to: Vec2, _width: f64, _color: Rgb, alpha: f32) {
        self.calls.push(Call::Line(from, to, alpha));
    }

    fn disc(&mut self, center: Vec2, radius: f32, _color: Rgb, alpha: f32) {
        self.calls.push(Call::Disc(center, radius, alpha));
    }
}

#[derive(Default, Debug)]
pub struct RenderLog {
    pub resizes: Vec<(u32, u32)>,
    pub draws: u32,
    pub statics: u32,
    pub releases: u32,
    pub last_element_count: usize,
}

#[derive(Clone, Default)]
pub struct FakeRenderer(pub Rc<RefCell<RenderLog>>);

impl Renderer for FakeRenderer {
    fn resize(&mut self, surface: &SurfaceConfig) {
        self.0
            .borrow_mut()
            .resizes
            .push((surface.physical_width, surface.physical_height));
    }

    fn draw(&mut self, scene: &Scene<'_>) {
        let mut log = self.0.borrow_mut();
        log.draws += 1;
        log.last_element_count = scene.simulation.elements().len();
    }

    fn draw_static(&mut self, _surface: &SurfaceConfig) {
        self.0.borrow_mut().statics += 1;
    }

    fn release(&mut self) {
        self.0.borrow_mut().releases += 1;
    }
}

/// Engine wired to fakes, plus handles to their logs.
pub struct Harness {
    pub engine: Engine,
    pub clock: FakeClock,
    pub timers: FakeTimers,
    pub renderer: FakeRenderer,
}

pub fn signals(width: f64, height: f64, dpr: f64) -> MountSignals {
    MountSignals {
        logical_width: width,
        logical_height: height,
        device_pixel_ratio: dpr,
        reduced_motion: false,
        page_visible: true,
    }
}

pub fn harness(variant: Variant, signals: MountSignals, store: &dyn PreferenceStore) -> Harness {
    let mut settings = EngineSettings::for_variant(variant);
    settings.seed = Some(7);
    harness_with(settings, signals, store)
}

pub fn harness_with(
    settings: EngineSettings,
    signals: MountSignals,
    store: &dyn PreferenceStore,
) -> Harness {
    let clock = FakeClock::default();
    let timers = FakeTimers::default();
    let renderer = FakeRenderer::default();
    let engine = Engine::new(
        &settings,
        signals,
        store,
        EngineHosts {
            frames: Box::new(clock.clone()),
            timers: Box::new(timers.clone()),
            renderer: Box::new(renderer.clone()),
        },
    );
    Harness {
        engine,
        clock,
        timers,
        renderer,
    }
}

pub fn surface(width: f64, height: f64, dpr: f64) -> SurfaceConfig {
    SurfaceConfig::new(width, height, dpr, 2.0)
}
