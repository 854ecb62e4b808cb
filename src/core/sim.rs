//! Simulation state: the element collection and its per-tick update.
//!
//! Positions live in device pixels and wrap toroidally on both axes, so
//! every element stays in `[0, width) x [0, height)` after each step. The
//! smoothed pointer drives parallax and is read once per tick.

use crate::constants::*;
use crate::core::surface::SurfaceConfig;
use glam::Vec2;
use rand::prelude::*;

/// Coarse z-bucket. Fixed per element; scales speed, size, opacity and
/// parallax response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DepthLayer {
    Far,
    Mid,
    Near,
}

impl DepthLayer {
    pub const ALL: [DepthLayer; 3] = [DepthLayer::Far, DepthLayer::Mid, DepthLayer::Near];

    /// Round-robin assignment so every layer is present once `count >= 3`.
    #[inline]
    pub fn for_index(i: usize) -> Self {
        Self::ALL[i % 3]
    }

    #[inline]
    fn idx(self) -> usize {
        match self {
            DepthLayer::Far => 0,
            DepthLayer::Mid => 1,
            DepthLayer::Near => 2,
        }
    }

    #[inline]
    pub fn speed(self) -> f32 {
        DEPTH_SPEED[self.idx()]
    }

    #[inline]
    pub fn size(self) -> f32 {
        DEPTH_SIZE[self.idx()]
    }

    #[inline]
    pub fn opacity(self) -> f32 {
        DEPTH_OPACITY[self.idx()]
    }

    #[inline]
    pub fn parallax(self) -> f32 {
        DEPTH_PARALLAX[self.idx()]
    }
}

#[derive(Clone, Debug)]
pub struct VisualElement {
    pub position: Vec2,
    pub velocity: Vec2,
    depth: DepthLayer,
    size: f32,
}

impl VisualElement {
    pub fn new(position: Vec2, velocity: Vec2, depth: DepthLayer, size: f32) -> Self {
        Self {
            position,
            velocity,
            depth,
            size,
        }
    }

    #[inline]
    pub fn depth(&self) -> DepthLayer {
        self.depth
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// How element velocities evolve between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionModel {
    /// Velocity chosen at seed and kept forever.
    Drift,
    /// Velocity re-derived every tick from a smooth sine-noise field.
    FlowField,
}

/// Sum of two sine/cosine products; smooth, deterministic and cheap.
pub fn flow_noise(x: f32, y: f32, t: f32) -> f32 {
    let f1 = (x * 0.005 + t * 0.0005).sin() * (y * 0.004 + t * 0.0003).cos();
    let f2 = ((x + 100.0) * 0.003 + t * 0.0007).sin() * ((y + 200.0) * 0.002 + t * 0.0004).cos();
    (f1 + f2) * 0.5
}

/// Wrap `v` into `[0, len)`. Non-finite input passes through untouched.
#[inline]
pub fn wrap_coord(v: f32, len: f32) -> f32 {
    if !v.is_finite() || len <= 0.0 {
        return v;
    }
    let w = v.rem_euclid(len);
    // rem_euclid can round up to exactly `len` for tiny negative inputs
    if w >= len {
        0.0
    } else {
        w
    }
}

pub struct Simulation {
    elements: Vec<VisualElement>,
    model: MotionModel,
    rng: StdRng,
    width: f32,
    height: f32,
    speed: f32,
    field_time: f32,
    pointer_target: Option<Vec2>,
    smoothed_pointer: Vec2,
    ticks: u64,
}

impl Simulation {
    pub fn new(model: MotionModel, seed: u64) -> Self {
        Self {
            elements: Vec::new(),
            model,
            rng: StdRng::seed_from_u64(seed),
            width: 1.0,
            height: 1.0,
            speed: 1.0,
            field_time: 0.0,
            pointer_target: None,
            smoothed_pointer: Vec2::new(0.5, 0.5),
            ticks: 0,
        }
    }

    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    /// Direct element access for tests that need exact positions. The engine
    /// never hands this out.
    #[doc(hidden)]
    pub fn elements_mut(&mut self) -> &mut Vec<VisualElement> {
        &mut self.elements
    }

    pub fn model(&self) -> MotionModel {
        self.model
    }

    pub fn dimensions(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn smoothed_pointer(&self) -> Vec2 {
        self.smoothed_pointer
    }

    /// Global speed multiplier from the active intensity profile.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Latest raw pointer in device pixels; read once per tick.
    pub fn set_pointer_target(&mut self, pointer: Option<Vec2>) {
        self.pointer_target = pointer;
    }

    pub fn count_in(&self, depth: DepthLayer) -> usize {
        self.elements.iter().filter(|e| e.depth == depth).count()
    }

    /// Replace the whole collection with `count` fresh elements sized to the
    /// surface. Also recentres the smoothed pointer.
    pub fn seed(&mut self, count: usize, surface: &SurfaceConfig) {
        self.width = surface.width();
        self.height = surface.height();
        self.smoothed_pointer = self.center();
        self.field_time = 0.0;
        self.elements.clear();
        self.elements.reserve(count);
        for i in 0..count {
            let depth = DepthLayer::for_index(i);
            let position = Vec2::new(
                self.rng.gen::<f32>() * self.width,
                self.rng.gen::<f32>() * self.height,
            );
            let velocity = Vec2::new(self.rng.gen::<f32>() - 0.5, self.rng.gen::<f32>() - 0.5);
            let size = 1.0 + self.rng.gen::<f32>() * 2.0 * depth.size();
            self.elements.push(VisualElement::new(position, velocity, depth, size));
        }
        log::debug!(
            "[sim] seeded {} elements on {}x{}",
            count,
            surface.physical_width,
            surface.physical_height
        );
    }

    /// Advance by one tick. `pointer` overrides the stored target when given.
    pub fn step(&mut self, delta_ms: f64, pointer: Option<Vec2>) {
        if pointer.is_some() {
            self.pointer_target = pointer;
        }
        let target = self
            .pointer_target
            .filter(|p| p.is_finite())
            .unwrap_or_else(|| self.center());
        self.smoothed_pointer += (target - self.smoothed_pointer) * POINTER_SMOOTHING;

        let frame_scale = (delta_ms.max(0.0) / REFERENCE_FRAME_MS) as f32;
        let (w, h) = (self.width, self.height);
        let speed = self.speed;

        match self.model {
            MotionModel::Drift => {
                for e in &mut self.elements {
                    if !e.is_finite() {
                        continue;
                    }
                    let v = e.velocity * e.depth.speed() * speed * frame_scale;
                    e.position.x = wrap_coord(e.position.x + v.x, w);
                    e.position.y = wrap_coord(e.position.y + v.y, h);
                }
            }
            MotionModel::FlowField => {
                self.field_time += speed * frame_scale;
                let t = self.field_time;
                for e in &mut self.elements {
                    if !e.is_finite() {
                        continue;
                    }
                    let p = e.position;
                    e.velocity = Vec2::new(flow_noise(p.x, p.y, t), flow_noise(p.y, p.x, t));
                    let gain = FLOW_DISPLACEMENT_GAIN * e.depth.speed() * speed * frame_scale;
                    let v = e.velocity * gain;
                    e.position.x = wrap_coord(p.x + v.x, w);
                    e.position.y = wrap_coord(p.y + v.y, h);
                }
            }
        }
        self.ticks += 1;
    }

    /// Offset applied when drawing an element of `depth`: nearer layers
    /// follow the pointer more.
    #[inline]
    pub fn parallax_offset(&self, depth: DepthLayer) -> Vec2 {
        (self.smoothed_pointer - self.center()) * depth.parallax()
    }
}
