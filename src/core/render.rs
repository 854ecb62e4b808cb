//! Render step: turns a read-only view of the simulation into draw calls.
//!
//! The 2D variants emit calls against [`DrawTarget`], which the browser
//! implements on top of `CanvasRenderingContext2d` and tests implement as a
//! recorder. The shader variant only needs [`shader_uniforms`].

use crate::config::{IntensityProfile, Variant};
use crate::constants::*;
use crate::core::sim::{DepthLayer, Simulation};
use crate::core::surface::SurfaceConfig;
use glam::Vec2;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_array(c: [u8; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }

    pub fn css(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {:.4})", self.0, self.1, self.2, alpha.clamp(0.0, 1.0))
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Background repaint for one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Wash {
    /// Opaque linear gradient from the top-left to the bottom-right corner.
    Gradient(Vec<(f32, Rgb)>),
    /// Translucent solid fill; leaves trails of previous frames.
    Fade(Rgb, f32),
    /// Reset to fully transparent so the page shows through.
    Clear,
}

/// Immediate-mode 2D drawing surface. Coordinates are device pixels.
pub trait DrawTarget {
    /// Match the backing store to the new physical size.
    fn resize(&mut self, _surface: &SurfaceConfig) {}
    fn fill_background(&mut self, wash: &Wash, width: f64, height: f64);
    fn radial_glow(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
    fn line(&mut self, from: Vec2, to: Vec2, width: f64, color: Rgb, alpha: f32);
    fn disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
}

/// Everything a renderer may read for one frame.
pub struct Scene<'a> {
    pub simulation: &'a Simulation,
    pub profile: &'a IntensityProfile,
    pub surface: &'a SurfaceConfig,
    /// Animated time; does not advance while paused.
    pub elapsed_ms: f64,
}

/// Render contract shared by every background variant.
pub trait Renderer {
    /// Apply a new physical size to the backing surface.
    fn resize(&mut self, surface: &SurfaceConfig);
    fn draw(&mut self, scene: &Scene<'_>);
    /// Non-animated fallback used when reduced motion is requested.
    fn draw_static(&mut self, surface: &SurfaceConfig);
    /// Drop GPU/DOM resources. Called once on teardown.
    fn release(&mut self) {}
}

/// Alpha of a connection line of length `distance`. Zero at and beyond the
/// threshold.
#[inline]
pub fn line_alpha(distance: f32, threshold: f32, link_alpha: f32, glow_alpha: f32) -> f32 {
    if !(distance < threshold) || threshold <= 0.0 {
        return 0.0;
    }
    ((1.0 - distance / threshold) * link_alpha * glow_alpha).max(0.0)
}

/// Which elements take part in the pairwise link search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkScope {
    FarLayer,
    All,
}

/// How elements themselves are painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStyle {
    /// Radial glow under a body disc and a bright core; parallax applied.
    Glow,
    /// One faint fixed-size dot at the element's own position.
    Plain,
}

#[derive(Clone, Debug)]
pub struct Palette {
    pub accent: Rgb,
    pub body: Rgb,
    pub backdrop: Wash,
    pub trail: Rgb,
    /// Colours of the reduced-motion gradient.
    pub still: [Rgb; 3],
    /// Reduced motion shows nothing at all instead of the gradient.
    pub still_transparent: bool,
}

impl Palette {
    pub fn for_variant(variant: Variant) -> Self {
        let dark = Rgb::from_array(BACKDROP_DARK);
        let mid = Rgb::from_array(BACKDROP_MID);
        let body = Rgb::from_array(BODY_RGB);
        let still_mid = match variant {
            Variant::NetworkGraph => body,
            _ => mid,
        };
        let accent = match variant {
            Variant::SecurityMesh => Rgb::from_array(MESH_RGB),
            _ => Rgb::from_array(ACCENT_RGB),
        };
        Self {
            accent,
            body,
            backdrop: Wash::Gradient(vec![(0.0, dark), (0.5, mid), (1.0, dark)]),
            trail: dark,
            still: [dark, still_mid, dark],
            still_transparent: variant == Variant::SecurityMesh,
        }
    }

    pub fn still_wash(&self) -> Wash {
        if self.still_transparent {
            return Wash::Clear;
        }
        Wash::Gradient(vec![
            (0.0, self.still[0]),
            (0.5, self.still[1]),
            (1.0, self.still[2]),
        ])
    }

    /// CSS equivalent of the still gradient for DOM fallbacks.
    pub fn still_css(&self) -> String {
        format!(
            "linear-gradient(135deg, {} 0%, {} 50%, {} 100%)",
            self.still[0].hex(),
            self.still[1].hex(),
            self.still[2].hex()
        )
    }
}

/// 2D renderer used by the particle-field and network-graph variants.
pub struct CanvasRenderer<T: DrawTarget> {
    target: T,
    palette: Palette,
    scope: LinkScope,
    style: NodeStyle,
    skipped: usize,
}

impl<T: DrawTarget> CanvasRenderer<T> {
    pub fn new(target: T, variant: Variant) -> Self {
        let scope = match variant {
            Variant::NetworkGraph | Variant::SecurityMesh => LinkScope::All,
            _ => LinkScope::FarLayer,
        };
        let style = match variant {
            Variant::SecurityMesh => NodeStyle::Plain,
            _ => NodeStyle::Glow,
        };
        Self {
            target,
            palette: Palette::for_variant(variant),
            scope,
            style,
            skipped: 0,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Elements skipped in the most recent frame for non-finite coordinates.
    pub fn skipped_last_frame(&self) -> usize {
        self.skipped
    }

    fn paint_background(&mut self, profile: &IntensityProfile, surface: &SurfaceConfig) {
        let wash = if profile.clear_alpha <= 0.0 {
            Wash::Clear
        } else if profile.clear_alpha < 1.0 {
            Wash::Fade(self.palette.trail, profile.clear_alpha)
        } else {
            self.palette.backdrop.clone()
        };
        let (w, h) = (surface.physical_width as f64, surface.physical_height as f64);
        self.target.fill_background(&wash, w, h);
    }
}

impl<T: DrawTarget> Renderer for CanvasRenderer<T> {
    fn resize(&mut self, surface: &SurfaceConfig) {
        self.target.resize(surface);
    }

    fn draw(&mut self, scene: &Scene<'_>) {
        let sim = scene.simulation;
        let profile = scene.profile;
        self.paint_background(profile, scene.surface);

        let offsets = match self.style {
            NodeStyle::Glow => DepthLayer::ALL.map(|d| sim.parallax_offset(d)),
            NodeStyle::Plain => [Vec2::ZERO; 3],
        };
        let offset_of = |d: DepthLayer| match d {
            DepthLayer::Far => offsets[0],
            DepthLayer::Mid => offsets[1],
            DepthLayer::Near => offsets[2],
        };

        // Resolve draw positions once; non-finite ones are dropped here.
        let mut drawable: Vec<(Vec2, usize)> = Vec::with_capacity(sim.elements().len());
        let mut skipped = 0;
        for (i, e) in sim.elements().iter().enumerate() {
            let p = e.position + offset_of(e.depth());
            if p.is_finite() && e.size().is_finite() {
                drawable.push((p, i));
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 && self.skipped == 0 {
            log::warn!("[render] skipping {} element(s) with non-finite state", skipped);
        }
        self.skipped = skipped;

        let accent = self.palette.accent;
        let body = self.palette.body;
        let elements = sim.elements();

        if self.style == NodeStyle::Glow {
            for &(p, i) in &drawable {
                let e = &elements[i];
                let opacity = e.depth().opacity() * profile.glow_alpha * GLOW_CENTER_ALPHA;
                self.target.radial_glow(p, e.size() * GLOW_RADIUS_FACTOR, accent, opacity);
            }
        }

        let linked: SmallVec<[Vec2; MAX_LINKED_ELEMENTS]> = drawable
            .iter()
            .filter(|(_, i)| match self.scope {
                LinkScope::FarLayer => elements[*i].depth() == DepthLayer::Far,
                LinkScope::All => true,
            })
            .take(MAX_LINKED_ELEMENTS)
            .map(|(p, _)| *p)
            .collect();
        let dpr = scene.surface.dpr as f32;
        let threshold = profile.connection_distance * dpr;
        let link_width = match self.style {
            NodeStyle::Glow => LINK_WIDTH,
            NodeStyle::Plain => MESH_LINK_WIDTH * scene.surface.dpr,
        };
        for a in 0..linked.len() {
            for b in (a + 1)..linked.len() {
                let d = linked[a].distance(linked[b]);
                let alpha = line_alpha(d, threshold, profile.link_alpha, profile.glow_alpha);
                if alpha > 0.0 {
                    self.target.line(linked[a], linked[b], link_width, accent, alpha);
                }
            }
        }

        match self.style {
            NodeStyle::Glow => {
                for &(p, i) in &drawable {
                    let e = &elements[i];
                    let opacity = e.depth().opacity() * profile.glow_alpha;
                    self.target.disc(p, e.size(), body, opacity * BODY_ALPHA_BOOST);
                    self.target.disc(p, e.size() * CORE_RADIUS_FACTOR, accent, opacity);
                }
            }
            NodeStyle::Plain => {
                // nodes at the same strength as a zero-length link
                let alpha = profile.link_alpha * profile.glow_alpha;
                for &(p, _) in &drawable {
                    self.target.disc(p, MESH_NODE_RADIUS * dpr, accent, alpha);
                }
            }
        }
    }

    fn draw_static(&mut self, surface: &SurfaceConfig) {
        let wash = self.palette.still_wash();
        let (w, h) = (surface.physical_width as f64, surface.physical_height as f64);
        self.target.fill_background(&wash, w, h);
    }
}

/// Per-frame inputs of the shader-grid program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShaderUniforms {
    pub time_ms: f32,
    pub resolution: [f32; 2],
    pub gain: f32,
}

pub fn shader_uniforms(scene: &Scene<'_>) -> ShaderUniforms {
    ShaderUniforms {
        // keep float precision usable on long-lived pages
        time_ms: (scene.elapsed_ms % 3_600_000.0) as f32,
        resolution: [scene.surface.width(), scene.surface.height()],
        gain: scene.profile.shader_gain,
    }
}
