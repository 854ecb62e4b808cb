//! Engine configuration: background variants, intensity levels and the
//! per-variant parameter tables they select.

use crate::constants::*;
use std::fmt;
use std::str::FromStr;

/// Which background effect the engine drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    ParticleField,
    NetworkGraph,
    SecurityMesh,
    ShaderGrid,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::ParticleField => "particle-field",
            Variant::NetworkGraph => "network-graph",
            Variant::SecurityMesh => "security-mesh",
            Variant::ShaderGrid => "shader-grid",
        }
    }

    /// Frame rate the variant is tuned for. The mesh is a faint accent and
    /// runs at half rate.
    pub fn default_fps(self) -> f64 {
        match self {
            Variant::SecurityMesh => MESH_TARGET_FPS,
            _ => DEFAULT_TARGET_FPS,
        }
    }

    /// Whether the variant simulates discrete elements at all.
    pub fn has_elements(self) -> bool {
        !matches!(self, Variant::ShaderGrid)
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "particle-field" | "particles" => Ok(Variant::ParticleField),
            "network-graph" | "network" => Ok(Variant::NetworkGraph),
            "security-mesh" | "mesh" => Ok(Variant::SecurityMesh),
            "shader-grid" | "shader" | "gl" => Ok(Variant::ShaderGrid),
            other => Err(format!("unknown background variant '{other}'")),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-selectable visual intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Intensity {
    Calm,
    #[default]
    Normal,
    Intense,
}

impl Intensity {
    pub const ALL: [Intensity; 3] = [Intensity::Calm, Intensity::Normal, Intensity::Intense];

    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Calm => "calm",
            Intensity::Normal => "normal",
            Intensity::Intense => "intense",
        }
    }

    /// Lenient parse of a stored preference; anything unrecognised maps to
    /// `Normal`.
    pub fn from_preference(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    fn index(self) -> usize {
        match self {
            Intensity::Calm => 0,
            Intensity::Normal => 1,
            Intensity::Intense => 2,
        }
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "calm" => Ok(Intensity::Calm),
            "normal" => Ok(Intensity::Normal),
            "intense" => Ok(Intensity::Intense),
            other => Err(format!("unknown intensity '{other}'")),
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element count derived from the container's CSS area instead of a fixed
/// number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaDensity {
    pub area_per_element: f64,
    pub min: usize,
    pub max: usize,
}

impl AreaDensity {
    pub fn count_for(&self, logical_width: f64, logical_height: f64) -> usize {
        let area = (logical_width * logical_height).max(0.0);
        let n = (area / self.area_per_element).round() as usize;
        n.clamp(self.min, self.max)
    }
}

/// Named bundle of simulation/render parameters. Profiles are swapped as a
/// whole when the preference changes.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityProfile {
    pub intensity: Intensity,
    pub element_count: usize,
    /// When set, overrides `element_count` based on the surface area.
    pub density: Option<AreaDensity>,
    pub speed: f32,
    /// Link threshold in CSS pixels; scaled by the capped DPR at draw time.
    pub connection_distance: f32,
    pub link_alpha: f32,
    pub glow_alpha: f32,
    /// 1.0 repaints opaquely, lower values leave trails, 0.0 clears to
    /// transparent.
    pub clear_alpha: f32,
    pub shader_gain: f32,
}

// count, speed, connection distance, link alpha, glow alpha, clear alpha
type ProfileRow = (usize, f32, f32, f32, f32, f32);

const PARTICLE_FIELD_PROFILES: [ProfileRow; 3] = [
    (60, 0.2, 80.0, 0.15, 0.3, 1.0),
    (100, 0.5, 120.0, 0.15, 0.5, 1.0),
    (150, 0.8, 160.0, 0.15, 0.7, 1.0),
];

const NETWORK_GRAPH_PROFILES: [ProfileRow; 3] = [
    (25, 0.3, 130.0, 0.3, 0.4, 0.95),
    (40, 0.6, 150.0, 0.5, 0.6, 0.95),
    (60, 1.0, 170.0, 0.7, 0.8, 0.95),
];

// count is the floor used before the surface is known
const SECURITY_MESH_PROFILES: [ProfileRow; 3] = [
    (6, 0.08, 100.0, 0.04, 1.0, 0.0),
    (8, 0.12, 100.0, 0.06, 1.0, 0.0),
    (12, 0.2, 100.0, 0.09, 1.0, 0.0),
];

const SECURITY_MESH_DENSITY: [AreaDensity; 3] = [
    AreaDensity {
        area_per_element: 240_000.0,
        min: 6,
        max: 30,
    },
    AreaDensity {
        area_per_element: 160_000.0,
        min: 8,
        max: 40,
    },
    AreaDensity {
        area_per_element: 100_000.0,
        min: 12,
        max: 60,
    },
];

const SHADER_GAIN: [f32; 3] = [0.6, 1.0, 1.6];

impl IntensityProfile {
    pub fn for_variant(variant: Variant, intensity: Intensity) -> Self {
        let i = intensity.index();
        let row = match variant {
            Variant::ParticleField => PARTICLE_FIELD_PROFILES[i],
            Variant::NetworkGraph => NETWORK_GRAPH_PROFILES[i],
            Variant::SecurityMesh => SECURITY_MESH_PROFILES[i],
            Variant::ShaderGrid => (0, SHADER_GAIN[i], 0.0, 0.0, 0.0, 1.0),
        };
        let density = match variant {
            Variant::SecurityMesh => Some(SECURITY_MESH_DENSITY[i]),
            _ => None,
        };
        let (element_count, speed, connection_distance, link_alpha, glow_alpha, clear_alpha) = row;
        Self {
            intensity,
            element_count,
            density,
            speed,
            connection_distance,
            link_alpha,
            glow_alpha,
            clear_alpha,
            shader_gain: SHADER_GAIN[i],
        }
    }

    /// Number of elements to seed on a container of the given CSS size.
    pub fn element_count_for(&self, logical_width: f64, logical_height: f64) -> usize {
        match self.density {
            Some(d) => d.count_for(logical_width, logical_height),
            None => self.element_count,
        }
    }
}

/// Mount-time configuration.
#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub variant: Variant,
    pub dpr_cap: f64,
    pub resize_debounce_ms: u32,
    pub target_fps: f64,
    pub storage_key: String,
    pub change_event: String,
    /// Fixed RNG seed; `None` draws one from the platform.
    pub seed: Option<u64>,
}

impl EngineSettings {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            dpr_cap: DEFAULT_DPR_CAP,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            target_fps: variant.default_fps(),
            storage_key: INTENSITY_STORAGE_KEY.to_string(),
            change_event: INTENSITY_CHANGE_EVENT.to_string(),
            seed: None,
        }
    }

    /// Clamp every field into its supported range.
    pub fn sanitized(mut self) -> Self {
        self.dpr_cap = if self.dpr_cap.is_finite() {
            self.dpr_cap.clamp(1.0, MAX_DPR_CAP)
        } else {
            DEFAULT_DPR_CAP
        };
        self.target_fps = if self.target_fps.is_finite() {
            self.target_fps.clamp(MIN_TARGET_FPS, MAX_TARGET_FPS)
        } else {
            self.variant.default_fps()
        };
        self.resize_debounce_ms = self
            .resize_debounce_ms
            .clamp(MIN_RESIZE_DEBOUNCE_MS, MAX_RESIZE_DEBOUNCE_MS);
        self
    }

    pub fn target_frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::for_variant(Variant::ParticleField)
    }
}
