// Shared tuning constants for the ambient background engine.

// Surface
pub const DEFAULT_DPR_CAP: f64 = 2.0; // bound raster cost on high-density displays
pub const MAX_DPR_CAP: f64 = 4.0;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 120;
pub const MIN_RESIZE_DEBOUNCE_MS: u32 = 100;
pub const MAX_RESIZE_DEBOUNCE_MS: u32 = 150;

// Frame cadence
pub const DEFAULT_TARGET_FPS: f64 = 60.0;
pub const MIN_TARGET_FPS: f64 = 15.0;
pub const MAX_TARGET_FPS: f64 = 120.0;
pub const MESH_TARGET_FPS: f64 = 30.0; // security mesh is a faint accent
pub const THROTTLE_SLACK: f64 = 0.8; // step only once delta >= interval * slack
pub const MAX_STEP_MS: f64 = 100.0; // clamp after the browser stalls a tab
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0; // velocities are per 60 Hz frame

// Pointer
pub const POINTER_SMOOTHING: f32 = 0.1; // fraction of the gap closed per tick

// Depth layers: far, mid, near
pub const DEPTH_SPEED: [f32; 3] = [0.3, 0.6, 1.0];
pub const DEPTH_SIZE: [f32; 3] = [0.5, 1.5, 2.5];
pub const DEPTH_OPACITY: [f32; 3] = [0.2, 0.4, 0.6];
pub const DEPTH_PARALLAX: [f32; 3] = [0.1, 0.25, 0.45];

// Flow field (network graph motion)
pub const FLOW_DISPLACEMENT_GAIN: f32 = 0.5;

// Rendering
pub const MAX_LINKED_ELEMENTS: usize = 64; // bounds the O(k^2) connection search
pub const GLOW_RADIUS_FACTOR: f32 = 3.0;
pub const CORE_RADIUS_FACTOR: f32 = 0.5;
pub const LINK_WIDTH: f64 = 0.5;
pub const GLOW_CENTER_ALPHA: f32 = 0.8;
pub const BODY_ALPHA_BOOST: f32 = 1.5;
pub const MESH_NODE_RADIUS: f32 = 1.0; // CSS px, scaled by dpr
pub const MESH_LINK_WIDTH: f64 = 1.0; // CSS px, scaled by dpr

// Palette (sRGB 0..255)
pub const ACCENT_RGB: [u8; 3] = [0, 217, 255];
pub const BODY_RGB: [u8; 3] = [26, 58, 82];
pub const MESH_RGB: [u8; 3] = [12, 217, 255];
pub const BACKDROP_DARK: [u8; 3] = [5, 8, 16];
pub const BACKDROP_MID: [u8; 3] = [10, 14, 26];

// Preference plumbing
pub const INTENSITY_STORAGE_KEY: &str = "bgIntensity";
pub const INTENSITY_CHANGE_EVENT: &str = "bg-intensity-changed";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
