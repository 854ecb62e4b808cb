pub mod engine;
pub mod motion;
pub mod render;
pub mod scheduler;
pub mod sim;
pub mod surface;

pub use engine::*;
pub use motion::*;
pub use render::*;
pub use scheduler::*;
pub use sim::*;
pub use surface::*;

// Shaders bundled as string constants
pub static GRID_VERT: &str = include_str!("../../shaders/grid.vert");
pub static GRID_FRAG: &str = include_str!("../../shaders/grid.frag");
