//! Ambient background animation engine.
//!
//! The platform-independent engine lives in [`core`] and is exercised by the
//! host-side tests. The browser glue (canvas/WebGL surfaces, frame loop,
//! listeners, localStorage preferences) is compiled for `wasm32` only.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod gl;
#[cfg(target_arch = "wasm32")]
mod mount;
#[cfg(target_arch = "wasm32")]
mod prefs;

pub use config::{EngineSettings, Intensity, IntensityProfile, Variant};
pub use error::EngineError;

#[cfg(target_arch = "wasm32")]
pub use gl::GridRenderer;
#[cfg(target_arch = "wasm32")]
pub use mount::{mount, mount_background, set_background_intensity, BackgroundHandle};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ambient-bg ready");
}
