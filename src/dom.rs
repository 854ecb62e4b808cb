use crate::config::{EngineSettings, Variant};
use crate::core::SurfaceConfig;
use crate::error::EngineError;
use anyhow::anyhow;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<(web::Window, web::Document)> {
    let window = web::window()?;
    let document = window.document()?;
    Some((window, document))
}

/// Create the background canvas as the container's last child, stretched to
/// fill it and invisible to pointer and assistive technology.
pub fn attach_canvas(
    document: &web::Document,
    container: &web::HtmlElement,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow!("create canvas: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow!("not a canvas: {:?}", e))?;
    _ = canvas.set_attribute("aria-hidden", "true");
    let style = canvas.style();
    for (k, v) in [
        ("position", "absolute"),
        ("inset", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("pointer-events", "none"),
        ("display", "block"),
    ] {
        style
            .set_property(k, v)
            .map_err(|e| anyhow!("canvas style {k}: {:?}", e))?;
    }
    container
        .append_child(&canvas)
        .map_err(|e| anyhow!("append canvas: {:?}", e))?;
    Ok(canvas)
}

/// Container size in CSS pixels.
pub fn container_size(container: &web::HtmlElement) -> (f64, f64) {
    let rect = container.get_bounding_client_rect();
    (rect.width(), rect.height())
}

/// Container-relative pointer position in CSS pixels.
pub fn pointer_in_container(ev: &web::MouseEvent, container: &web::HtmlElement) -> (f32, f32) {
    let rect = container.get_bounding_client_rect();
    (
        (ev.client_x() as f64 - rect.left()) as f32,
        (ev.client_y() as f64 - rect.top()) as f32,
    )
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, cfg: &SurfaceConfig) {
    if canvas.width() != cfg.physical_width {
        canvas.set_width(cfg.physical_width);
    }
    if canvas.height() != cfg.physical_height {
        canvas.set_height(cfg.physical_height);
    }
}

pub fn context_2d(
    canvas: &web::HtmlCanvasElement,
) -> Result<web::CanvasRenderingContext2d, EngineError> {
    canvas
        .get_context("2d")
        .map_err(|e| EngineError::surface(format!("2d context: {:?}", e)))?
        .ok_or_else(|| EngineError::surface("2d context not supported"))?
        .dyn_into()
        .map_err(|_| EngineError::surface("2d context has unexpected type"))
}

pub fn context_webgl(
    canvas: &web::HtmlCanvasElement,
) -> Result<web::WebGlRenderingContext, EngineError> {
    canvas
        .get_context("webgl")
        .map_err(|e| EngineError::surface(format!("webgl context: {:?}", e)))?
        .ok_or_else(|| EngineError::surface("webgl not supported"))?
        .dyn_into()
        .map_err(|_| EngineError::surface("webgl context has unexpected type"))
}

/// Mount settings from `data-*` attributes on the container. Invalid values
/// are ignored; `EngineSettings::sanitized` clamps the rest.
pub fn settings_from_attributes(container: &web::HtmlElement) -> EngineSettings {
    let variant = container
        .get_attribute("data-variant")
        .and_then(|v| match v.parse::<Variant>() {
            Ok(v) => Some(v),
            Err(e) => {
                log::debug!("[dom] {e}");
                None
            }
        })
        .unwrap_or(Variant::ParticleField);
    let mut settings = EngineSettings::for_variant(variant);
    if let Some(fps) = parse_attr::<f64>(container, "data-fps") {
        settings.target_fps = fps;
    }
    if let Some(cap) = parse_attr::<f64>(container, "data-dpr-cap") {
        settings.dpr_cap = cap;
    }
    if let Some(seed) = parse_attr::<u64>(container, "data-seed") {
        settings.seed = Some(seed);
    }
    settings.sanitized()
}

fn parse_attr<T: std::str::FromStr>(el: &web::HtmlElement, name: &str) -> Option<T> {
    let raw = el.get_attribute(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::debug!("[dom] ignoring {name}={raw:?}");
            None
        }
    }
}
