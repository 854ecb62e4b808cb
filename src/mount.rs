use crate::canvas::Canvas2d;
use crate::config::{EngineSettings, Intensity, Variant};
use crate::constants::{INTENSITY_CHANGE_EVENT, INTENSITY_STORAGE_KEY, REDUCED_MOTION_QUERY};
use crate::core::{CanvasRenderer, Engine, EngineHosts, MountSignals, PreferenceStore, Renderer};
use crate::dom;
use crate::error::EngineError;
use crate::events::ListenerSet;
use crate::frame::{FrameCallback, RafClock, TimerCallback, WindowTimers};
use crate::gl::GridRenderer;
use crate::prefs::LocalStoragePreferences;
use anyhow::Context;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type SharedEngine = Rc<RefCell<Engine>>;

/// Run `f` against the engine unless it is already borrowed further up the
/// stack.
fn with_engine(engine: &SharedEngine, f: impl FnOnce(&mut Engine)) {
    match engine.try_borrow_mut() {
        Ok(mut e) => f(&mut e),
        Err(_) => log::warn!("[engine] re-entrant callback dropped"),
    }
}

struct Mounted {
    engine: SharedEngine,
    listeners: ListenerSet,
    frame_cb: FrameCallback,
    timer_cb: TimerCallback,
    canvas: web::HtmlCanvasElement,
}

impl Mounted {
    fn teardown(mut self) {
        // engine first: cancels the pending frame and resize timer
        self.engine.borrow_mut().teardown();
        self.listeners.remove_all();
        self.frame_cb.borrow_mut().take();
        self.timer_cb.borrow_mut().take();
        self.canvas.remove();
    }
}

/// Disposable handle returned to the host page.
#[wasm_bindgen]
pub struct BackgroundHandle {
    inner: Option<Mounted>,
}

#[wasm_bindgen]
impl BackgroundHandle {
    /// Stop the animation and release every listener, timer and GPU object.
    /// Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(m) = self.inner.take() {
            m.teardown();
        }
    }

    pub fn state(&self) -> String {
        match &self.inner {
            Some(m) => m.engine.borrow().state().as_str().to_string(),
            None => "torn-down".to_string(),
        }
    }

    pub fn variant(&self) -> Option<String> {
        self.inner
            .as_ref()
            .map(|m| m.engine.borrow().variant().as_str().to_string())
    }

    /// Intensity of the active profile.
    pub fn intensity(&self) -> Option<String> {
        self.inner
            .as_ref()
            .map(|m| m.engine.borrow().profile().intensity.as_str().to_string())
    }

    /// Number of simulated elements; 0 once disposed.
    #[wasm_bindgen(js_name = elementCount)]
    pub fn element_count(&self) -> u32 {
        let Some(m) = &self.inner else {
            return 0;
        };
        m.engine.borrow().simulation().elements().len() as u32
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn build_renderer(
    canvas: &web::HtmlCanvasElement,
    variant: Variant,
) -> Result<Box<dyn Renderer>, EngineError> {
    Ok(match variant {
        Variant::ParticleField | Variant::NetworkGraph | Variant::SecurityMesh => {
            let target = Canvas2d::new(canvas.clone(), dom::context_2d(canvas)?);
            Box::new(CanvasRenderer::new(target, variant))
        }
        Variant::ShaderGrid => Box::new(GridRenderer::new(canvas.clone())?),
    })
}

/// Mount a background into `container`. On error nothing is left behind in
/// the DOM and the caller should simply render no background.
pub fn mount(
    container: &web::HtmlElement,
    settings: EngineSettings,
) -> Result<BackgroundHandle, EngineError> {
    let settings = settings.sanitized();
    let (window, document) =
        dom::window_document().ok_or_else(|| EngineError::surface("no window/document"))?;
    let canvas = dom::attach_canvas(&document, container)
        .map_err(|e| EngineError::surface(format!("{e:#}")))?;
    let renderer = match build_renderer(&canvas, settings.variant) {
        Ok(r) => r,
        Err(e) => {
            canvas.remove();
            return Err(e);
        }
    };

    let store =
        LocalStoragePreferences::new(settings.storage_key.clone(), settings.change_event.clone());
    let reduced_query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
    let (logical_width, logical_height) = dom::container_size(container);
    let signals = MountSignals {
        logical_width,
        logical_height,
        device_pixel_ratio: window.device_pixel_ratio(),
        reduced_motion: reduced_query.as_ref().map(|q| q.matches()).unwrap_or(false),
        page_visible: !document.hidden(),
    };

    let frame_cb: FrameCallback = Rc::new(RefCell::new(None));
    let timer_cb: TimerCallback = Rc::new(RefCell::new(None));
    let hosts = EngineHosts {
        frames: Box::new(RafClock::new(window.clone(), frame_cb.clone())),
        timers: Box::new(WindowTimers::new(timer_cb.clone())),
        renderer,
    };
    let engine = Engine::new(&settings, signals, &store, hosts);
    let engine: SharedEngine = Rc::new(RefCell::new(engine));

    {
        let engine = engine.clone();
        *frame_cb.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            with_engine(&engine, |e| e.on_frame(ts));
        }) as Box<dyn FnMut(f64)>));
    }
    {
        let engine = engine.clone();
        *timer_cb.borrow_mut() = Some(Box::new(move || {
            with_engine(&engine, |e| e.on_resize_timer());
        }));
    }

    let mut mounted = Mounted {
        engine: engine.clone(),
        listeners: ListenerSet::default(),
        frame_cb,
        timer_cb,
        canvas,
    };
    if let Err(e) = wire_listeners(
        &mut mounted.listeners,
        &engine,
        &window,
        &document,
        container,
        reduced_query.as_ref(),
        &store,
    ) {
        mounted.teardown();
        return Err(EngineError::surface(format!("{e:#}")));
    }

    engine.borrow_mut().mount();
    log::info!(
        "[engine] {} listeners attached for {}",
        mounted.listeners.len(),
        settings.variant
    );
    Ok(BackgroundHandle { inner: Some(mounted) })
}

fn wire_listeners(
    listeners: &mut ListenerSet,
    engine: &SharedEngine,
    window: &web::Window,
    document: &web::Document,
    container: &web::HtmlElement,
    reduced_query: Option<&web::MediaQueryList>,
    store: &LocalStoragePreferences,
) -> anyhow::Result<()> {
    {
        let (engine, container, win) = (engine.clone(), container.clone(), window.clone());
        listeners
            .listen(window, "resize", move |_| {
                let (w, h) = dom::container_size(&container);
                let dpr = win.device_pixel_ratio();
                with_engine(&engine, |e| e.on_resize(w, h, dpr));
            })
            .context("resize listener")?;
    }
    {
        let (engine, container) = (engine.clone(), container.clone());
        listeners
            .listen(window, "pointermove", move |ev| {
                if let Some(ev) = ev.dyn_ref::<web::MouseEvent>() {
                    let (x, y) = dom::pointer_in_container(ev, &container);
                    with_engine(&engine, |e| e.on_pointer_move(x, y));
                }
            })
            .context("pointer listener")?;
    }
    {
        let (engine, doc) = (engine.clone(), document.clone());
        listeners
            .listen(document, "visibilitychange", move |_| {
                let visible = !doc.hidden();
                with_engine(&engine, |e| e.on_visibility_change(visible));
            })
            .context("visibility listener")?;
    }
    if let Some(query) = reduced_query {
        let (engine, q) = (engine.clone(), query.clone());
        listeners
            .listen(query, "change", move |ev| {
                let active = ev
                    .dyn_ref::<web::MediaQueryListEvent>()
                    .map(|m| m.matches())
                    .unwrap_or_else(|| q.matches());
                with_engine(&engine, |e| e.on_reduced_motion_change(active));
            })
            .context("reduced-motion listener")?;
    }
    {
        let (engine, store, event) = (engine.clone(), store.clone(), store.event().to_string());
        listeners
            .listen(window, &event, move |ev| {
                // events without a string detail fall back to the stored value
                let raw = ev
                    .dyn_ref::<web::CustomEvent>()
                    .and_then(|c| c.detail().as_string())
                    .or_else(|| store.read().ok().flatten());
                log::debug!("[motion] same-tab intensity event: {:?}", raw);
                with_engine(&engine, |e| e.on_intensity_preference(raw.as_deref()));
            })
            .context("intensity listener")?;
    }
    {
        let (engine, key) = (engine.clone(), store.key().to_string());
        listeners
            .listen(window, "storage", move |ev| {
                let Some(ev) = ev.dyn_ref::<web::StorageEvent>() else {
                    return;
                };
                if ev.key().as_deref() == Some(key.as_str()) {
                    let raw = ev.new_value();
                    log::debug!("[motion] cross-tab intensity change: {:?}", raw);
                    with_engine(&engine, |e| e.on_intensity_preference(raw.as_deref()));
                }
            })
            .context("storage listener")?;
    }
    Ok(())
}

/// Result-returning mount boundary for the host page: failures are logged
/// and turned into `undefined`, never thrown.
#[wasm_bindgen(js_name = mountBackground)]
pub fn mount_background(
    container: web::HtmlElement,
    variant: Option<String>,
) -> Option<BackgroundHandle> {
    let mut settings = dom::settings_from_attributes(&container);
    if let Some(v) = variant {
        match v.parse::<Variant>() {
            Ok(v) => settings.variant = v,
            Err(e) => log::warn!("[engine] {e}; using {}", settings.variant),
        }
    }
    match mount(&container, settings) {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::warn!("[engine] background disabled: {e}");
            None
        }
    }
}

/// Persist a new intensity and notify every mounted background (this tab via
/// the custom event, other tabs via the storage event).
#[wasm_bindgen(js_name = setBackgroundIntensity)]
pub fn set_background_intensity(value: &str) -> bool {
    let intensity = Intensity::from_preference(Some(value));
    let store = LocalStoragePreferences::new(INTENSITY_STORAGE_KEY, INTENSITY_CHANGE_EVENT);
    match store.write(intensity.as_str()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("[motion] intensity change not broadcast: {e}");
            false
        }
    }
}
