use crate::core::{FrameClock, FrameToken, TimerHost, TimerToken};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Slot holding the frame callback. Filled after the engine exists so the
/// closure can capture it; emptied on teardown to break the cycle.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
pub type TimerCallback = Rc<RefCell<Option<Box<dyn FnMut()>>>>;

/// `requestAnimationFrame`-backed frame clock.
pub struct RafClock {
    window: web::Window,
    callback: FrameCallback,
}

impl RafClock {
    pub fn new(window: web::Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameClock for RafClock {
    fn request_frame(&mut self) -> Option<FrameToken> {
        let slot = self.callback.borrow();
        let cb = slot.as_ref()?;
        let id = self.window.request_animation_frame(cb.as_ref().unchecked_ref());
        id.ok().map(FrameToken)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        _ = self.window.cancel_animation_frame(token.0);
    }
}

/// One-shot debounce timers on `gloo_timers`. Only one timer is live at a
/// time; dropping the `Timeout` cancels it.
pub struct WindowTimers {
    callback: TimerCallback,
    pending: Option<(TimerToken, Timeout)>,
    next_id: i32,
}

impl WindowTimers {
    pub fn new(callback: TimerCallback) -> Self {
        Self {
            callback,
            pending: None,
            next_id: 0,
        }
    }
}

impl TimerHost for WindowTimers {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerToken> {
        // the slot is mutably borrowed while the callback itself re-arms
        if self.callback.try_borrow().is_ok_and(|cb| cb.is_none()) {
            return None;
        }
        self.next_id += 1;
        let token = TimerToken(self.next_id);
        let slot = self.callback.clone();
        let timeout = Timeout::new(delay_ms, move || {
            if let Some(cb) = slot.borrow_mut().as_mut() {
                cb();
            }
        });
        // replacing an older handle cancels it
        self.pending = Some((token, timeout));
        Some(token)
    }

    fn clear_timeout(&mut self, token: TimerToken) {
        if self.pending.as_ref().is_some_and(|(t, _)| *t == token) {
            // dropping the handle clears the browser timer
            self.pending = None;
        }
    }
}
