use crate::constants::{MAX_STEP_MS, THROTTLE_SLACK};

/// Cancel token for an outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameToken(pub i32);

/// Display-synchronised frame callbacks (`requestAnimationFrame` in the
/// browser). The host invokes the engine's frame handler with the frame
/// timestamp in milliseconds.
pub trait FrameClock {
    fn request_frame(&mut self) -> Option<FrameToken>;
    fn cancel_frame(&mut self, token: FrameToken);
}

/// Outcome of a single frame callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameDecision {
    /// Baseline frame or too early: nothing to simulate.
    Skip,
    /// Advance the simulation by this many milliseconds and draw.
    Step(f64),
}

/// Throttles frame callbacks to a target cadence while keeping exactly one
/// request outstanding.
pub struct FrameScheduler {
    clock: Box<dyn FrameClock>,
    pending: Option<FrameToken>,
    target_interval_ms: f64,
    last_timestamp: Option<f64>,
}

impl FrameScheduler {
    pub fn new(clock: Box<dyn FrameClock>, target_interval_ms: f64) -> Self {
        Self {
            clock,
            pending: None,
            target_interval_ms,
            last_timestamp: None,
        }
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn target_interval_ms(&self) -> f64 {
        self.target_interval_ms
    }

    /// Ensure a frame is requested. No-op when one is already outstanding.
    pub fn start(&mut self) {
        if self.pending.is_none() {
            self.pending = self.clock.request_frame();
            if self.pending.is_none() {
                log::warn!("[frame] platform refused a frame request");
            }
        }
    }

    /// Handle a delivered frame and re-arm the chain.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> FrameDecision {
        self.pending = None;
        let decision = match self.last_timestamp {
            None => {
                self.last_timestamp = Some(timestamp_ms);
                FrameDecision::Skip
            }
            Some(last) => {
                let delta = timestamp_ms - last;
                if delta < self.target_interval_ms * THROTTLE_SLACK {
                    FrameDecision::Skip
                } else {
                    self.last_timestamp = Some(timestamp_ms);
                    FrameDecision::Step(delta.min(MAX_STEP_MS))
                }
            }
        };
        self.start();
        decision
    }

    /// Cancel the outstanding request and forget the baseline so hidden time
    /// is never simulated.
    pub fn pause(&mut self) {
        if let Some(t) = self.pending.take() {
            self.clock.cancel_frame(t);
        }
        self.last_timestamp = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        requested: i32,
        cancelled: Vec<i32>,
    }

    struct Clock(Rc<RefCell<Counts>>);

    impl FrameClock for Clock {
        fn request_frame(&mut self) -> Option<FrameToken> {
            let mut c = self.0.borrow_mut();
            c.requested += 1;
            Some(FrameToken(c.requested))
        }
        fn cancel_frame(&mut self, token: FrameToken) {
            self.0.borrow_mut().cancelled.push(token.0);
        }
    }

    fn scheduler() -> (FrameScheduler, Rc<RefCell<Counts>>) {
        let counts = Rc::new(RefCell::new(Counts::default()));
        (FrameScheduler::new(Box::new(Clock(counts.clone())), 1000.0 / 60.0), counts)
    }

    #[test]
    fn early_frames_are_skipped_but_chain_continues() {
        let (mut s, counts) = scheduler();
        s.start();
        assert_eq!(s.on_frame(0.0), FrameDecision::Skip);
        assert_eq!(s.on_frame(5.0), FrameDecision::Skip);
        assert_eq!(s.on_frame(16.0), FrameDecision::Step(16.0));
        assert_eq!(counts.borrow().requested, 4);
        assert!(s.is_scheduled());
    }

    #[test]
    fn start_is_idempotent() {
        let (mut s, counts) = scheduler();
        s.start();
        s.start();
        assert_eq!(counts.borrow().requested, 1);
    }

    #[test]
    fn pause_resets_baseline() {
        let (mut s, counts) = scheduler();
        s.start();
        s.on_frame(0.0);
        s.pause();
        assert_eq!(counts.borrow().cancelled, vec![2]);
        s.start();
        // first frame after resume only re-establishes the baseline
        assert_eq!(s.on_frame(60_000.0), FrameDecision::Skip);
        assert_eq!(s.on_frame(60_500.0), FrameDecision::Step(MAX_STEP_MS));
    }
}
