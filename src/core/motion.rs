//! Motion policy: the single source of truth for whether the engine may
//! animate and how intensely.

use crate::config::Intensity;
use crate::error::EngineError;
use std::cell::RefCell;
use std::rc::Rc;

/// Persisted intensity preference. Injected into the engine at construction
/// so nothing reads ambient global state.
pub trait PreferenceStore {
    fn read(&self) -> Result<Option<String>, EngineError>;
    fn write(&self, value: &str) -> Result<(), EngineError>;
}

/// In-memory store for non-browser hosts. Clones share the same value.
#[derive(Clone, Default)]
pub struct MemoryPreferenceStore {
    value: Rc<RefCell<Option<String>>>,
}

impl MemoryPreferenceStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Rc::new(RefCell::new(Some(value.to_string()))),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self) -> Result<Option<String>, EngineError> {
        Ok(self.value.borrow().clone())
    }

    fn write(&self, value: &str) -> Result<(), EngineError> {
        *self.value.borrow_mut() = Some(value.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

enum Listener {
    Intensity(Box<dyn FnMut(Intensity)>),
    ReducedMotion(Box<dyn FnMut(bool)>),
}

pub struct MotionPolicy {
    reduced_motion: bool,
    intensity: Intensity,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u32,
}

impl MotionPolicy {
    /// Snapshot the platform reduced-motion flag and the stored preference.
    /// An unreadable store falls back to `Normal`.
    pub fn new(reduced_motion: bool, store: &dyn PreferenceStore) -> Self {
        let stored = match store.read() {
            Ok(v) => v,
            Err(e) => {
                log::warn!("[motion] {e}; using default intensity");
                None
            }
        };
        let intensity = Intensity::from_preference(stored.as_deref());
        log::debug!(
            "[motion] initial reduced_motion={} intensity={}",
            reduced_motion,
            intensity
        );
        Self {
            reduced_motion,
            intensity,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    #[inline]
    pub fn allows_animation(&self) -> bool {
        !self.reduced_motion
    }

    #[inline]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    #[inline]
    pub fn current_intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn on_intensity_change(&mut self, callback: impl FnMut(Intensity) + 'static) -> ListenerId {
        self.push(Listener::Intensity(Box::new(callback)))
    }

    pub fn on_reduced_motion_change(&mut self, callback: impl FnMut(bool) + 'static) -> ListenerId {
        self.push(Listener::ReducedMotion(Box::new(callback)))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply a platform reduced-motion notification. Returns true on change.
    pub fn set_reduced_motion(&mut self, active: bool) -> bool {
        if self.reduced_motion == active {
            return false;
        }
        self.reduced_motion = active;
        for (_, l) in &mut self.listeners {
            if let Listener::ReducedMotion(cb) = l {
                cb(active);
            }
        }
        true
    }

    /// Apply a raw preference value from a same-tab event or a cross-tab
    /// storage notification. Returns the new intensity when it changed.
    pub fn apply_preference(&mut self, raw: Option<&str>) -> Option<Intensity> {
        let next = Intensity::from_preference(raw);
        if next == self.intensity {
            return None;
        }
        self.intensity = next;
        for (_, l) in &mut self.listeners {
            if let Listener::Intensity(cb) = l {
                cb(next);
            }
        }
        Some(next)
    }

    fn push(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn read(&self) -> Result<Option<String>, EngineError> {
            Err(EngineError::Preference("storage disabled".into()))
        }
        fn write(&self, _value: &str) -> Result<(), EngineError> {
            Err(EngineError::Preference("storage disabled".into()))
        }
    }

    #[test]
    fn unreadable_store_defaults_to_normal() {
        let policy = MotionPolicy::new(false, &BrokenStore);
        assert_eq!(policy.current_intensity(), Intensity::Normal);
    }

    #[test]
    fn listeners_fire_only_on_change() {
        let store = MemoryPreferenceStore::with_value("calm");
        let mut policy = MotionPolicy::new(false, &store);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_cb = seen.clone();
        let id = policy.on_intensity_change(move |i| seen_cb.borrow_mut().push(i));

        assert_eq!(policy.apply_preference(Some("calm")), None);
        assert_eq!(policy.apply_preference(Some("intense")), Some(Intensity::Intense));
        assert!(policy.unsubscribe(id));
        policy.apply_preference(Some("calm"));

        assert_eq!(*seen.borrow(), vec![Intensity::Intense]);
    }

    #[test]
    fn garbage_preference_maps_to_normal() {
        let store = MemoryPreferenceStore::with_value("intense");
        let mut policy = MotionPolicy::new(false, &store);
        assert_eq!(policy.apply_preference(Some("LOUD")), Some(Intensity::Normal));
        assert_eq!(policy.apply_preference(None), None);
    }
}
