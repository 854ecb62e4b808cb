use crate::core::PreferenceStore;
use crate::error::EngineError;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Intensity preference persisted in `localStorage`. Writes are broadcast to
/// the current tab with a custom event; other tabs see the `storage` event.
#[derive(Clone, Debug)]
pub struct LocalStoragePreferences {
    key: String,
    event: String,
}

impl LocalStoragePreferences {
    pub fn new(key: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            event: event.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    fn storage(&self) -> Result<web::Storage, EngineError> {
        web::window()
            .ok_or_else(|| EngineError::Preference("no window".into()))?
            .local_storage()
            .map_err(|e| EngineError::Preference(format!("{:?}", e)))?
            .ok_or_else(|| EngineError::Preference("localStorage unavailable".into()))
    }

    fn broadcast(&self, value: &str) -> Result<(), EngineError> {
        let window = web::window().ok_or_else(|| EngineError::Preference("no window".into()))?;
        let init = web::CustomEventInit::new();
        init.set_detail(&JsValue::from_str(value));
        let ev = web::CustomEvent::new_with_event_init_dict(&self.event, &init)
            .map_err(|e| EngineError::Preference(format!("{:?}", e)))?;
        window
            .dispatch_event(&ev)
            .map_err(|e| EngineError::Preference(format!("{:?}", e)))?;
        Ok(())
    }
}

impl PreferenceStore for LocalStoragePreferences {
    fn read(&self) -> Result<Option<String>, EngineError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| EngineError::Preference(format!("{:?}", e)))
    }

    fn write(&self, value: &str) -> Result<(), EngineError> {
        // persistence failing (private mode, quota) should not stop this tab
        // from switching
        if let Err(e) = self.storage().and_then(|s| {
            s.set_item(&self.key, value)
                .map_err(|e| EngineError::Preference(format!("{:?}", e)))
        }) {
            log::warn!("[motion] could not persist intensity: {e}");
        }
        self.broadcast(value)
    }
}
