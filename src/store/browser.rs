use super::StateStore;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{Storage, Url};

///
/// UrlQueryStore
///
/// The page's query string. Writes replace the current history entry so
/// the address bar stays shareable without growing the back stack.
///

#[derive(Debug, Default)]
pub struct UrlQueryStore;

impl UrlQueryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn current_url() -> Result<Url, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let href = window.location().href()?;
        Url::new(&href)
    }

    fn write(entries: &[(&str, String)], removed: Option<&str>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let url = Self::current_url()?;
        let params = url.search_params();
        for (key, value) in entries {
            params.set(key, value);
        }
        if let Some(key) = removed {
            params.delete(key);
        }

        window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(&url.href()))
    }
}

impl StateStore for UrlQueryStore {
    fn restore(&self, key: &str) -> Option<String> {
        Self::current_url().ok()?.search_params().get(key)
    }

    fn persist(&mut self, entries: &[(&str, String)]) {
        if let Err(err) = Self::write(entries, None) {
            warn!("query state not persisted: {err:?}");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = Self::write(&[], Some(key)) {
            warn!("query key {key} not removed: {err:?}");
        }
    }
}

///
/// LocalStorageStore
///

#[derive(Debug)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let storage = window
            .local_storage()?
            .ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;

        Ok(Self { storage })
    }
}

impl StateStore for LocalStorageStore {
    fn restore(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn persist(&mut self, entries: &[(&str, String)]) {
        for (key, value) in entries {
            if let Err(err) = self.storage.set_item(key, value) {
                warn!("localStorage write of {key} failed: {err:?}");
            }
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            warn!("localStorage remove of {key} failed: {err:?}");
        }
    }
}
