//! `localStorage` persistence for the visited log.
//!
//! Lists are stored as JSON string arrays. A missing or malformed
//! value reads as an empty list; storage failures (quota, privacy
//! mode) are logged and otherwise ignored, the engine keeps its
//! in-memory copy.

use veer::ListStore;
use web_sys::Storage;

/// [`ListStore`] backed by `window.localStorage`.
pub struct LocalStorageStore;

impl ListStore for LocalStorageStore {
	fn read_list(&self, key: &str) -> Vec<String> {
		let Some(raw) = local_storage().and_then(|s| s.get_item(key).ok().flatten()) else {
			return Vec::new();
		};
		serde_json::from_str(&raw).unwrap_or_default()
	}

	fn write_list(&self, key: &str, values: &[String]) {
		let Some(storage) = local_storage() else {
			return;
		};
		if let Ok(json) = serde_json::to_string(values)
			&& let Err(err) = storage.set_item(key, &json)
		{
			web_sys::console::warn_1(&err);
		}
	}
}

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}
