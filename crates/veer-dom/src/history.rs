//! History API bindings.
//!
//! Every entry the engine pushes or replaces carries a state object
//! `{ url, seq }`; the popstate listener reads `seq` back to infer the
//! navigation direction. Entries created outside the engine (a page
//! loaded fresh, a link from another document) carry no such state.

use veer::{HistoryEntry, HistorySync};
use wasm_bindgen::JsValue;
use web_sys::PopStateEvent;

/// [`HistorySync`] backed by `window.history` and `window.location`.
pub struct BrowserHistory;

impl HistorySync for BrowserHistory {
	fn current_url(&self) -> String {
		current_location()
	}

	fn push(&self, entry: &HistoryEntry) {
		if let Err(err) = push_state(entry) {
			web_sys::console::warn_1(&err);
		}
	}

	fn replace(&self, entry: &HistoryEntry) {
		if let Err(err) = replace_state(entry) {
			web_sys::console::warn_1(&err);
		}
	}
}

/// Reads the location as pathname plus hash. Origin-path stripping is
/// the engine's job ([`veer::parse_current_url`]).
pub(crate) fn current_location() -> String {
	let Some(window) = web_sys::window() else {
		return "/".to_string();
	};
	let location = window.location();
	let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
	let hash = location.hash().unwrap_or_default();
	format!("{pathname}{hash}")
}

/// Reads the engine state stamped onto a popstate event's entry.
/// Returns `None` for entries the engine did not create.
pub(crate) fn stored_entry(event: &PopStateEvent) -> Option<(String, i64)> {
	let state = event.state();
	if state.is_null() || state.is_undefined() {
		return None;
	}
	let url = js_sys::Reflect::get(&state, &JsValue::from_str("url"))
		.ok()?
		.as_string()?;
	let seq = js_sys::Reflect::get(&state, &JsValue::from_str("seq"))
		.ok()?
		.as_f64()? as i64;
	Some((url, seq))
}

fn state_object(entry: &HistoryEntry) -> js_sys::Object {
	let state = js_sys::Object::new();
	let _ = js_sys::Reflect::set(
		&state,
		&JsValue::from_str("url"),
		&JsValue::from_str(&entry.url),
	);
	let _ = js_sys::Reflect::set(
		&state,
		&JsValue::from_str("seq"),
		&JsValue::from_f64(entry.seq as f64),
	);
	state
}

fn push_state(entry: &HistoryEntry) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;
	window
		.history()?
		.push_state_with_url(&state_object(entry), "", Some(&entry.display_url))
}

fn replace_state(entry: &HistoryEntry) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;
	window
		.history()?
		.replace_state_with_url(&state_object(entry), "", Some(&entry.display_url))
}
