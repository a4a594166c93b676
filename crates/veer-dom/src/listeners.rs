//! Window event listeners feeding the controller.

use crate::history::{current_location, stored_entry};
use veer::{NavigationController, parse_current_url};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, PopStateEvent};

/// Attaches popstate and hashchange listeners that route browser
/// back/forward and fragment navigation through `controller`.
///
/// The listeners hold clones of the controller and stay attached for
/// the life of the page; their closures are intentionally leaked.
pub fn attach_window_listeners(
	controller: &NavigationController,
	origin_path: &str,
) -> Result<(), JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;

	let origin = origin_path.to_string();
	let popstate = {
		let controller = controller.clone();
		Closure::wrap(Box::new(move |event: PopStateEvent| {
			// Entries the engine did not stamp (a restored session, an
			// external link) carry no sequence; treat them as older
			// than anything the engine has seen.
			let (url, seq) = stored_entry(&event)
				.unwrap_or_else(|| (parse_current_url(&current_location(), &origin), 0));
			controller.handle_pop_state(&url, seq);
		}) as Box<dyn FnMut(_)>)
	};
	window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())?;
	popstate.forget();

	let hashchange = {
		let controller = controller.clone();
		Closure::wrap(Box::new(move |_event: Event| {
			controller.handle_hash_change();
		}) as Box<dyn FnMut(_)>)
	};
	window.add_event_listener_with_callback("hashchange", hashchange.as_ref().unchecked_ref())?;
	hashchange.forget();

	Ok(())
}
