//! Web Animations API bindings.
//!
//! Programmatic effects serialize their keyframes to JSON and hand
//! them to `Element.animate`; declarative markers are style classes
//! toggled through `classList`.

use veer::{EffectOptions, EffectPlayback, Keyframe, VisualHandle};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Animation, Element};

/// [`VisualHandle`] bound to a DOM element.
pub struct DomHandle {
	element: Element,
}

impl DomHandle {
	pub fn new(element: Element) -> Self {
		Self { element }
	}
}

impl VisualHandle for DomHandle {
	fn play(&self, keyframes: &[Keyframe], options: &EffectOptions) -> Box<dyn EffectPlayback> {
		// Keyframe serializes to the exact shape Element.animate takes,
		// so the round trip through JSON.parse yields a keyframe array.
		let frames = serde_json::to_string(keyframes)
			.ok()
			.and_then(|json| js_sys::JSON::parse(&json).ok());
		let animation = self.element.animate_with_f64(
			frames.as_ref().map(|value| value.unchecked_ref()),
			options.duration_ms as f64,
		);
		Box::new(DomPlayback {
			animation,
			on_finish: None,
		})
	}

	fn apply_marker(&self, class: &str) {
		let _ = self.element.class_list().add_1(class);
	}

	fn clear_marker(&self, class: &str) {
		let _ = self.element.class_list().remove_1(class);
	}
}

/// A running [`Animation`]. The finish closure is kept alive for as
/// long as the playback; [`cancel`](EffectPlayback::cancel) detaches
/// it before the animation is torn down.
pub struct DomPlayback {
	animation: Animation,
	on_finish: Option<Closure<dyn FnMut()>>,
}

impl EffectPlayback for DomPlayback {
	fn on_finish(&mut self, callback: Box<dyn FnOnce()>) {
		let mut callback = Some(callback);
		let closure = Closure::wrap(Box::new(move || {
			if let Some(callback) = callback.take() {
				callback();
			}
		}) as Box<dyn FnMut()>);
		self.animation
			.set_onfinish(Some(closure.as_ref().unchecked_ref()));
		self.on_finish = Some(closure);
	}

	fn cancel(&mut self) {
		self.animation.set_onfinish(None);
		self.animation.cancel();
		self.on_finish = None;
	}
}

impl Drop for DomPlayback {
	fn drop(&mut self) {
		// The closure dies with the playback; never leave the animation
		// pointing at it.
		if self.on_finish.is_some() {
			self.animation.set_onfinish(None);
		}
	}
}
