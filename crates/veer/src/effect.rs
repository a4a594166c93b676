//! Visual effect descriptions and the capabilities that play them.
//!
//! The engine treats animation abstractly: an [`Effect`] is either a
//! programmatic keyframe description played through a [`VisualHandle`]
//! (completion signalled by the playback's own finish event) or a
//! declarative marker (a style-class toggle) whose duration is declared
//! by the caller and bounded by a [`Scheduler`] timer. The browser
//! implementations live in `veer-dom`.

use serde::Serialize;
use std::collections::BTreeMap;

/// A single keyframe in a programmatic effect.
///
/// Serializes to the shape the Web Animations API expects, so the DOM
/// layer can hand it to `Element.animate` unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Keyframe {
	/// CSS property name to value, e.g. `"opacity"` to `"0"`.
	#[serde(flatten)]
	pub properties: BTreeMap<String, String>,
	/// Keyframe offset in `[0, 1]`; evenly spaced when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub offset: Option<f64>,
	/// Easing applied from this keyframe to the next.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub easing: Option<String>,
}

impl Keyframe {
	/// Creates an empty keyframe.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a CSS property.
	pub fn prop(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.insert(name.into(), value.into());
		self
	}

	/// Sets the keyframe offset.
	pub fn offset(mut self, offset: f64) -> Self {
		self.offset = Some(offset);
		self
	}

	/// Sets the easing.
	pub fn easing(mut self, easing: impl Into<String>) -> Self {
		self.easing = Some(easing.into());
		self
	}
}

/// Playback options for a programmatic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectOptions {
	/// Playback duration in milliseconds.
	pub duration_ms: u64,
}

/// A visual effect, polymorphic over how completion is signalled.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
	/// A named marker (style class) applied for a caller-declared
	/// duration; completion is a timer.
	Declarative {
		/// The marker (class name) toggled on the visual handle.
		class: String,
		/// Declared duration in milliseconds.
		duration_ms: u64,
	},
	/// A keyframe description played on the visual handle; completion
	/// is the playback's finish event.
	Programmatic {
		/// Keyframes in playback order.
		keyframes: Vec<Keyframe>,
		/// Playback options.
		options: EffectOptions,
	},
}

impl Effect {
	/// Creates a declarative effect.
	pub fn class(class: impl Into<String>, duration_ms: u64) -> Self {
		Self::Declarative {
			class: class.into(),
			duration_ms,
		}
	}

	/// Creates a programmatic effect.
	pub fn keyframes(keyframes: Vec<Keyframe>, duration_ms: u64) -> Self {
		Self::Programmatic {
			keyframes,
			options: EffectOptions { duration_ms },
		}
	}
}

/// An in-flight programmatic effect.
pub trait EffectPlayback {
	/// Registers the completion callback. Called at most once per
	/// playback; a cancelled playback never fires it.
	fn on_finish(&mut self, callback: Box<dyn FnOnce()>);

	/// Cancels the playback. The finish callback will not fire.
	fn cancel(&mut self);
}

/// A view surface that effects are played against.
///
/// Route groups bind one handle for the outgoing view and one for the
/// incoming view; the orchestrator reads them just-in-time when a
/// transition begins.
pub trait VisualHandle {
	/// Plays a keyframe effect, returning its playback.
	fn play(&self, keyframes: &[Keyframe], options: &EffectOptions) -> Box<dyn EffectPlayback>;

	/// Applies a declarative marker (style class).
	fn apply_marker(&self, class: &str);

	/// Removes a previously applied marker.
	fn clear_marker(&self, class: &str);
}

/// Identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// One-shot timer capability.
///
/// Everything runs on a single logical thread; callbacks fire on that
/// thread, never concurrently with engine code.
pub trait Scheduler {
	/// Schedules `callback` to run after `delay_ms`.
	fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId;

	/// Cancels a pending timer. Cancelling an already-fired or unknown
	/// timer is a no-op.
	fn cancel(&self, timer: TimerId);
}
