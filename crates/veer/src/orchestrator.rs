//! Per-group animation orchestration.
//!
//! One orchestrator exists per mounted route group. For each
//! transition it selects the group's effect pair (reverse pair on back
//! navigation), plays the effects against the currently-bound visual
//! handles, and reports exactly one "done" signal once every completion
//! source has fired: a programmatic effect completes on its playback's
//! finish event, a declarative effect on a timer set to its declared
//! duration. When both kinds play, completion is therefore the later of
//! the two. A cancelled transition reports nothing.

use crate::effect::{Effect, EffectPlayback, Scheduler, TimerId, VisualHandle};
use crate::group::RouteGroupBinding;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Reconciles the completion signals of one in-flight transition.
///
/// `signal` is called once per completion source; the done callback
/// fires when the last source signals. Cancellation disarms the gate so
/// a late signal can never fire the callback.
struct CompletionGate {
	remaining: Cell<usize>,
	cancelled: Cell<bool>,
	done: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl CompletionGate {
	fn arm(remaining: usize, done: Box<dyn FnOnce()>) -> Rc<Self> {
		Rc::new(Self {
			remaining: Cell::new(remaining),
			cancelled: Cell::new(false),
			done: RefCell::new(Some(done)),
		})
	}

	fn signal(&self) {
		if self.cancelled.get() {
			return;
		}
		let left = self.remaining.get().saturating_sub(1);
		self.remaining.set(left);
		if left == 0
			&& let Some(done) = self.done.borrow_mut().take()
		{
			done();
		}
	}

	fn disarm(&self) {
		self.cancelled.set(true);
		self.done.borrow_mut().take();
	}
}

/// Everything that must be torn down when a transition ends.
struct ActiveEffects {
	playbacks: Vec<Box<dyn EffectPlayback>>,
	timers: Vec<TimerId>,
	markers: Vec<(Rc<dyn VisualHandle>, String)>,
	gate: Rc<CompletionGate>,
}

/// Plays one route group's transition effects and reports completion.
pub(crate) struct AnimationOrchestrator {
	scheduler: Rc<dyn Scheduler>,
	active: Option<ActiveEffects>,
}

impl AnimationOrchestrator {
	pub(crate) fn new(scheduler: Rc<dyn Scheduler>) -> Self {
		Self {
			scheduler,
			active: None,
		}
	}

	/// Starts the group's effects for a pending navigation.
	///
	/// `done` fires exactly once when all of this group's completion
	/// sources have signalled, or never if the transition is cancelled
	/// first. A group with nothing to play (no effects configured, or a
	/// programmatic effect with no handle bound) reports done
	/// immediately; declarative effects keep their timer even without a
	/// handle so that timing stays in lock-step across groups.
	pub(crate) fn begin_transition(
		&mut self,
		binding: &RouteGroupBinding,
		is_back: bool,
		done: Box<dyn FnOnce()>,
	) {
		// A stale transition must never outlive a new one
		self.cancel();

		let (effect_in, effect_out) = binding.transition().effects_for(is_back);
		let plan: [(Option<&Effect>, Option<&Rc<dyn VisualHandle>>); 2] = [
			(effect_in, binding.incoming()),
			(effect_out, binding.outgoing()),
		];

		let mut sources = 0;
		for (effect, handle) in plan {
			match effect {
				Some(Effect::Programmatic { .. }) if handle.is_some() => sources += 1,
				Some(Effect::Declarative { .. }) => sources += 1,
				_ => {}
			}
		}

		if sources == 0 {
			done();
			return;
		}

		let gate = CompletionGate::arm(sources, done);
		let mut playbacks = Vec::new();
		let mut timers = Vec::new();
		let mut markers = Vec::new();

		for (effect, handle) in plan {
			match effect {
				Some(Effect::Programmatic { keyframes, options }) => {
					if let Some(handle) = handle {
						let mut playback = handle.play(keyframes, options);
						let gate = Rc::clone(&gate);
						playback.on_finish(Box::new(move || gate.signal()));
						playbacks.push(playback);
					}
				}
				Some(Effect::Declarative { class, duration_ms }) => {
					if let Some(handle) = handle {
						handle.apply_marker(class);
						markers.push((Rc::clone(handle), class.clone()));
					}
					let gate = Rc::clone(&gate);
					timers.push(
						self.scheduler
							.schedule(*duration_ms, Box::new(move || gate.signal())),
					);
				}
				None => {}
			}
		}

		self.active = Some(ActiveEffects {
			playbacks,
			timers,
			markers,
			gate,
		});
	}

	/// Returns whether a transition is still waiting to report done.
	pub(crate) fn is_pending(&self) -> bool {
		self.active
			.as_ref()
			.map(|active| active.gate.done.borrow().is_some())
			.unwrap_or(false)
	}

	/// Cancels any in-flight effects and pending timers.
	///
	/// Safe to call at any time; after cancellation the pending done
	/// callback will never fire. Also used to tear down a naturally
	/// completed transition (disarming an already-fired gate is a
	/// no-op).
	pub(crate) fn cancel(&mut self) {
		let Some(mut active) = self.active.take() else {
			return;
		};

		active.gate.disarm();
		for playback in &mut active.playbacks {
			playback.cancel();
		}
		for timer in active.timers {
			self.scheduler.cancel(timer);
		}
		for (handle, class) in active.markers {
			handle.clear_marker(&class);
		}
	}
}
