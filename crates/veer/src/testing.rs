//! In-memory collaborator doubles.
//!
//! The engine only ever talks to its collaborators through traits;
//! these implementations back them with plain memory so the full
//! navigation lifecycle can be driven deterministically from native
//! tests (and from host applications embedding the engine outside a
//! browser).

use crate::effect::{EffectOptions, EffectPlayback, Keyframe, Scheduler, TimerId, VisualHandle};
use crate::history::{HistoryEntry, HistorySync};
use crate::visited::ListStore;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// What a [`MemoryHistory`] recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
	/// A pushed entry.
	Push(HistoryEntry),
	/// A replaced entry.
	Replace(HistoryEntry),
}

/// An in-memory [`HistorySync`].
#[derive(Debug, Default)]
pub struct MemoryHistory {
	location: RefCell<String>,
	actions: RefCell<Vec<HistoryAction>>,
}

impl MemoryHistory {
	/// Creates a history whose current location is `location`.
	pub fn at(location: impl Into<String>) -> Self {
		Self {
			location: RefCell::new(location.into()),
			actions: RefCell::new(Vec::new()),
		}
	}

	/// Overwrites the current location without recording an action,
	/// simulating an external change (e.g. the browser moving on
	/// back/forward).
	pub fn set_location(&self, location: impl Into<String>) {
		*self.location.borrow_mut() = location.into();
	}

	/// Returns every recorded action in order.
	pub fn actions(&self) -> Vec<HistoryAction> {
		self.actions.borrow().clone()
	}

	/// Returns the entries pushed so far.
	pub fn pushed(&self) -> Vec<HistoryEntry> {
		self.actions
			.borrow()
			.iter()
			.filter_map(|action| match action {
				HistoryAction::Push(entry) => Some(entry.clone()),
				HistoryAction::Replace(_) => None,
			})
			.collect()
	}

	/// Returns the entries written via replace so far.
	pub fn replaced(&self) -> Vec<HistoryEntry> {
		self.actions
			.borrow()
			.iter()
			.filter_map(|action| match action {
				HistoryAction::Replace(entry) => Some(entry.clone()),
				HistoryAction::Push(_) => None,
			})
			.collect()
	}
}

impl HistorySync for MemoryHistory {
	fn current_url(&self) -> String {
		self.location.borrow().clone()
	}

	fn push(&self, entry: &HistoryEntry) {
		*self.location.borrow_mut() = entry.display_url.clone();
		self.actions.borrow_mut().push(HistoryAction::Push(entry.clone()));
	}

	fn replace(&self, entry: &HistoryEntry) {
		*self.location.borrow_mut() = entry.display_url.clone();
		self.actions
			.borrow_mut()
			.push(HistoryAction::Replace(entry.clone()));
	}
}

/// An in-memory [`ListStore`].
#[derive(Debug, Default)]
pub struct MemoryListStore {
	lists: RefCell<HashMap<String, Vec<String>>>,
}

impl ListStore for MemoryListStore {
	fn read_list(&self, key: &str) -> Vec<String> {
		self.lists.borrow().get(key).cloned().unwrap_or_default()
	}

	fn write_list(&self, key: &str, values: &[String]) {
		self.lists
			.borrow_mut()
			.insert(key.to_string(), values.to_vec());
	}
}

struct PendingTimer {
	id: TimerId,
	deadline: u64,
	callback: Box<dyn FnOnce()>,
}

/// A [`Scheduler`] driven by an explicit virtual clock.
///
/// Timers fire from [`advance`](Self::advance), in deadline order
/// (insertion order on ties), on the caller's stack.
#[derive(Default)]
pub struct ManualScheduler {
	timers: RefCell<Vec<PendingTimer>>,
	now: Cell<u64>,
	next_id: Cell<u64>,
}

impl ManualScheduler {
	/// Creates a scheduler at virtual time zero.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the number of pending timers.
	pub fn pending(&self) -> usize {
		self.timers.borrow().len()
	}

	/// Returns the current virtual time in milliseconds.
	pub fn now(&self) -> u64 {
		self.now.get()
	}

	/// Advances the virtual clock, firing every timer whose deadline is
	/// reached. Callbacks may schedule or cancel further timers.
	pub fn advance(&self, delta_ms: u64) {
		let target = self.now.get() + delta_ms;

		loop {
			let next = {
				let mut timers = self.timers.borrow_mut();
				let due = timers
					.iter()
					.enumerate()
					.filter(|(_, timer)| timer.deadline <= target)
					.min_by_key(|(index, timer)| (timer.deadline, *index))
					.map(|(index, _)| index);
				due.map(|index| timers.remove(index))
			};

			match next {
				Some(timer) => {
					self.now.set(timer.deadline.max(self.now.get()));
					(timer.callback)();
				}
				None => break,
			}
		}

		self.now.set(target);
	}
}

impl Scheduler for ManualScheduler {
	fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId {
		let id = TimerId(self.next_id.get());
		self.next_id.set(id.0 + 1);
		self.timers.borrow_mut().push(PendingTimer {
			id,
			deadline: self.now.get() + delay_ms,
			callback,
		});
		id
	}

	fn cancel(&self, timer: TimerId) {
		self.timers.borrow_mut().retain(|pending| pending.id != timer);
	}
}

/// One recorded programmatic playback.
struct PlaybackState {
	finish: Option<Box<dyn FnOnce()>>,
	cancelled: bool,
	finished: bool,
}

/// A playback handed out by [`RecordingHandle`].
pub struct RecordingPlayback {
	state: Rc<RefCell<PlaybackState>>,
}

impl EffectPlayback for RecordingPlayback {
	fn on_finish(&mut self, callback: Box<dyn FnOnce()>) {
		self.state.borrow_mut().finish = Some(callback);
	}

	fn cancel(&mut self) {
		let mut state = self.state.borrow_mut();
		state.cancelled = true;
		state.finish = None;
	}
}

/// A [`VisualHandle`] that records everything played against it and
/// lets tests fire finish events manually.
#[derive(Default)]
pub struct RecordingHandle {
	played: RefCell<Vec<(Vec<Keyframe>, EffectOptions)>>,
	playbacks: RefCell<Vec<Rc<RefCell<PlaybackState>>>>,
	markers: RefCell<Vec<String>>,
	cleared: RefCell<Vec<String>>,
}

impl RecordingHandle {
	/// Creates an empty handle.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the keyframe effects played so far.
	pub fn played(&self) -> Vec<(Vec<Keyframe>, EffectOptions)> {
		self.played.borrow().clone()
	}

	/// Returns the markers applied so far.
	pub fn markers(&self) -> Vec<String> {
		self.markers.borrow().clone()
	}

	/// Returns the markers cleared so far.
	pub fn cleared_markers(&self) -> Vec<String> {
		self.cleared.borrow().clone()
	}

	/// Fires the finish callback of every live playback. Cancelled or
	/// already-finished playbacks are skipped.
	pub fn finish_all(&self) {
		let playbacks: Vec<_> = self.playbacks.borrow().clone();
		for playback in playbacks {
			let callback = {
				let mut state = playback.borrow_mut();
				if state.cancelled || state.finished {
					continue;
				}
				state.finished = true;
				state.finish.take()
			};
			if let Some(callback) = callback {
				callback();
			}
		}
	}

	/// Returns how many playbacks have been cancelled.
	pub fn cancelled_count(&self) -> usize {
		self.playbacks
			.borrow()
			.iter()
			.filter(|playback| playback.borrow().cancelled)
			.count()
	}

	/// Returns whether every playback has been cancelled.
	pub fn all_cancelled(&self) -> bool {
		self.playbacks
			.borrow()
			.iter()
			.all(|playback| playback.borrow().cancelled)
	}
}

impl VisualHandle for RecordingHandle {
	fn play(&self, keyframes: &[Keyframe], options: &EffectOptions) -> Box<dyn EffectPlayback> {
		self.played.borrow_mut().push((keyframes.to_vec(), *options));

		let state = Rc::new(RefCell::new(PlaybackState {
			finish: None,
			cancelled: false,
			finished: false,
		}));
		self.playbacks.borrow_mut().push(Rc::clone(&state));
		Box::new(RecordingPlayback { state })
	}

	fn apply_marker(&self, class: &str) {
		self.markers.borrow_mut().push(class.to_string());
	}

	fn clear_marker(&self, class: &str) {
		self.cleared.borrow_mut().push(class.to_string());
	}
}
