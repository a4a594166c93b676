//! `setTimeout` scheduling via gloo.

use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use veer::{Scheduler, TimerId};

/// [`Scheduler`] backed by `setTimeout`.
///
/// Dropping a gloo [`Timeout`] clears the underlying browser timer, so
/// pending timeouts are kept in a map until they fire or are
/// cancelled.
pub struct BrowserScheduler {
	timers: Rc<RefCell<HashMap<u64, Timeout>>>,
	next_id: Cell<u64>,
}

impl BrowserScheduler {
	pub fn new() -> Self {
		Self {
			timers: Rc::new(RefCell::new(HashMap::new())),
			next_id: Cell::new(0),
		}
	}
}

impl Default for BrowserScheduler {
	fn default() -> Self {
		Self::new()
	}
}

impl Scheduler for BrowserScheduler {
	fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId {
		let id = self.next_id.get();
		self.next_id.set(id + 1);

		let timers = Rc::clone(&self.timers);
		let timeout = Timeout::new(delay_ms.min(u32::MAX as u64) as u32, move || {
			// Drop the map entry before running the callback so the
			// callback can schedule and cancel freely.
			timers.borrow_mut().remove(&id);
			callback();
		});
		self.timers.borrow_mut().insert(id, timeout);
		TimerId(id)
	}

	fn cancel(&self, timer: TimerId) {
		self.timers.borrow_mut().remove(&timer.0);
	}
}
