//! The navigation state machine.
//!
//! [`NavigationController`] owns the authoritative location state. It
//! resolves incoming URLs against the route table, decides history
//! actions, and drives the transition lifecycle:
//!
//! - `SETTLED`: no pending URL; `current_url` is the settled location.
//! - `TRANSITIONING`: a pending URL is set and every mounted route
//!   group's orchestrator is playing its effects.
//!
//! A navigation that arrives while another is transitioning interrupts
//! it: the in-flight effects are cancelled, the interrupted destination
//! settles instantly (with its end notification), and the new
//! navigation starts fresh. Every accepted navigation therefore
//! produces exactly one start and one end notification, in order,
//! regardless of how quickly navigations stack up.
//!
//! All state transitions happen on a single logical thread, driven by
//! discrete external events: link activation, popstate, hashchange,
//! effect-finish callbacks, and timer fires.

use crate::config::RouterConfig;
use crate::effect::{Scheduler, TimerId, VisualHandle};
use crate::error::RouterError;
use crate::group::{GroupId, RouteGroupBinding, TransitionSpec};
use crate::history::{HistoryEntry, HistorySync, parse_current_url};
use crate::orchestrator::AnimationOrchestrator;
use crate::pattern::PathPattern;
use crate::routes::{Resolution, RouteSpec, RouteTable, strip_query_and_fragment};
use crate::visited::{ListStore, VisitedLog};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Context handed to the duration/veto collaborator before a
/// transition plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionContext {
	/// The settled URL being left.
	pub outgoing_url: String,
	/// The resolved destination URL.
	pub incoming_url: String,
	/// Pattern matching the outgoing URL, if any.
	pub outgoing_route: Option<String>,
	/// Pattern matching the incoming URL (the not-found pattern for
	/// unmatched destinations).
	pub incoming_route: String,
	/// Whether this is a backward navigation.
	pub is_back: bool,
}

/// Decides each transition's duration in milliseconds.
///
/// A non-positive return vetoes the animation: the navigation settles
/// immediately. The collaborator is invoked once per non-initial
/// navigation, before any visual effect plays.
pub type DurationFn = Rc<dyn Fn(&TransitionContext) -> i64>;

/// Payload of the transition-start notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionStart {
	/// Whether this is the very first resolution after construction.
	/// Initial loads replace history instead of pushing and play no
	/// animation; no end notification follows.
	pub initial_load: bool,
}

/// Options for a [`NavigationController::navigate`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
	/// Whether this navigation moves backward through history.
	pub is_back: bool,
	/// Whether this navigation comes from a user-activated link. Link
	/// navigations record the outgoing location in the visited log and
	/// push a history entry.
	pub is_user_link: bool,
}

impl NavigateOptions {
	/// Options for a user-activated link.
	pub fn user_link() -> Self {
		Self {
			is_user_link: true,
			..Self::default()
		}
	}
}

type StartObserver = Rc<dyn Fn(&TransitionStart)>;
type EndObserver = Rc<dyn Fn()>;

/// Mutable location state. Owned and mutated exclusively by the
/// controller.
#[derive(Debug)]
struct NavState {
	current_url: String,
	pending_url: Option<String>,
	navigation_seq: i64,
	back_navigation: bool,
	initial_load: bool,
}

struct GroupSlot {
	binding: RouteGroupBinding,
	orchestrator: AnimationOrchestrator,
}

struct ControllerInner {
	weak: Weak<ControllerInner>,
	config: RouterConfig,
	history: Rc<dyn HistorySync>,
	scheduler: Rc<dyn Scheduler>,
	routes: RefCell<RouteTable>,
	visited_urls: RefCell<VisitedLog>,
	visited_routes: RefCell<VisitedLog>,
	groups: RefCell<BTreeMap<GroupId, GroupSlot>>,
	state: RefCell<NavState>,
	duration_fn: RefCell<Option<DurationFn>>,
	on_start: RefCell<Option<StartObserver>>,
	on_end: RefCell<Option<EndObserver>>,
	next_group_id: Cell<u64>,
	/// Monotonic transition identity; guards stale completion signals.
	transition_id: Cell<u64>,
	/// Outstanding "done" signals for the active transition, plus a
	/// dispatch guard token held while groups are being notified.
	pending_signals: Cell<usize>,
	fallback_timer: Cell<Option<TimerId>>,
}

/// The navigation engine. Cheaply cloneable handle; all clones share
/// one state machine.
#[derive(Clone)]
pub struct NavigationController {
	inner: Rc<ControllerInner>,
}

impl std::fmt::Debug for NavigationController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.borrow();
		f.debug_struct("NavigationController")
			.field("current_url", &state.current_url)
			.field("pending_url", &state.pending_url)
			.field("navigation_seq", &state.navigation_seq)
			.finish()
	}
}

impl NavigationController {
	/// Creates a controller.
	///
	/// The starting location is read from `history` at construction
	/// time; call [`bootstrap`](Self::bootstrap) once route groups are
	/// registered to run the initial resolution.
	pub fn new(
		history: Rc<dyn HistorySync>,
		store: Rc<dyn ListStore>,
		scheduler: Rc<dyn Scheduler>,
		config: RouterConfig,
	) -> Self {
		let current_url = parse_current_url(&history.current_url(), &config.origin_path);
		let visited_urls = VisitedLog::load(
			Rc::clone(&store),
			config.visited_urls_key(),
			config.visited_cap,
		);
		let visited_routes =
			VisitedLog::load(store, config.visited_routes_key(), config.visited_cap);

		let inner = Rc::new_cyclic(|weak| ControllerInner {
			weak: weak.clone(),
			config,
			history,
			scheduler,
			routes: RefCell::new(RouteTable::new()),
			visited_urls: RefCell::new(visited_urls),
			visited_routes: RefCell::new(visited_routes),
			groups: RefCell::new(BTreeMap::new()),
			state: RefCell::new(NavState {
				current_url,
				pending_url: None,
				navigation_seq: 1,
				back_navigation: false,
				initial_load: true,
			}),
			duration_fn: RefCell::new(None),
			on_start: RefCell::new(None),
			on_end: RefCell::new(None),
			next_group_id: Cell::new(0),
			transition_id: Cell::new(0),
			pending_signals: Cell::new(0),
			fallback_timer: Cell::new(None),
		});

		Self { inner }
	}

	/// Registers a route group's routes and transition configuration,
	/// returning the group's identifier.
	///
	/// Misconfigured routes are reported and discarded (see
	/// [`RouteTable::register`]); the group itself always mounts.
	pub fn register_group(&self, routes: &[RouteSpec], transition: TransitionSpec) -> GroupId {
		self.inner.routes.borrow_mut().register(routes);

		let id = GroupId(self.inner.next_group_id.get());
		self.inner.next_group_id.set(id.0 + 1);
		self.inner.groups.borrow_mut().insert(
			id,
			GroupSlot {
				binding: RouteGroupBinding::new(transition),
				orchestrator: AnimationOrchestrator::new(Rc::clone(&self.inner.scheduler)),
			},
		);
		id
	}

	/// Unmounts a route group, cancelling any effects it is playing.
	/// Its routes stay registered; the table only accumulates.
	pub fn unregister_group(&self, id: GroupId) {
		let removed = {
			let mut groups = self.inner.groups.borrow_mut();
			groups.remove(&id)
		};
		let Some(mut slot) = removed else { return };

		let was_pending = slot.orchestrator.is_pending();
		slot.orchestrator.cancel();
		if was_pending {
			// The transition no longer waits on this group
			self.inner.group_done(self.inner.transition_id.get());
		}
	}

	/// Rebinds a group's outgoing/incoming visual handles. The
	/// orchestrator reads them just-in-time when a transition begins.
	pub fn bind_views(
		&self,
		id: GroupId,
		outgoing: Option<Rc<dyn VisualHandle>>,
		incoming: Option<Rc<dyn VisualHandle>>,
	) -> Result<(), RouterError> {
		let mut groups = self.inner.groups.borrow_mut();
		let slot = groups.get_mut(&id).ok_or(RouterError::UnknownGroup(id.0))?;
		slot.binding.bind_handles(outgoing, incoming);
		Ok(())
	}

	/// Sets the duration/veto collaborator.
	pub fn set_duration_fn<F>(&self, f: F)
	where
		F: Fn(&TransitionContext) -> i64 + 'static,
	{
		*self.inner.duration_fn.borrow_mut() = Some(Rc::new(f));
	}

	/// Sets the transition-start observer.
	pub fn on_transition_start<F>(&self, f: F)
	where
		F: Fn(&TransitionStart) + 'static,
	{
		*self.inner.on_start.borrow_mut() = Some(Rc::new(f));
	}

	/// Sets the transition-end observer.
	pub fn on_transition_end<F>(&self, f: F)
	where
		F: Fn() + 'static,
	{
		*self.inner.on_end.borrow_mut() = Some(Rc::new(f));
	}

	/// Runs the initial resolution for the location read at
	/// construction time. History is replaced rather than pushed, no
	/// animation plays, and only a start notification (tagged
	/// `initial_load`) fires.
	pub fn bootstrap(&self) {
		let url = self.inner.state.borrow().current_url.clone();
		self.inner.navigate(&url, NavigateOptions::default());
	}

	/// Navigates to a URL. Returns the resolved destination (the
	/// not-found path for unmatched input; navigation never fails).
	pub fn navigate(&self, url: &str, opts: NavigateOptions) -> String {
		self.inner.navigate(url, opts)
	}

	/// Entry point for external back/forward events. `stored_seq` is
	/// the sequence number carried by the history entry being restored;
	/// an entry older than the present position is a backward
	/// navigation.
	pub fn handle_pop_state(&self, url: &str, stored_seq: i64) {
		let is_back = stored_seq < self.inner.state.borrow().navigation_seq;
		self.inner.navigate(
			url,
			NavigateOptions {
				is_back,
				is_user_link: false,
			},
		);
	}

	/// Entry point for external hash-change events: the new URL is
	/// re-read from the location source and routed as a plain forward
	/// navigation.
	pub fn handle_hash_change(&self) {
		let url = parse_current_url(
			&self.inner.history.current_url(),
			&self.inner.config.origin_path,
		);
		self.inner.navigate(&url, NavigateOptions::default());
	}

	/// Resolves a URL without navigating, yielding the parameter bag
	/// for the view-rendering collaborator.
	pub fn resolve(&self, url: &str) -> Resolution {
		self.inner.routes.borrow().resolve(url)
	}

	/// Returns the settled location.
	pub fn current_url(&self) -> String {
		self.inner.state.borrow().current_url.clone()
	}

	/// Returns the in-flight destination while transitioning.
	pub fn pending_url(&self) -> Option<String> {
		self.inner.state.borrow().pending_url.clone()
	}

	/// Returns whether a transition is in flight.
	pub fn is_transitioning(&self) -> bool {
		self.inner.state.borrow().pending_url.is_some()
	}

	/// Returns whether the in-flight transition is a back navigation.
	/// Only meaningful while [`is_transitioning`](Self::is_transitioning).
	pub fn is_back_navigation(&self) -> bool {
		self.inner.state.borrow().back_navigation
	}

	/// Returns the navigation sequence counter.
	pub fn navigation_seq(&self) -> i64 {
		self.inner.state.borrow().navigation_seq
	}

	/// Generates a URL for a registered route pattern, for link hrefs.
	pub fn reverse_url(
		&self,
		pattern: &str,
		params: &std::collections::HashMap<String, String>,
	) -> Result<String, RouterError> {
		self.inner.routes.borrow().reverse(pattern, params)
	}

	/// Returns the designated not-found path.
	pub fn not_found_path(&self) -> String {
		self.inner.routes.borrow().not_found_path().to_string()
	}

	/// Returns whether `href` is the active location: the pending
	/// destination while transitioning, the settled one otherwise.
	pub fn is_current(&self, href: &str) -> bool {
		let state = self.inner.state.borrow();
		let active = state.pending_url.as_ref().unwrap_or(&state.current_url);
		*active == strip_query_and_fragment(href)
	}

	/// Returns whether `href` and the active location match the same
	/// registered route.
	pub fn is_current_fuzzy(&self, href: &str) -> bool {
		let active = {
			let state = self.inner.state.borrow();
			state
				.pending_url
				.clone()
				.unwrap_or_else(|| state.current_url.clone())
		};
		self.inner
			.routes
			.borrow()
			.matches_same_route(&active, &strip_query_and_fragment(href))
	}

	/// Returns whether `href` has been visited exactly.
	pub fn is_visited(&self, href: &str) -> bool {
		self.inner.visited_urls.borrow().contains(href)
	}

	/// Returns whether some visited route pattern matches `href`.
	pub fn is_visited_fuzzy(&self, href: &str) -> bool {
		self.inner
			.visited_routes
			.borrow()
			.snapshot()
			.iter()
			.any(|pattern| {
				PathPattern::new(pattern)
					.map(|p| p.is_match(href))
					.unwrap_or(false)
			})
	}
}

impl ControllerInner {
	fn navigate(&self, url: &str, opts: NavigateOptions) -> String {
		// Interruption: the in-flight destination settles instantly
		// (with its end notification) before the new navigation starts.
		if self.state.borrow().pending_url.is_some() {
			self.interrupt();
		}

		let clean = strip_query_and_fragment(url);

		let (resolution, outgoing_route, current_clean) = {
			let routes = self.routes.borrow();
			let resolution = routes.resolve(&clean);
			let current_clean =
				strip_query_and_fragment(&self.state.borrow().current_url);
			let outgoing_route = routes
				.matching_pattern(&current_clean)
				.map(str::to_string)
				.or_else(|| {
					(current_clean == routes.not_found_path())
						.then(|| routes.not_found_path().to_string())
				});
			(resolution, outgoing_route, current_clean)
		};

		let (seq, initial_load) = {
			let state = self.state.borrow();
			(state.navigation_seq, state.initial_load)
		};

		// User links record the location being left and push an entry
		// for the destination before anything else happens.
		if opts.is_user_link {
			self.record_visit(&current_clean, outgoing_route.as_deref());
			let entry_seq = if opts.is_back { seq - 1 } else { seq + 1 };
			self.history.push(&self.entry(&resolution.final_url, entry_seq));
		}

		if initial_load {
			self.history.replace(&self.entry(&resolution.final_url, seq));
			{
				let mut state = self.state.borrow_mut();
				state.initial_load = false;
				state.current_url = resolution.final_url.clone();
			}
			debug!(url = %resolution.final_url, "initial load settled");
			self.notify_start(true);
			return resolution.final_url;
		}

		let context = TransitionContext {
			outgoing_url: current_clean,
			incoming_url: resolution.final_url.clone(),
			outgoing_route,
			incoming_route: resolution.matched_pattern.clone(),
			is_back: opts.is_back,
		};
		let duration = self
			.duration_fn
			.borrow()
			.clone()
			.map(|f| f(&context))
			.unwrap_or(0);

		if duration <= 0 {
			// Vetoed: settle without entering TRANSITIONING
			self.notify_start(false);
			self.state.borrow_mut().current_url = resolution.final_url.clone();
			debug!(url = %resolution.final_url, "navigation settled without animation");
			self.notify_end();
			return resolution.final_url;
		}

		self.start_transition(&resolution, opts.is_back, duration as u64);
		resolution.final_url
	}

	fn start_transition(&self, resolution: &Resolution, is_back: bool, duration_ms: u64) {
		let tid = self.transition_id.get() + 1;
		self.transition_id.set(tid);

		{
			let mut state = self.state.borrow_mut();
			state.pending_url = Some(resolution.final_url.clone());
			state.back_navigation = is_back;
			state.navigation_seq += if is_back { -1 } else { 1 };
		}
		debug!(
			url = %resolution.final_url,
			back = is_back,
			duration_ms,
			"transition started"
		);
		self.notify_start(false);

		// One signal per mounted group, plus a dispatch guard token so
		// a group that completes synchronously cannot settle the
		// transition while others are still being notified.
		let group_count = self.groups.borrow().len();
		self.pending_signals.set(group_count + 1);

		let weak = self.weak.clone();
		let timer = self.scheduler.schedule(
			duration_ms,
			Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.complete_transition(tid);
				}
			}),
		);
		self.fallback_timer.set(Some(timer));

		{
			let mut groups = self.groups.borrow_mut();
			for slot in groups.values_mut() {
				let weak = self.weak.clone();
				slot.orchestrator.begin_transition(
					&slot.binding,
					is_back,
					Box::new(move || {
						if let Some(inner) = weak.upgrade() {
							inner.group_done(tid);
						}
					}),
				);
			}
		}

		// Release the dispatch guard
		self.group_done(tid);
	}

	/// One mounted group finished (or stopped being waited on).
	fn group_done(&self, tid: u64) {
		if tid != self.transition_id.get() {
			return;
		}
		let left = self.pending_signals.get().saturating_sub(1);
		self.pending_signals.set(left);
		if left == 0 {
			self.complete_transition(tid);
		}
	}

	/// Natural completion: every group signalled, or the fallback timer
	/// fired first.
	fn complete_transition(&self, tid: u64) {
		if tid != self.transition_id.get() {
			return;
		}
		self.teardown_effects();

		let settled = {
			let mut state = self.state.borrow_mut();
			state.pending_url.take().map(|url| {
				state.current_url = url.clone();
				state.back_navigation = false;
				url
			})
		};
		if let Some(url) = settled {
			debug!(url = %url, "transition settled");
			self.notify_end();
		}
	}

	/// Aborts the in-flight transition: effects and timers are
	/// cancelled, the interrupted destination settles instantly, and
	/// its end notification fires.
	fn interrupt(&self) {
		// Invalidate any signal still in flight for the old transition
		self.transition_id.set(self.transition_id.get() + 1);
		self.teardown_effects();

		let settled = {
			let mut state = self.state.borrow_mut();
			state.pending_url.take().map(|url| {
				state.current_url = url.clone();
				state.back_navigation = false;
				url
			})
		};
		if let Some(url) = settled {
			debug!(url = %url, "transition interrupted; destination settled");
			self.notify_end();
		}
	}

	/// Cancels the fallback timer and every group's in-flight effects.
	fn teardown_effects(&self) {
		if let Some(timer) = self.fallback_timer.take() {
			self.scheduler.cancel(timer);
		}
		let mut groups = self.groups.borrow_mut();
		for slot in groups.values_mut() {
			slot.orchestrator.cancel();
		}
	}

	fn record_visit(&self, outgoing_url: &str, outgoing_route: Option<&str>) {
		self.visited_urls.borrow_mut().add(outgoing_url, false);
		if let Some(route) = outgoing_route {
			self.visited_routes.borrow_mut().add(route, false);
		}
	}

	fn entry(&self, url: &str, seq: i64) -> HistoryEntry {
		HistoryEntry {
			url: url.to_string(),
			display_url: format!("{}{}", self.config.origin_path, url),
			seq,
		}
	}

	fn notify_start(&self, initial_load: bool) {
		let observer = self.on_start.borrow().clone();
		if let Some(observer) = observer {
			observer(&TransitionStart { initial_load });
		}
	}

	fn notify_end(&self) {
		let observer = self.on_end.borrow().clone();
		if let Some(observer) = observer {
			observer();
		}
	}
}
