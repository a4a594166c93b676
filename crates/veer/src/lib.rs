//! Animated client-side navigation engine.
//!
//! `veer` reconciles a logical current location against a declarative
//! table of route patterns, drives an animated transition between the
//! outgoing and incoming views, and keeps browser history and a bounded
//! visited-location log consistent with that transition, including
//! when navigations arrive before a previous transition has finished.
//!
//! The engine is deliberately abstract over its environment. View
//! rendering, the animation primitive, the History API, and persistent
//! storage are all collaborator traits:
//!
//! - [`HistorySync`]: reads the external location, pushes/replaces entries.
//! - [`ListStore`]: persisted lists backing the visited log.
//! - [`VisualHandle`] / [`EffectPlayback`]: surfaces effects play on.
//! - [`Scheduler`]: one-shot timers bounding declarative effects.
//!
//! Browser-backed implementations live in the `veer-dom` crate;
//! in-memory doubles live in [`testing`].
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use veer::testing::{ManualScheduler, MemoryHistory, MemoryListStore};
//! use veer::{
//!     Effect, NavigateOptions, NavigationController, RouteSpec, RouterConfig, TransitionSpec,
//! };
//!
//! let scheduler = Rc::new(ManualScheduler::new());
//! let controller = NavigationController::new(
//!     Rc::new(MemoryHistory::at("/")),
//!     Rc::new(MemoryListStore::default()),
//!     Rc::clone(&scheduler) as Rc<dyn veer::Scheduler>,
//!     RouterConfig::default(),
//! );
//!
//! controller.register_group(
//!     &[
//!         RouteSpec::new("/"),
//!         RouteSpec::new("/users/{id}/"),
//!         RouteSpec::not_found("/notfound"),
//!     ],
//!     TransitionSpec {
//!         animation_in: Some(Effect::class("fade-in", 300)),
//!         animation_out: Some(Effect::class("fade-out", 300)),
//!         ..Default::default()
//!     },
//! );
//! controller.set_duration_fn(|_| 300);
//! controller.bootstrap();
//!
//! controller.navigate("/users/42/", NavigateOptions::user_link());
//! assert!(controller.is_transitioning());
//! scheduler.advance(300);
//! assert_eq!(controller.current_url(), "/users/42/");
//! ```

pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod group;
pub mod history;
pub mod link;
pub mod pattern;
pub mod routes;
pub mod testing;
pub mod visited;

mod orchestrator;

pub use config::RouterConfig;
pub use controller::{
	DurationFn, NavigateOptions, NavigationController, TransitionContext, TransitionStart,
};
pub use effect::{
	Effect, EffectOptions, EffectPlayback, Keyframe, Scheduler, TimerId, VisualHandle,
};
pub use error::{PatternError, RouterError};
pub use group::{GroupId, TransitionSpec};
pub use history::{HistoryEntry, HistorySync, parse_current_url};
pub use link::{Link, LinkState};
pub use pattern::PathPattern;
pub use routes::{Resolution, RouteSpec, RouteTable, RewriteFn, strip_query_and_fragment};
pub use visited::{ListStore, VisitedLog};
