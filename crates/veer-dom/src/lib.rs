//! Browser bindings for the [`veer`] navigation engine.
//!
//! The core crate is target-independent: it talks to the outside world
//! through the [`veer::HistorySync`], [`veer::ListStore`],
//! [`veer::Scheduler`], and [`veer::VisualHandle`] capabilities. This
//! crate provides the browser implementations of those capabilities on
//! top of the History API, `localStorage`, `setTimeout`, and the Web
//! Animations API, plus the window listeners that feed back/forward and
//! hash events into the controller.
//!
//! Everything here is compiled only for `wasm32-unknown-unknown`; on
//! other targets the crate is empty.
//!
//! # Example
//!
//! ```ignore
//! use veer::{NavigateOptions, RouterConfig};
//! use veer_dom::{attach_window_listeners, browser_controller};
//!
//! let controller = browser_controller(RouterConfig::default());
//! // register groups, bind views...
//! attach_window_listeners(&controller, "")?;
//! controller.bootstrap();
//! ```

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod effects;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod history;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod listeners;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod scheduler;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod storage;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use effects::DomHandle;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use history::BrowserHistory;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use listeners::attach_window_listeners;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use scheduler::BrowserScheduler;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use storage::LocalStorageStore;

/// Creates a controller wired to the browser collaborators.
///
/// Route groups still need to be registered and views bound before
/// calling [`veer::NavigationController::bootstrap`].
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub fn browser_controller(config: veer::RouterConfig) -> veer::NavigationController {
	use std::rc::Rc;

	veer::NavigationController::new(
		Rc::new(BrowserHistory),
		Rc::new(LocalStorageStore),
		Rc::new(BrowserScheduler::new()),
		config,
	)
}
