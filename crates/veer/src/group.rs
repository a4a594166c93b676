//! Route groups: per-group transition configuration and visual handles.
//!
//! A route group is an independently mounted set of routes sharing one
//! animation configuration and one pair of visual handles. Its binding
//! is ephemeral: created when the group mounts, destroyed when it
//! unmounts.

use crate::effect::{Effect, VisualHandle};
use std::rc::Rc;

/// Identifier generated once per mounted route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) u64);

impl std::fmt::Display for GroupId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A group's forward and reverse effect configuration.
///
/// When a back-navigation plays and a reverse effect is not configured,
/// the forward effect is used in its place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionSpec {
	/// Effect played on the incoming view.
	pub animation_in: Option<Effect>,
	/// Effect played on the outgoing view.
	pub animation_out: Option<Effect>,
	/// Incoming effect for back navigation.
	pub reverse_animation_in: Option<Effect>,
	/// Outgoing effect for back navigation.
	pub reverse_animation_out: Option<Effect>,
}

impl TransitionSpec {
	/// Selects the (incoming, outgoing) effect pair for a navigation
	/// direction, falling back to the forward pair when a reverse
	/// effect is absent.
	pub fn effects_for(&self, is_back: bool) -> (Option<&Effect>, Option<&Effect>) {
		if is_back {
			(
				self.reverse_animation_in
					.as_ref()
					.or(self.animation_in.as_ref()),
				self.reverse_animation_out
					.as_ref()
					.or(self.animation_out.as_ref()),
			)
		} else {
			(self.animation_in.as_ref(), self.animation_out.as_ref())
		}
	}
}

/// The ephemeral per-group binding: transition configuration plus the
/// current outgoing/incoming visual handles.
///
/// Handles are re-bound by the host whenever its view tree changes and
/// are read just-in-time when a transition begins.
pub struct RouteGroupBinding {
	transition: TransitionSpec,
	outgoing: Option<Rc<dyn VisualHandle>>,
	incoming: Option<Rc<dyn VisualHandle>>,
}

impl std::fmt::Debug for RouteGroupBinding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteGroupBinding")
			.field("transition", &self.transition)
			.field("has_outgoing", &self.outgoing.is_some())
			.field("has_incoming", &self.incoming.is_some())
			.finish()
	}
}

impl RouteGroupBinding {
	/// Creates a binding with no handles bound yet.
	pub(crate) fn new(transition: TransitionSpec) -> Self {
		Self {
			transition,
			outgoing: None,
			incoming: None,
		}
	}

	/// Rebinds the outgoing/incoming visual handles.
	pub(crate) fn bind_handles(
		&mut self,
		outgoing: Option<Rc<dyn VisualHandle>>,
		incoming: Option<Rc<dyn VisualHandle>>,
	) {
		self.outgoing = outgoing;
		self.incoming = incoming;
	}

	/// Returns the transition configuration.
	pub(crate) fn transition(&self) -> &TransitionSpec {
		&self.transition
	}

	/// Returns the outgoing handle, if bound.
	pub(crate) fn outgoing(&self) -> Option<&Rc<dyn VisualHandle>> {
		self.outgoing.as_ref()
	}

	/// Returns the incoming handle, if bound.
	pub(crate) fn incoming(&self) -> Option<&Rc<dyn VisualHandle>> {
		self.incoming.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec() -> TransitionSpec {
		TransitionSpec {
			animation_in: Some(Effect::class("in", 100)),
			animation_out: Some(Effect::class("out", 100)),
			reverse_animation_in: Some(Effect::class("rev-in", 100)),
			reverse_animation_out: None,
		}
	}

	#[test]
	fn test_forward_effects() {
		let spec = spec();
		let (inward, outward) = spec.effects_for(false);
		assert_eq!(inward, Some(&Effect::class("in", 100)));
		assert_eq!(outward, Some(&Effect::class("out", 100)));
	}

	#[test]
	fn test_reverse_effects_with_forward_fallback() {
		let spec = spec();
		let (inward, outward) = spec.effects_for(true);
		assert_eq!(inward, Some(&Effect::class("rev-in", 100)));
		// No reverse-out configured, so the forward-out plays
		assert_eq!(outward, Some(&Effect::class("out", 100)));
	}

	#[test]
	fn test_empty_spec_has_no_effects() {
		let spec = TransitionSpec::default();
		assert_eq!(spec.effects_for(false), (None, None));
		assert_eq!(spec.effects_for(true), (None, None));
	}
}
