//! Opt-in persistence of user-facing widget state.
//!
//! Widgets that implement [`Stateful`] can hand their state to the host for
//! storage (session restore, navigation back/forward) and take it back later.
//! Only user-visible state is persisted: which accordion item is open, which
//! date a calendar shows. Derived data (grids, tabbable sequences) is always
//! rebuilt.
//!
//! # Invariants
//!
//! 1. `restore_state(save_state())` yields the same observable state.
//! 2. `restore_state` validates its input against the live widget: unknown
//!    ids are ignored and widget invariants (e.g. a non-collapsible
//!    accordion is never fully closed) are never broken by stored data.
//! 3. `save_state` is a pure read.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Version mismatch | widget upgraded | `State::default()` |
//! | Stale data | item removed since save | stored value ignored |
//!
//! With the `state-persistence` feature, [`VersionedState`] and the widget
//! state types derive serde traits.

use core::fmt;

/// Identifies one widget instance's persisted state.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StateKey {
    /// Widget type name, e.g. `"Accordion"`.
    pub widget_type: &'static str,
    /// Instance-unique id.
    pub instance_id: String,
}

impl StateKey {
    #[must_use]
    pub fn new(widget_type: &'static str, id: impl Into<String>) -> Self {
        Self {
            widget_type,
            instance_id: id.into(),
        }
    }

    /// Canonical `"widget_type::instance_id"` form.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.widget_type, self.instance_id)
    }
}

/// Widgets whose user-facing state can be saved and restored.
pub trait Stateful: Sized {
    /// Persisted state. `Default` is the fallback for missing/stale data.
    type State: Default;

    /// Unique key for this instance.
    fn state_key(&self) -> StateKey;

    /// Snapshot the current state.
    fn save_state(&self) -> Self::State;

    /// Restore a snapshot, clamping it to what the widget can represent.
    fn restore_state(&mut self, state: Self::State);

    /// Schema version; bump on incompatible `State` changes.
    fn state_version() -> u32 {
        1
    }
}

/// Version-tagged envelope around a state snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct VersionedState<S> {
    pub version: u32,
    pub data: S,
}

impl<S> VersionedState<S> {
    /// Snapshot `widget` with its current schema version.
    pub fn pack<W: Stateful<State = S>>(widget: &W) -> Self {
        Self {
            version: W::state_version(),
            data: widget.save_state(),
        }
    }

    /// The payload if its version matches `W`, otherwise `None`.
    pub fn unpack<W: Stateful<State = S>>(self) -> Option<S> {
        (self.version == W::state_version()).then_some(self.data)
    }

    /// The payload if its version matches `W`, otherwise `S::default()`.
    pub fn unpack_or_default<W: Stateful<State = S>>(self) -> S
    where
        S: Default,
    {
        self.unpack::<W>().unwrap_or_default()
    }

    /// Restore `widget` from this envelope; mismatched versions are dropped.
    ///
    /// Returns whether the stored payload was applied.
    pub fn restore_into<W: Stateful<State = S>>(self, widget: &mut W) -> bool {
        match self.unpack::<W>() {
            Some(data) => {
                widget.restore_state(data);
                true
            }
            None => false,
        }
    }
}
