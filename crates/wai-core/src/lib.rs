#![forbid(unsafe_code)]

//! Core primitives for wai: input events, the element tree focus host,
//! focus-scope routing, and the context error shared by every widget.

pub mod context;
pub mod dom;
pub mod event;
pub mod scope;

pub use context::{Ancestor, ContextMissingError, Role, require};
pub use dom::{Document, NodeId};
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use scope::{FocusScopes, Reach, ScopeGuard, ScopeId};
