#![forbid(unsafe_code)]

//! Runtime for wai widget trees.
//!
//! - [`element`]: declarative trees of host elements and widget roles.
//! - [`mount`]: projects a tree into a [`Document`](wai_core::Document),
//!   checking every descendant role against its enclosing root.
//! - [`program`]: the single-threaded event loop that routes input to
//!   mounted widgets through the focus-scope stack.

pub mod element;
pub mod mount;
pub mod program;

pub use element::{DialogSpec, Element, Kind};
pub use mount::{AccordionMount, CalendarMount, DialogMount, Mounted, mount};
pub use program::Program;
