#![forbid(unsafe_code)]

//! Descendant roles and the error raised when one is built without its root.
//!
//! Root widgets (accordion, calendar, grid, dialog) own their state and hand
//! it to descendant roles explicitly. A role whose required ancestor handle
//! is absent fails at construction with [`ContextMissingError`]; nothing is
//! retried or recovered inside wai.

use core::fmt;

/// Widgets that publish state to descendant roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ancestor {
    Accordion,
    AccordionItem,
    Calendar,
    Grid,
    Dialog,
}

impl Ancestor {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accordion => "accordion",
            Self::AccordionItem => "accordion item",
            Self::Calendar => "calendar",
            Self::Grid => "month grid",
            Self::Dialog => "dialog",
        }
    }
}

impl fmt::Display for Ancestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descendant roles that require an enclosing root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    AccordionItem,
    AccordionHeader,
    AccordionPanel,
    CalendarHeader,
    CalendarButton,
    CalendarTitle,
    ColumnHeader,
    GridCell,
    DialogTitle,
    DialogDescription,
    DialogBackdrop,
}

impl Role {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AccordionItem => "accordion item",
            Self::AccordionHeader => "accordion header",
            Self::AccordionPanel => "accordion panel",
            Self::CalendarHeader => "calendar header",
            Self::CalendarButton => "calendar button",
            Self::CalendarTitle => "calendar title",
            Self::ColumnHeader => "column header",
            Self::GridCell => "grid cell",
            Self::DialogTitle => "dialog title",
            Self::DialogDescription => "dialog description",
            Self::DialogBackdrop => "dialog backdrop",
        }
    }

    /// The root whose state this role reads.
    #[must_use]
    pub const fn ancestor(self) -> Ancestor {
        match self {
            Self::AccordionItem => Ancestor::Accordion,
            Self::AccordionHeader | Self::AccordionPanel => Ancestor::AccordionItem,
            Self::CalendarHeader | Self::CalendarButton | Self::CalendarTitle => {
                Ancestor::Calendar
            }
            Self::ColumnHeader | Self::GridCell => Ancestor::Grid,
            Self::DialogTitle | Self::DialogDescription | Self::DialogBackdrop => {
                Ancestor::Dialog
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A descendant role was constructed without its required ancestor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("`{role}` cannot be constructed outside `{ancestor}`")]
pub struct ContextMissingError {
    pub role: Role,
    pub ancestor: Ancestor,
}

impl ContextMissingError {
    /// Error for `role`, naming the ancestor it requires.
    #[must_use]
    pub const fn new(role: Role) -> Self {
        Self {
            role,
            ancestor: role.ancestor(),
        }
    }
}

/// Resolve a required ancestor handle for `role`.
pub fn require<T>(handle: Option<T>, role: Role) -> Result<T, ContextMissingError> {
    #[cfg(feature = "tracing")]
    if handle.is_none() {
        tracing::debug!(role = role.name(), "descendant role built outside its root");
    }
    handle.ok_or(ContextMissingError::new(role))
}
