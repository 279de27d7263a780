//! Error types.

use std::fmt;

use crate::types::Indicator;

/// Why a layout string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutIssue {
    /// No characters left after normalization.
    Empty,
    /// Length is not a multiple of the row width.
    NotRowAligned,
    /// More rows than a menu can hold.
    TooManyRows,
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutIssue::Empty => f.write_str("layout is empty"),
            LayoutIssue::NotRowAligned => f.write_str("length is not a multiple of 9 (slots per row)"),
            LayoutIssue::TooManyRows => f.write_str("more than 6 rows"),
        }
    }
}

/// Errors raised by layout compilation, binding and menu construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("invalid layout of {len} slots: {issue}")]
    InvalidLayout { len: usize, issue: LayoutIssue },

    #[error("layout character {0:?} has neither an element nor an indicator binding")]
    UnboundCharacter(char),

    #[error("the {indicator} indicator is already bound to {existing:?}")]
    DuplicateIndicator { indicator: Indicator, existing: char },

    #[error("element is not bound to a menu")]
    NotBound,

    #[error("element is already bound to another menu")]
    AlreadyBound,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("scroll control bound to {0:?} needs a menu with a content region")]
    NoScrollWindow(char),

    #[error("menu builder has no {0}")]
    Incomplete(&'static str),

    #[error("invalid menu spec: {0}")]
    Spec(String),
}

impl From<serde_json::Error> for MenuError {
    fn from(err: serde_json::Error) -> Self {
        MenuError::Spec(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;
