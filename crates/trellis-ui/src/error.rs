use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkelError>;

/// The lifecycle step a cell was in when it failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Initializing,
    Configuring,
    Gridding,
    Destroying,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Initializing => "initializing",
            Phase::Configuring => "configuring",
            Phase::Gridding => "gridding",
            Phase::Destroying => "destroying",
        })
    }
}

/// Errors raised by skeleton construction, realization and row mutation.
#[derive(Debug, Error)]
pub enum SkelError {
    #[error("skeleton requires a toolkit adapter")]
    MissingToolkit,

    #[error("skeleton requires a template")]
    MissingTemplate,

    #[error("Error {phase} widget at row {row}, column {column}: {source}")]
    Cell {
        row: usize,
        column: usize,
        phase: Phase,
        #[source]
        source: anyhow::Error,
    },

    #[error("'{0}' not found")]
    UnknownLabel(String),

    #[error("'{name}' not found in {class}")]
    UnknownVariable { class: &'static str, name: String },

    #[error("the view is no longer available")]
    ViewUnavailable,

    #[error("controller is busy and cannot receive its view")]
    ControllerBusy,

    #[error("skeleton has been destroyed")]
    Destroyed,

    #[error("no event assigned under id '{0}'")]
    UnknownEvent(String),

    #[error("row {index} is out of range for a grid of {rows} rows")]
    RowOutOfRange { index: usize, rows: usize },

    #[error("grid rows are not contiguous: row {0} has no cells")]
    NonContiguous(usize),

    #[error(transparent)]
    Toolkit(#[from] anyhow::Error),
}

impl SkelError {
    pub(crate) fn cell(row: usize, column: usize, phase: Phase, source: anyhow::Error) -> Self {
        Self::Cell { row, column, phase, source }
    }

    /// `(row, column, phase)` for per-cell failures.
    pub fn cell_location(&self) -> Option<(usize, usize, Phase)> {
        match self {
            Self::Cell { row, column, phase, .. } => Some((*row, *column, *phase)),
            _ => None,
        }
    }
}
