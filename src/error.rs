//! Errors reported by the scratchpad engine.

use crate::filter::FILTER_PROPERTIES;
use crate::window::WindowId;

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can make a scratchpad operation fail.
#[derive(Debug, thiserror::Error)]
pub enum ScratchpadError {
    /// A window or filter pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("<pattern> cannot be empty")]
    EmptyPattern,

    #[error("invalid filter format: {0}. Expected format: property=regex")]
    MalformedFilter(String),

    #[error("unknown filter property: {0} (expected one of: {expected})", expected = FILTER_PROPERTIES.join(", "))]
    UnknownFilterProperty(String),

    #[error("no focused window")]
    NoFocusedWindow,

    #[error("no scratchpad windows found")]
    NoScratchpadWindows,

    #[error("no windows matched the pattern '{pattern}'{}", if *.with_filters { " with the given filters" } else { "" })]
    NoMatchingWindows { pattern: String, with_filters: bool },

    /// The window already sits in the workspace it was asked to move to.
    #[error("window {window_id} already belongs to workspace '{workspace}'")]
    AlreadyInWorkspace { window_id: WindowId, workspace: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A window-manager call failed.
    #[error("unable to {op} {target}: {source}")]
    Adapter {
        op: &'static str,
        target: String,
        #[source]
        source: BoxedError,
    },

    /// Some windows of a batch could not be handled.
    #[error("{failed} of {total} window(s) failed")]
    PartialFailure { failed: usize, total: usize },

    #[error("marker file {path}: {source}")]
    Marker {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScratchpadError {
    /// Wrap a window-manager error together with the operation and target.
    pub fn adapter<E>(op: &'static str, target: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ScratchpadError::Adapter {
            op,
            target: target.into(),
            source: Box::new(source),
        }
    }

    /// `true` for the benign "already in the target workspace" condition.
    pub fn is_already_in_workspace(&self) -> bool {
        matches!(self, ScratchpadError::AlreadyInWorkspace { .. })
    }
}
