//! The scratchpad commands and their arguments.
//!
//! [`Command`] is what the orchestrator in [`scratchpad`](crate::scratchpad)
//! consumes.  The CLI builds one per invocation; library users can build
//! them directly.

use crate::geometry::Geometry;
use std::fmt;

/// A scratchpad operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Hide windows in the scratchpad workspace.
    ///
    /// Without a pattern the focused window's application is used, and only
    /// the focused window itself is hidden unless `all` is set.  With
    /// `all_floating` the pattern is ignored and every floating window
    /// outside the scratchpad is hidden.
    Move {
        pattern: Option<String>,
        all: bool,
        all_floating: bool,
        filters: Vec<String>,
    },

    /// Toggle matching windows: bring them into the focused workspace, or
    /// hide them again if they are already here and one has focus.
    Show {
        pattern: Option<String>,
        filters: Vec<String>,
    },

    /// Pull every matching window into the focused workspace, focus it and
    /// optionally resize it.
    Summon {
        pattern: String,
        filters: Vec<String>,
        geometry: Option<Geometry>,
    },

    /// Bring back the first window parked in the scratchpad.
    Next,

    /// Report scratchpad windows without touching them.
    List { filters: Vec<String> },
}

impl Command {
    /// Name used in the `command` column of the output.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Move { .. } => "move",
            Command::Show { .. } => "show",
            Command::Summon { .. } => "summon",
            Command::Next => "next",
            Command::List { .. } => "list",
        }
    }

    /// `true` for commands that never change window-manager state.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Command::List { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move {
                pattern,
                all,
                all_floating,
                ..
            } => {
                write!(f, "move")?;
                if let Some(p) = pattern {
                    write!(f, " {:?}", p)?;
                }
                if *all {
                    write!(f, " --all")?;
                }
                if *all_floating {
                    write!(f, " --all-floating")?;
                }
                Ok(())
            }
            Command::Show { pattern, .. } => match pattern {
                Some(p) => write!(f, "show {:?}", p),
                None => write!(f, "show"),
            },
            Command::Summon {
                pattern, geometry, ..
            } => {
                write!(f, "summon {:?}", pattern)?;
                if let Some(g) = geometry {
                    write!(f, " --geometry {}", g)?;
                }
                Ok(())
            }
            Command::Next => write!(f, "next"),
            Command::List { .. } => write!(f, "list"),
        }
    }
}
