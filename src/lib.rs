//! **aerospace-scratchpad**: an i3-style scratchpad for the AeroSpace
//! window manager.
//!
//! Windows are "hidden" by parking them in a dedicated `.scratchpad`
//! workspace and brought back on demand.  Selection is by application-name
//! regex, optionally narrowed with `property=regex` filters.
//!
//! # Architecture
//!
//! Everything is built around [`traits::WindowManager`], a capability trait
//! over the window-manager operations the scratchpad needs:
//!
//! * [`querier`] resolves which windows a command targets.
//! * [`mover`] wraps the move/float/focus primitives.
//! * [`scratchpad`] orchestrates the commands and reports
//!   [`output::OutputEvent`]s.
//! * [`hook`] pulls windows out of the scratchpad when the user switches to
//!   it directly.
//! * [`registry`] and [`tracker`] keep "sticky" windows on the focused
//!   workspace.
//!
//! The concrete implementation lives in [`aerospace`] (AeroSpace socket
//! IPC); [`dry_run::DryRunWm`] wraps any implementation and reports
//! mutations instead of performing them.

pub mod aerospace;
pub mod command;
pub mod config;
pub mod dry_run;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod hook;
pub mod mover;
pub mod output;
pub mod querier;
pub mod registry;
pub mod scratchpad;
pub mod tracker;
pub mod traits;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;
