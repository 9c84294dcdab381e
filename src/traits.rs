//! The capability trait that decouples the scratchpad from any specific
//! window-manager transport.
//!
//! Every backend (the AeroSpace socket client, the dry-run wrapper, a test
//! recorder, …) implements [`WindowManager`].  The querier, mover, hook and
//! tracker only depend on this abstraction.

use crate::geometry::Geometry;
use crate::window::{Layout, Window, WindowId, Workspace};
use std::path::PathBuf;

/// Result of asking the window manager to move a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The window was moved.
    Moved,
    /// The window already belonged to the target workspace; nothing changed.
    AlreadyThere,
}

/// Raw response to a command sent over the window-manager connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResponse {
    pub server_version: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResponse {
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Abstraction over a window manager that can enumerate, move, lay out and
/// focus windows.
///
/// All calls are synchronous and blocking.  Methods are grouped by concern:
/// windows, workspaces, layout, focus, and the connection itself.
///
/// Methods that mutate window-manager state are listed in
/// [`DryRunWm`](crate::dry_run::DryRunWm); any new mutating method must be
/// intercepted there as well.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + Sync + 'static;

    //  Windows

    /// Every window the window manager knows about, in its own order.
    fn all_windows(&self) -> Result<Vec<Window>, Self::Error>;

    /// Windows currently in `workspace`.
    fn windows_in_workspace(&self, workspace: &str) -> Result<Vec<Window>, Self::Error>;

    /// The focused window, or `None` if nothing is focused.
    fn focused_window(&self) -> Result<Option<Window>, Self::Error>;

    //  Workspaces

    /// The workspace that currently has focus.
    fn focused_workspace(&self) -> Result<Workspace, Self::Error>;

    /// Move `window_id` to `workspace`.
    ///
    /// With `focus_follows` the focus moves along with the window, which
    /// also switches the visible workspace.
    fn move_window_to_workspace(
        &self,
        window_id: WindowId,
        workspace: &str,
        focus_follows: bool,
    ) -> Result<Placement, Self::Error>;

    //  Layout

    fn set_layout(&self, window_id: WindowId, layout: Layout) -> Result<(), Self::Error>;

    /// Resize `window_id` to a share of the screen.
    fn resize_window(&self, window_id: WindowId, geometry: Geometry) -> Result<(), Self::Error>;

    //  Focus

    fn set_focus(&self, window_id: WindowId) -> Result<(), Self::Error>;

    /// Move focus depth-first to the next tiled window, ignoring floating
    /// windows.
    fn focus_next_tiling_window(&self) -> Result<(), Self::Error>;

    //  Connection

    fn socket_path(&self) -> Result<PathBuf, Self::Error>;

    fn server_version(&self) -> Result<String, Self::Error>;

    /// Send a raw command.  Used for read-only diagnostics.
    fn send_command(&self, command: &str, args: &[String]) -> Result<CommandResponse, Self::Error>;

    fn close(&self) -> Result<(), Self::Error>;
}

impl<T: WindowManager + ?Sized> WindowManager for &T {
    type Error = T::Error;

    fn all_windows(&self) -> Result<Vec<Window>, Self::Error> {
        (**self).all_windows()
    }

    fn windows_in_workspace(&self, workspace: &str) -> Result<Vec<Window>, Self::Error> {
        (**self).windows_in_workspace(workspace)
    }

    fn focused_window(&self) -> Result<Option<Window>, Self::Error> {
        (**self).focused_window()
    }

    fn focused_workspace(&self) -> Result<Workspace, Self::Error> {
        (**self).focused_workspace()
    }

    fn move_window_to_workspace(
        &self,
        window_id: WindowId,
        workspace: &str,
        focus_follows: bool,
    ) -> Result<Placement, Self::Error> {
        (**self).move_window_to_workspace(window_id, workspace, focus_follows)
    }

    fn set_layout(&self, window_id: WindowId, layout: Layout) -> Result<(), Self::Error> {
        (**self).set_layout(window_id, layout)
    }

    fn resize_window(&self, window_id: WindowId, geometry: Geometry) -> Result<(), Self::Error> {
        (**self).resize_window(window_id, geometry)
    }

    fn set_focus(&self, window_id: WindowId) -> Result<(), Self::Error> {
        (**self).set_focus(window_id)
    }

    fn focus_next_tiling_window(&self) -> Result<(), Self::Error> {
        (**self).focus_next_tiling_window()
    }

    fn socket_path(&self) -> Result<PathBuf, Self::Error> {
        (**self).socket_path()
    }

    fn server_version(&self) -> Result<String, Self::Error> {
        (**self).server_version()
    }

    fn send_command(&self, command: &str, args: &[String]) -> Result<CommandResponse, Self::Error> {
        (**self).send_command(command, args)
    }

    fn close(&self) -> Result<(), Self::Error> {
        (**self).close()
    }
}
