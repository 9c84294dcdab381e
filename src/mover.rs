//! The two move primitives every command is built from, plus geometry.
//!
//! Moves go straight to the window manager.  Whether they actually change
//! anything depends on the [`WindowManager`] handed in; wrap it in
//! [`DryRunWm`](crate::dry_run::DryRunWm) to only report what would happen.

use crate::error::ScratchpadError;
use crate::geometry::Geometry;
use crate::traits::{Placement, WindowManager};
use crate::window::{Layout, Window, SCRATCHPAD_WORKSPACE};
use log::{debug, info, warn};

pub struct Mover<W: WindowManager> {
    wm: W,
}

impl<W: WindowManager> Mover<W> {
    pub fn new(wm: W) -> Self {
        Self { wm }
    }

    /// Park `window` in the scratchpad workspace and make it float.
    ///
    /// Failing to switch the layout is only a warning: the window is hidden
    /// either way.
    pub fn move_to_scratchpad(&self, window: &Window) -> Result<(), ScratchpadError> {
        let placement = self
            .wm
            .move_window_to_workspace(window.id, SCRATCHPAD_WORKSPACE, false)
            .map_err(|e| {
                ScratchpadError::adapter(
                    "move window",
                    format!("{} to scratchpad", window.id),
                    e,
                )
            })?;

        if placement == Placement::AlreadyThere {
            return Err(ScratchpadError::AlreadyInWorkspace {
                window_id: window.id,
                workspace: SCRATCHPAD_WORKSPACE.to_string(),
            });
        }
        info!("moved {} to scratchpad", window);

        if let Err(e) = self.wm.set_layout(window.id, Layout::Floating) {
            warn!("unable to set floating layout for {}: {}", window, e);
        }
        Ok(())
    }

    /// Bring `window` into `workspace`, optionally focusing it afterwards.
    pub fn move_to_workspace(
        &self,
        window: &Window,
        workspace: &str,
        set_focus: bool,
    ) -> Result<(), ScratchpadError> {
        if workspace.is_empty() {
            return Err(ScratchpadError::InvalidArgument(
                "workspace name cannot be empty".into(),
            ));
        }

        let placement = self
            .wm
            .move_window_to_workspace(window.id, workspace, false)
            .map_err(|e| {
                ScratchpadError::adapter(
                    "move window",
                    format!("{} to workspace '{}'", window.id, workspace),
                    e,
                )
            })?;
        match placement {
            Placement::Moved => info!("moved {} to workspace {}", window, workspace),
            Placement::AlreadyThere => debug!("{} already in workspace {}", window, workspace),
        }

        if set_focus {
            self.wm
                .set_focus(window.id)
                .map_err(|e| ScratchpadError::adapter("set focus to window", window.id.to_string(), e))?;
        }
        Ok(())
    }

    /// Float `window` and resize it.  Floating is best-effort; the resize is
    /// not.
    pub fn apply_geometry(&self, window: &Window, geometry: Geometry) -> Result<(), ScratchpadError> {
        if let Err(e) = self.wm.set_layout(window.id, Layout::Floating) {
            warn!("unable to set floating layout for {}: {}", window, e);
        }
        self.wm.resize_window(window.id, geometry).map_err(|e| {
            ScratchpadError::adapter(
                "resize window",
                format!("{} to {}", window.id, geometry),
                e,
            )
        })?;
        debug!("resized {} to {}", window, geometry);
        Ok(())
    }
}
