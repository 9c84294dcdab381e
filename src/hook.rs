//! The `pull-window` hook run by AeroSpace on every workspace change.
//!
//! When something outside the scratchpad (a notification click, a launcher)
//! focuses a window parked in `.scratchpad`, AeroSpace switches to that
//! workspace.  The hook notices and pulls the window back to the workspace
//! the user came from, so it behaves as if it had been summoned there.
//!
//! Our own moves to the scratchpad must not be undone.  A mover that is about
//! to park the focused window arms the [`Marker`] first; the hook consumes it
//! and stands down.

use crate::error::ScratchpadError;
use crate::traits::{Placement, WindowManager};
use crate::window::{WindowId, SCRATCHPAD_WORKSPACE};
use log::{debug, error, info};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

/// Location of the marker file.
pub const MARKER_PATH: &str = "/tmp/.aerospace-scratchpad-moving";

static CLAIM_ID: AtomicU32 = AtomicU32::new(0);

/// File-backed flag meaning "a programmatic move to the scratchpad is in
/// flight".
///
/// Presence of the file is the whole state.  [`take`](Marker::take) claims
/// the file with a rename, so of several concurrent hooks at most one sees
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    path: PathBuf,
}

impl Default for Marker {
    fn default() -> Self {
        Self::at(MARKER_PATH)
    }
}

impl Marker {
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, source: io::Error) -> ScratchpadError {
        ScratchpadError::Marker {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Create the marker.  Arming an armed marker is a no-op.
    pub fn arm(&self) -> Result<(), ScratchpadError> {
        std::fs::write(&self.path, b"").map_err(|e| self.error(e))?;
        debug!("armed marker {}", self.path.display());
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.path.exists()
    }

    /// Consume the marker.  Returns `true` if it was present.
    pub fn take(&self) -> Result<bool, ScratchpadError> {
        let claimed = self.path.with_extension(format!(
            "claimed-{}-{}",
            std::process::id(),
            CLAIM_ID.fetch_add(1, Ordering::SeqCst)
        ));

        match std::fs::rename(&self.path, &claimed) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.error(e)),
        }
        std::fs::remove_file(&claimed).map_err(|e| self.error(e))?;
        debug!("consumed marker {}", self.path.display());
        Ok(true)
    }
}

/// What a hook invocation decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The user left the scratchpad; nothing to pull.
    LeftScratchpad,
    /// The focus did not land on the scratchpad.
    NotScratchpad,
    NoFocusedWindow,
    /// The focused window is no longer in the scratchpad (stale event).
    WindowLeft,
    /// A move of our own was in flight.
    MarkerConsumed,
    /// The window was pulled back to the previous workspace.
    Pulled(WindowId),
}

pub struct PullWindowHook<W: WindowManager> {
    wm: W,
    marker: Marker,
    dry_run: bool,
}

impl<W: WindowManager> PullWindowHook<W> {
    pub fn new(wm: W) -> Self {
        Self::with_marker(wm, Marker::default())
    }

    pub fn with_marker(wm: W, marker: Marker) -> Self {
        Self {
            wm,
            marker,
            dry_run: false,
        }
    }

    /// Only look at the marker instead of consuming it.  Pair with a
    /// [`DryRunWm`](crate::dry_run::DryRunWm) to leave no trace at all.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn marker_in_flight(&self) -> Result<bool, ScratchpadError> {
        if self.dry_run {
            let armed = self.marker.is_armed();
            if armed {
                info!("[dry-run] would consume marker {}", self.marker.path().display());
            }
            return Ok(armed);
        }
        self.marker.take()
    }

    /// React to a workspace change from `prev` to `focused`.
    pub fn pull_window(&self, prev: &str, focused: &str) -> Result<HookOutcome, ScratchpadError> {
        info!("pull-window: {} -> {}", prev, focused);

        if prev == SCRATCHPAD_WORKSPACE {
            debug!("previous workspace is the scratchpad, nothing to do");
            return Ok(HookOutcome::LeftScratchpad);
        }
        if focused != SCRATCHPAD_WORKSPACE {
            debug!("focused workspace {} is not the scratchpad", focused);
            return Ok(HookOutcome::NotScratchpad);
        }

        let window = match self.wm.focused_window() {
            Ok(Some(window)) => window,
            Ok(None) => {
                debug!("no focused window");
                return Ok(HookOutcome::NoFocusedWindow);
            }
            Err(e) => {
                let e = ScratchpadError::adapter("get", "focused window", e);
                error!("{}", e);
                return Err(e);
            }
        };

        if window.workspace != SCRATCHPAD_WORKSPACE {
            debug!("{} is no longer in the scratchpad ({})", window, window.workspace);
            return Ok(HookOutcome::WindowLeft);
        }

        match self.marker_in_flight() {
            Ok(true) => {
                info!("move in flight, leaving {} in the scratchpad", window);
                return Ok(HookOutcome::MarkerConsumed);
            }
            Ok(false) => {}
            Err(e) => {
                error!("{}", e);
                return Err(e);
            }
        }

        let placement = self
            .wm
            .move_window_to_workspace(window.id, prev, true)
            .map_err(|e| {
                let e = ScratchpadError::adapter(
                    "move window",
                    format!("{} to workspace {}", window.id, prev),
                    e,
                );
                error!("{}", e);
                e
            })?;
        if placement == Placement::AlreadyThere {
            debug!("{} already in {}", window, prev);
        }
        info!("pulled {} back to {}", window, prev);
        Ok(HookOutcome::Pulled(window.id))
    }
}
