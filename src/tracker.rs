//! Keeps sticky windows on the focused workspace.
//!
//! AeroSpace has no notification for this, so [`StickyTracker::follow`]
//! polls the focused workspace and, whenever it changes, moves every window
//! matching a registered pattern along with it.

use crate::registry::StickyRegistry;
use crate::traits::WindowManager;
use log::{debug, error, info, warn};
use regex::Regex;
use std::time::Duration;

/// Default interval between two polls of the focused workspace.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct StickyTracker<W: WindowManager> {
    wm: W,
    registry: StickyRegistry,
    poll_interval: Duration,
    last_workspace: Option<String>,
}

impl<W: WindowManager> StickyTracker<W> {
    pub fn new(wm: W, registry: StickyRegistry) -> Self {
        Self {
            wm,
            registry,
            poll_interval: DEFAULT_POLL_INTERVAL,
            last_workspace: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Workspace seen by the last successful tick.
    pub fn last_workspace(&self) -> Option<&str> {
        self.last_workspace.as_deref()
    }

    /// Poll until the registry becomes empty.
    ///
    /// The registry is re-read before every tick so that `sticky remove`
    /// from another shell stops the loop.  Nothing else ends it: an
    /// unreadable registry keeps the last good patterns, and window-manager
    /// errors only skip the current tick.
    pub fn follow(&mut self) {
        info!(
            "following workspace changes every {:?}",
            self.poll_interval
        );
        loop {
            if let Err(e) = self.registry.reload() {
                warn!(
                    "keeping {} sticky pattern(s): {}",
                    self.registry.patterns().len(),
                    e
                );
            }
            if self.registry.is_empty() {
                info!("no sticky patterns left, stopping");
                return;
            }
            self.tick();
            std::thread::sleep(self.poll_interval);
        }
    }

    /// One iteration: look at the focused workspace and, if it changed since
    /// the last look, bring sticky windows over.  Returns how many windows
    /// were moved.
    ///
    /// The first successful observation only records a baseline.
    pub fn tick(&mut self) -> usize {
        let current = match self.wm.focused_workspace() {
            Ok(ws) => ws.name,
            Err(e) => {
                error!("unable to get focused workspace: {}", e);
                return 0;
            }
        };

        let changed = match &self.last_workspace {
            Some(last) => *last != current,
            None => false,
        };
        if !changed {
            self.last_workspace = Some(current);
            return 0;
        }
        debug!(
            "workspace changed: {} -> {}",
            self.last_workspace.as_deref().unwrap_or_default(),
            current
        );

        let moved = match self.follow_to(&current) {
            Ok(moved) => moved,
            Err(e) => {
                // Leave the old baseline so the next tick retries.
                error!("unable to get windows: {}", e);
                return 0;
            }
        };
        self.last_workspace = Some(current);
        moved
    }

    fn compiled_patterns(&self) -> Vec<Regex> {
        self.registry
            .patterns()
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("skipping invalid sticky pattern {:?}: {}", p, e);
                    None
                }
            })
            .collect()
    }

    fn follow_to(&self, workspace: &str) -> Result<usize, W::Error> {
        let patterns = self.compiled_patterns();
        let mut moved = 0;

        for window in self.wm.all_windows()? {
            if !patterns.iter().any(|re| re.is_match(&window.app_name)) {
                continue;
            }
            if window.workspace == workspace {
                continue;
            }
            match self.wm.move_window_to_workspace(window.id, workspace, false) {
                Ok(_) => {
                    debug!("moved sticky {} to {}", window, workspace);
                    moved += 1;
                }
                Err(e) => error!("unable to move sticky {} to {}: {}", window, workspace, e),
            }
        }

        if moved > 0 {
            info!("moved {} sticky window(s) to {}", moved, workspace);
        }
        Ok(moved)
    }
}
