//! Resolve patterns and filters into concrete window lists, and answer
//! membership questions about the live topology.
//!
//! Every method re-queries the window manager; nothing is cached.

use crate::error::ScratchpadError;
use crate::filter::{apply_filters, parse_filters};
use crate::traits::WindowManager;
use crate::window::{Window, WindowId, SCRATCHPAD_WORKSPACE};
use log::{debug, error, warn};
use regex::Regex;
use std::collections::HashSet;

/// The windows a command should act on, as resolved from its pattern
/// argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Regex matched against application names.
    pub pattern: String,
    /// Set when the pattern was derived from the focused window because the
    /// user gave none.
    pub focused_window: Option<WindowId>,
}

impl Target {
    pub fn is_default(&self) -> bool {
        self.focused_window.is_some()
    }
}

/// Read-only queries over a [`WindowManager`].
pub struct Querier<W: WindowManager> {
    wm: W,
}

fn compile(pattern: &str) -> Result<Regex, ScratchpadError> {
    Regex::new(pattern).map_err(|source| ScratchpadError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl<W: WindowManager> Querier<W> {
    pub fn new(wm: W) -> Self {
        Self { wm }
    }

    /// Turn an optional user pattern into a [`Target`].
    ///
    /// Without a pattern the focused window's application name is used,
    /// anchored at both ends, and the focused window id is remembered.
    pub fn resolve_target(&self, pattern: Option<&str>) -> Result<Target, ScratchpadError> {
        if let Some(pattern) = pattern {
            let pattern = pattern.trim();
            if pattern.is_empty() {
                return Err(ScratchpadError::EmptyPattern);
            }
            return Ok(Target {
                pattern: pattern.to_string(),
                focused_window: None,
            });
        }

        let focused = self
            .wm
            .focused_window()
            .map_err(|e| ScratchpadError::adapter("get", "focused window", e))?
            .ok_or(ScratchpadError::NoFocusedWindow)?;
        debug!("defaulting pattern to focused window {}", focused);

        Ok(Target {
            pattern: format!("^{}$", regex::escape(&focused.app_name)),
            focused_window: Some(focused.id),
        })
    }

    /// Windows whose application name matches `pattern` and that satisfy
    /// every filter, in the window manager's order.
    pub fn filtered_windows<S: AsRef<str>>(
        &self,
        pattern: &str,
        filter_flags: &[S],
    ) -> Result<Vec<Window>, ScratchpadError> {
        let app_pattern = compile(pattern).map_err(|e| {
            error!("unable to compile window pattern {:?}: {}", pattern, e);
            e
        })?;
        let filters = parse_filters(filter_flags)?;

        let all = self
            .wm
            .all_windows()
            .map_err(|e| ScratchpadError::adapter("get", "windows", e))?;

        let mut matched = Vec::new();
        for window in all {
            if !app_pattern.is_match(&window.app_name) {
                continue;
            }
            if apply_filters(&window, &filters)? {
                matched.push(window);
            }
        }

        if matched.is_empty() {
            debug!("no windows matched {:?}", pattern);
            return Err(ScratchpadError::NoMatchingWindows {
                pattern: pattern.to_string(),
                with_filters: !filters.is_empty(),
            });
        }

        Ok(matched)
    }

    /// Every floating window.
    pub fn floating_windows(&self) -> Result<Vec<Window>, ScratchpadError> {
        let all = self
            .wm
            .all_windows()
            .map_err(|e| ScratchpadError::adapter("get", "windows", e))?;
        let floating: Vec<Window> = all.into_iter().filter(Window::is_floating).collect();
        debug!("found {} floating window(s)", floating.len());
        Ok(floating)
    }

    /// Windows in the scratchpad workspace plus every floating window,
    /// without duplicates.
    pub fn scratchpad_windows(&self) -> Result<Vec<Window>, ScratchpadError> {
        let all = self
            .wm
            .all_windows()
            .map_err(|e| ScratchpadError::adapter("get", "windows", e))?;

        let parked = self
            .wm
            .windows_in_workspace(SCRATCHPAD_WORKSPACE)
            .unwrap_or_else(|e| {
                warn!("unable to list {} windows: {}", SCRATCHPAD_WORKSPACE, e);
                Vec::new()
            });

        let mut seen = HashSet::new();
        let windows: Vec<Window> = parked
            .into_iter()
            .chain(all.into_iter().filter(Window::is_floating))
            .filter(|w| seen.insert(w.id))
            .collect();
        debug!("found {} scratchpad window(s)", windows.len());
        Ok(windows)
    }

    /// The first window parked in the scratchpad workspace.
    ///
    /// "First" is whatever the window manager lists first; it is not a
    /// recency order.
    pub fn next_scratchpad_window(&self) -> Result<Window, ScratchpadError> {
        self.wm
            .windows_in_workspace(SCRATCHPAD_WORKSPACE)
            .map_err(|e| ScratchpadError::adapter("get windows of", SCRATCHPAD_WORKSPACE, e))?
            .into_iter()
            .next()
            .ok_or(ScratchpadError::NoScratchpadWindows)
    }

    pub fn is_window_in_workspace(
        &self,
        id: WindowId,
        workspace: &str,
    ) -> Result<bool, ScratchpadError> {
        let windows = self
            .wm
            .windows_in_workspace(workspace)
            .map_err(|e| ScratchpadError::adapter("get windows of workspace", workspace, e))?;
        Ok(windows.iter().any(|w| w.id == id))
    }

    pub fn is_window_in_focused_workspace(&self, id: WindowId) -> Result<bool, ScratchpadError> {
        let focused = self
            .wm
            .focused_workspace()
            .map_err(|e| ScratchpadError::adapter("get", "focused workspace", e))?;
        self.is_window_in_workspace(id, &focused.name)
    }

    /// `true` when `id` is the focused window.  Nothing focused means `false`.
    pub fn is_window_focused(&self, id: WindowId) -> Result<bool, ScratchpadError> {
        let focused = self
            .wm
            .focused_window()
            .map_err(|e| ScratchpadError::adapter("get", "focused window", e))?;
        Ok(focused.map(|w| w.id == id).unwrap_or(false))
    }
}
