//! Window and workspace vocabulary shared by every component.
//!
//! These are read-through views of the window manager's state.  Nothing in
//! the crate caches them beyond a single query; every operation asks the
//! [`WindowManager`](crate::traits::WindowManager) again before acting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the hidden workspace that holds scratchpad windows.
pub const SCRATCHPAD_WORKSPACE: &str = ".scratchpad";

/// Well-known applications and the scratchpad workspace they usually live in.
///
/// Descriptive only: nothing moves windows here automatically.
pub const APP_HOME_WORKSPACES: &[(&str, &str)] = &[
    ("Finder", SCRATCHPAD_WORKSPACE),
    ("Notes", SCRATCHPAD_WORKSPACE),
    ("Calendar", SCRATCHPAD_WORKSPACE),
    ("Slack", ".scratchpad-chat"),
    ("Messages", ".scratchpad-chat"),
    ("Spotify", ".scratchpad-media"),
    ("Music", ".scratchpad-media"),
];

/// Opaque window handle assigned by the window manager.
///
/// Unique among open windows and stable for a window's lifetime, but ids
/// are reused after a window closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout mode of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Tiling,
    Floating,
}

impl Layout {
    /// Map a raw window-manager layout name onto [`Layout`].
    ///
    /// AeroSpace reports several tiling flavours (`h_tiles`, `v_accordion`,
    /// …); only `floating` is meaningful to the scratchpad.
    pub fn from_wm_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("floating") {
            Layout::Floating
        } else {
            Layout::Tiling
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Tiling => "tiling",
            Layout::Floating => "floating",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One managed window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Window {
    pub id: WindowId,
    pub app_name: String,
    pub title: String,
    pub bundle_id: String,
    /// Workspace currently holding the window.  Empty when the window
    /// manager did not report it.
    pub workspace: String,
    pub layout: Layout,
}

impl Window {
    pub fn is_floating(&self) -> bool {
        self.layout == Layout::Floating
    }

    pub fn is_in_scratchpad(&self) -> bool {
        self.workspace == SCRATCHPAD_WORKSPACE
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.app_name, self.id)?;
        if !self.title.is_empty() {
            write!(f, " \"{}\"", self.title)?;
        }
        Ok(())
    }
}

/// A workspace, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
