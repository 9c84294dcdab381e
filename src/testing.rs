//! Test doubles shared by the unit tests of every module.

use crate::geometry::Geometry;
use crate::traits::{CommandResponse, Placement, WindowManager};
use crate::window::{Layout, Window, WindowId, Workspace};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

/// One recorded call against [`RecorderWm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AllWindows,
    WindowsInWorkspace(String),
    FocusedWindow,
    FocusedWorkspace,
    Move {
        id: i64,
        workspace: String,
        focus_follows: bool,
    },
    SetLayout(i64, Layout),
    Resize(i64, Geometry),
    SetFocus(i64),
    FocusNext,
    SendCommand(String, Vec<String>),
    Close,
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Move { .. }
                | Call::SetLayout(..)
                | Call::Resize(..)
                | Call::SetFocus(_)
                | Call::FocusNext
                | Call::Close
        )
    }
}

pub fn mv(id: i64, workspace: &str) -> Call {
    Call::Move {
        id,
        workspace: workspace.into(),
        focus_follows: false,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("recorder error: {0}")]
pub struct RecorderError(pub String);

/// Record-keeping mock window manager.
///
/// Holds a tiny in-memory topology so that moves are visible to later
/// queries, and logs every call in order.
#[derive(Debug, Default)]
pub struct RecorderWm {
    pub windows: RefCell<Vec<Window>>,
    pub focused: RefCell<Option<WindowId>>,
    /// Focused workspace; `None` makes the query fail.
    pub focused_workspace: RefCell<Option<String>>,
    /// Successive answers for `focused_workspace`, consumed front to back
    /// before falling back to [`focused_workspace`](Self::focused_workspace).
    pub workspace_script: RefCell<VecDeque<Result<String, String>>>,
    pub calls: RefCell<Vec<Call>>,
    pub failing_moves: RefCell<HashSet<i64>>,
    pub failing_focus: RefCell<HashSet<i64>>,
    pub fail_layout: RefCell<bool>,
    pub fail_all_windows: RefCell<bool>,
    pub fail_focused_window: RefCell<bool>,
    pub fail_scratchpad_listing: RefCell<bool>,
}

impl RecorderWm {
    pub fn new() -> Self {
        Self {
            focused_workspace: RefCell::new(Some("ws1".into())),
            ..Default::default()
        }
    }

    pub fn with_window(self, id: i64, app: &str, workspace: &str) -> Self {
        self.windows.borrow_mut().push(Window {
            id: WindowId(id),
            app_name: app.into(),
            workspace: workspace.into(),
            ..Default::default()
        });
        self
    }

    pub fn with(self, window: Window) -> Self {
        self.windows.borrow_mut().push(window);
        self
    }

    pub fn focused_on(self, id: i64) -> Self {
        *self.focused.borrow_mut() = Some(WindowId(id));
        self
    }

    pub fn in_workspace(self, workspace: &str) -> Self {
        *self.focused_workspace.borrow_mut() = Some(workspace.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl WindowManager for RecorderWm {
    type Error = RecorderError;

    fn all_windows(&self) -> Result<Vec<Window>, RecorderError> {
        self.record(Call::AllWindows);
        if *self.fail_all_windows.borrow() {
            return Err(RecorderError("list-windows failed".into()));
        }
        Ok(self.windows.borrow().clone())
    }

    fn windows_in_workspace(&self, workspace: &str) -> Result<Vec<Window>, RecorderError> {
        self.record(Call::WindowsInWorkspace(workspace.into()));
        if *self.fail_scratchpad_listing.borrow() && workspace == crate::window::SCRATCHPAD_WORKSPACE {
            return Err(RecorderError("workspace listing failed".into()));
        }
        Ok(self
            .windows
            .borrow()
            .iter()
            .filter(|w| w.workspace == workspace)
            .cloned()
            .collect())
    }

    fn focused_window(&self) -> Result<Option<Window>, RecorderError> {
        self.record(Call::FocusedWindow);
        if *self.fail_focused_window.borrow() {
            return Err(RecorderError("focused window unavailable".into()));
        }
        let focused = *self.focused.borrow();
        Ok(focused.and_then(|id| self.windows.borrow().iter().find(|w| w.id == id).cloned()))
    }

    fn focused_workspace(&self) -> Result<Workspace, RecorderError> {
        self.record(Call::FocusedWorkspace);
        if let Some(next) = self.workspace_script.borrow_mut().pop_front() {
            return next.map(Workspace::new).map_err(RecorderError);
        }
        self.focused_workspace
            .borrow()
            .clone()
            .map(Workspace::new)
            .ok_or_else(|| RecorderError("no focused workspace".into()))
    }

    fn move_window_to_workspace(
        &self,
        window_id: WindowId,
        workspace: &str,
        focus_follows: bool,
    ) -> Result<Placement, RecorderError> {
        self.record(Call::Move {
            id: window_id.0,
            workspace: workspace.into(),
            focus_follows,
        });
        if self.failing_moves.borrow().contains(&window_id.0) {
            return Err(RecorderError(format!("cannot move {}", window_id)));
        }
        let mut windows = self.windows.borrow_mut();
        let window = windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or_else(|| RecorderError(format!("no window {}", window_id)))?;
        if window.workspace == workspace {
            return Ok(Placement::AlreadyThere);
        }
        window.workspace = workspace.into();
        if focus_follows {
            *self.focused.borrow_mut() = Some(window_id);
            *self.focused_workspace.borrow_mut() = Some(workspace.into());
        }
        Ok(Placement::Moved)
    }

    fn set_layout(&self, window_id: WindowId, layout: Layout) -> Result<(), RecorderError> {
        self.record(Call::SetLayout(window_id.0, layout));
        if *self.fail_layout.borrow() {
            return Err(RecorderError("layout refused".into()));
        }
        if let Some(w) = self.windows.borrow_mut().iter_mut().find(|w| w.id == window_id) {
            w.layout = layout;
        }
        Ok(())
    }

    fn resize_window(&self, window_id: WindowId, geometry: Geometry) -> Result<(), RecorderError> {
        self.record(Call::Resize(window_id.0, geometry));
        Ok(())
    }

    fn set_focus(&self, window_id: WindowId) -> Result<(), RecorderError> {
        self.record(Call::SetFocus(window_id.0));
        if self.failing_focus.borrow().contains(&window_id.0) {
            return Err(RecorderError(format!("cannot focus {}", window_id)));
        }
        *self.focused.borrow_mut() = Some(window_id);
        Ok(())
    }

    fn focus_next_tiling_window(&self) -> Result<(), RecorderError> {
        self.record(Call::FocusNext);
        Ok(())
    }

    fn socket_path(&self) -> Result<PathBuf, RecorderError> {
        Ok(PathBuf::from("/tmp/recorder.sock"))
    }

    fn server_version(&self) -> Result<String, RecorderError> {
        Ok("0.19.2-Beta".into())
    }

    fn send_command(&self, command: &str, args: &[String]) -> Result<CommandResponse, RecorderError> {
        self.record(Call::SendCommand(command.into(), args.to_vec()));
        Ok(CommandResponse {
            server_version: "0.19.2-Beta".into(),
            ..Default::default()
        })
    }

    fn close(&self) -> Result<(), RecorderError> {
        self.record(Call::Close);
        Ok(())
    }
}

/// An in-memory writer that can be inspected after being handed out.
#[derive(Debug, Clone, Default)]
pub struct SharedBuf(pub Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
