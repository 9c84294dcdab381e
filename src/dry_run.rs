//! A [`WindowManager`] wrapper that reports mutations instead of performing
//! them.
//!
//! Queries go to the wrapped window manager so that selection logic behaves
//! exactly as it would for real.  Every mutating call prints a
//! `[dry-run] ...` line and reports success.  Raw commands are treated as
//! mutations, except the `config --config-path` query behind `info`.

use crate::geometry::Geometry;
use crate::traits::{CommandResponse, Placement, WindowManager};
use crate::window::{Layout, Window, WindowId, Workspace};
use log::debug;
use std::cell::RefCell;
use std::io::Write;
use std::path::PathBuf;

pub struct DryRunWm<W: WindowManager> {
    inner: W,
    out: RefCell<Box<dyn Write>>,
}

impl<W: WindowManager> DryRunWm<W> {
    /// Wrap `inner`, reporting to stdout.
    pub fn new(inner: W) -> Self {
        Self::with_writer(inner, std::io::stdout())
    }

    pub fn with_writer(inner: W, out: impl Write + 'static) -> Self {
        Self {
            inner,
            out: RefCell::new(Box::new(out)),
        }
    }

    fn report(&self, line: String) {
        debug!("{}", line);
        let mut out = self.out.borrow_mut();
        // A broken stdout must not turn a dry run into a failure.
        let _ = writeln!(out, "[dry-run] {}", line);
        let _ = out.flush();
    }
}

impl<W: WindowManager> WindowManager for DryRunWm<W> {
    type Error = W::Error;

    fn all_windows(&self) -> Result<Vec<Window>, Self::Error> {
        self.inner.all_windows()
    }

    fn windows_in_workspace(&self, workspace: &str) -> Result<Vec<Window>, Self::Error> {
        self.inner.windows_in_workspace(workspace)
    }

    fn focused_window(&self) -> Result<Option<Window>, Self::Error> {
        self.inner.focused_window()
    }

    fn focused_workspace(&self) -> Result<Workspace, Self::Error> {
        self.inner.focused_workspace()
    }

    fn move_window_to_workspace(
        &self,
        window_id: WindowId,
        workspace: &str,
        focus_follows: bool,
    ) -> Result<Placement, Self::Error> {
        if focus_follows {
            self.report(format!(
                "would move window {} to workspace {} with focus following",
                window_id, workspace
            ));
        } else {
            self.report(format!(
                "would move window {} to workspace {}",
                window_id, workspace
            ));
        }
        Ok(Placement::Moved)
    }

    fn set_layout(&self, window_id: WindowId, layout: Layout) -> Result<(), Self::Error> {
        self.report(format!("would set layout of window {} to {}", window_id, layout));
        Ok(())
    }

    fn resize_window(&self, window_id: WindowId, geometry: Geometry) -> Result<(), Self::Error> {
        self.report(format!("would resize window {} to {}", window_id, geometry));
        Ok(())
    }

    fn set_focus(&self, window_id: WindowId) -> Result<(), Self::Error> {
        self.report(format!("would focus window {}", window_id));
        Ok(())
    }

    fn focus_next_tiling_window(&self) -> Result<(), Self::Error> {
        self.report("would focus the next tiling window".to_string());
        Ok(())
    }

    fn socket_path(&self) -> Result<PathBuf, Self::Error> {
        self.inner.socket_path()
    }

    fn server_version(&self) -> Result<String, Self::Error> {
        self.inner.server_version()
    }

    fn send_command(&self, command: &str, args: &[String]) -> Result<CommandResponse, Self::Error> {
        if command == "config" && args == ["--config-path"] {
            return self.inner.send_command(command, args);
        }
        let mut line = format!("would run {}", command);
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.report(line);
        Ok(CommandResponse::default())
    }

    fn close(&self) -> Result<(), Self::Error> {
        self.report("would close the window manager connection".to_string());
        Ok(())
    }
}
