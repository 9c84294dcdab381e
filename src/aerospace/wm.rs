//! [`WindowManager`] implementation backed by the AeroSpace socket.
//!
//! Every call opens a short-lived connection, sends one request and reads
//! one response.  No `aerospace` child processes are spawned; only resizing
//! shells out, to the `window-manager` helper shipped next to the binary.

use super::{default_socket_path, AeroSpaceError, ClientRequest, ServerAnswer};
use crate::config::IpcConfig;
use crate::geometry::Geometry;
use crate::traits::{CommandResponse, Placement, WindowManager};
use crate::window::{Layout, Window, WindowId, Workspace};
use log::{debug, warn};
use serde::Deserialize;
use std::cell::Cell;
use std::io::{BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

/// `list-windows --format` producing every field of [`WindowJson`].
const WINDOW_FORMAT: &str =
    "%{window-id} %{app-name} %{window-title} %{app-bundle-id} %{workspace} %{window-layout}";

/// Substring of AeroSpace's complaint when a window is moved to the
/// workspace it is already in.
const ALREADY_THERE: &str = "already belongs to workspace";

/// Name of the resize helper binary.
const RESIZE_HELPER: &str = "window-manager";

/// One entry of `list-windows --json`.
#[derive(Deserialize)]
struct WindowJson {
    #[serde(rename = "window-id")]
    id: i64,
    #[serde(rename = "app-name", default)]
    app_name: String,
    #[serde(rename = "window-title", default)]
    title: String,
    #[serde(rename = "app-bundle-id", default)]
    bundle_id: String,
    #[serde(default)]
    workspace: String,
    #[serde(rename = "window-layout", default)]
    layout: String,
}

impl From<WindowJson> for Window {
    fn from(w: WindowJson) -> Self {
        Window {
            id: WindowId(w.id),
            app_name: w.app_name,
            title: w.title,
            bundle_id: w.bundle_id,
            workspace: w.workspace,
            layout: Layout::from_wm_name(&w.layout),
        }
    }
}

/// One entry of `list-workspaces --json`.
#[derive(Deserialize)]
struct WorkspaceJson {
    workspace: String,
}

/// AeroSpace-backed window manager.
pub struct AeroSpaceWm {
    socket: PathBuf,
    timeout: Option<Duration>,
    resize_helper: PathBuf,
    closed: Cell<bool>,
}

/// `window-manager` next to the running executable, or on `$PATH`.
fn default_resize_helper() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(RESIZE_HELPER)))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(RESIZE_HELPER))
}

impl AeroSpaceWm {
    /// Create a handle from configuration.
    ///
    /// No connection is opened eagerly.
    pub fn new(config: &IpcConfig) -> Result<Self, AeroSpaceError> {
        let socket = match &config.socket_path {
            Some(path) => path.clone(),
            None => default_socket_path()?,
        };
        let mut wm = Self::at(socket);
        wm.timeout = match config.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        if let Some(helper) = &config.resize_helper {
            wm.resize_helper = helper.clone();
        }
        Ok(wm)
    }

    /// Handle for the socket at `socket`, with the default timeout.
    pub fn at(socket: impl Into<PathBuf>) -> Self {
        Self {
            socket: socket.into(),
            timeout: Some(Duration::from_millis(IpcConfig::default().timeout_ms)),
            resize_helper: default_resize_helper(),
            closed: Cell::new(false),
        }
    }

    /// Send one request and wait for the answer.
    fn request(&self, args: &[&str]) -> Result<ServerAnswer, AeroSpaceError> {
        if self.closed.get() {
            return Err(AeroSpaceError::Closed);
        }
        debug!("aerospace {}", args.join(" "));

        let mut stream = UnixStream::connect(&self.socket).map_err(|source| AeroSpaceError::Connect {
            path: self.socket.display().to_string(),
            source,
        })?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        let request = ClientRequest {
            command: "",
            args: args.to_vec(),
            stdin: "",
        };
        stream.write_all(&serde_json::to_vec(&request)?)?;
        stream.flush()?;

        // The server may keep the connection open; stop after one value.
        let mut de = serde_json::Deserializer::from_reader(BufReader::new(stream));
        let answer = ServerAnswer::deserialize(&mut de)?;
        Ok(answer)
    }

    /// Send a request and fail on a non-zero exit code.
    fn run(&self, args: &[&str]) -> Result<String, AeroSpaceError> {
        let answer = self.request(args)?;
        if answer.exit_code != 0 {
            return Err(AeroSpaceError::Command {
                command: args.first().copied().unwrap_or_default().to_string(),
                exit_code: answer.exit_code,
                stderr: answer.stderr.trim().to_string(),
            });
        }
        Ok(answer.stdout)
    }

    fn list_windows(&self, scope: &[&str]) -> Result<Vec<Window>, AeroSpaceError> {
        let mut args = vec!["list-windows"];
        args.extend_from_slice(scope);
        args.extend_from_slice(&["--json", "--format", WINDOW_FORMAT]);
        let stdout = self.run(&args)?;
        let windows: Vec<WindowJson> = serde_json::from_str(&stdout)?;
        Ok(windows.into_iter().map(Window::from).collect())
    }
}

impl WindowManager for AeroSpaceWm {
    type Error = AeroSpaceError;

    fn all_windows(&self) -> Result<Vec<Window>, Self::Error> {
        self.list_windows(&["--all"])
    }

    fn windows_in_workspace(&self, workspace: &str) -> Result<Vec<Window>, Self::Error> {
        self.list_windows(&["--workspace", workspace])
    }

    fn focused_window(&self) -> Result<Option<Window>, Self::Error> {
        Ok(self.list_windows(&["--focused"])?.into_iter().next())
    }

    fn focused_workspace(&self) -> Result<Workspace, Self::Error> {
        let stdout = self.run(&["list-workspaces", "--focused", "--json", "--format", "%{workspace}"])?;
        let workspaces: Vec<WorkspaceJson> = serde_json::from_str(&stdout)?;
        workspaces
            .into_iter()
            .next()
            .map(|w| Workspace::new(w.workspace))
            .ok_or_else(|| AeroSpaceError::Command {
                command: "list-workspaces".into(),
                exit_code: 0,
                stderr: "no focused workspace".into(),
            })
    }

    fn move_window_to_workspace(
        &self,
        window_id: WindowId,
        workspace: &str,
        focus_follows: bool,
    ) -> Result<Placement, Self::Error> {
        let id = window_id.to_string();
        let mut args = vec!["move-node-to-workspace", workspace, "--window-id", id.as_str()];
        if focus_follows {
            args.push("--focus-follows-window");
        }
        let answer = self.request(&args)?;
        if answer.exit_code == 0 {
            return Ok(Placement::Moved);
        }
        if answer.stderr.contains(ALREADY_THERE) {
            return Ok(Placement::AlreadyThere);
        }
        Err(AeroSpaceError::Command {
            command: "move-node-to-workspace".into(),
            exit_code: answer.exit_code,
            stderr: answer.stderr.trim().to_string(),
        })
    }

    fn set_layout(&self, window_id: WindowId, layout: Layout) -> Result<(), Self::Error> {
        let id = window_id.to_string();
        self.run(&["layout", layout.as_str(), "--window-id", id.as_str()])?;
        Ok(())
    }

    fn resize_window(&self, window_id: WindowId, geometry: Geometry) -> Result<(), Self::Error> {
        let helper = self.resize_helper.display().to_string();
        let output = std::process::Command::new(&self.resize_helper)
            .arg("resize")
            .arg(window_id.to_string())
            .arg(geometry.width_percent.to_string())
            .arg(geometry.height_percent.to_string())
            .output()
            .map_err(|e| AeroSpaceError::Helper {
                path: helper.clone(),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            warn!("resize helper output: {}", stdout.trim());
            return Err(AeroSpaceError::Helper {
                path: helper,
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(())
    }

    fn set_focus(&self, window_id: WindowId) -> Result<(), Self::Error> {
        let id = window_id.to_string();
        self.run(&["focus", "--window-id", id.as_str()])?;
        Ok(())
    }

    fn focus_next_tiling_window(&self) -> Result<(), Self::Error> {
        self.run(&["focus", "--ignore-floating", "dfs-next"])?;
        Ok(())
    }

    fn socket_path(&self) -> Result<PathBuf, Self::Error> {
        Ok(self.socket.clone())
    }

    fn server_version(&self) -> Result<String, Self::Error> {
        Ok(self.request(&["config", "--config-path"])?.server_version)
    }

    fn send_command(&self, command: &str, args: &[String]) -> Result<CommandResponse, Self::Error> {
        let mut full = vec![command];
        full.extend(args.iter().map(String::as_str));
        let answer = self.request(&full)?;
        Ok(CommandResponse {
            server_version: answer.server_version,
            stdout: answer.stdout,
            stderr: answer.stderr,
            exit_code: answer.exit_code,
        })
    }

    fn close(&self) -> Result<(), Self::Error> {
        self.closed.set(true);
        Ok(())
    }
}

//  Tests
