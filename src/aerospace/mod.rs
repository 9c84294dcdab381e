//! AeroSpace integration.
//!
//! * [`wm`]: [`WindowManager`](crate::traits::WindowManager) implementation
//!   that talks to the AeroSpace server over its Unix socket.
//!
//! The wire protocol is one JSON request and one JSON response per
//! connection:
//!
//! ```json
//! {"command":"","args":["list-windows","--all","--json"],"stdin":""}
//! {"serverVersion":"0.19.2-Beta","stdout":"[...]","stderr":"","exitCode":0}
//! ```

pub mod wm;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the socket location.
pub const SOCKET_ENV: &str = "AEROSPACESOCK";

/// Oldest server release this client is known to work with.
pub const MIN_SERVER_VERSION: (u32, u32) = (0, 15);

/// Errors from talking to AeroSpace.
#[derive(Debug, thiserror::Error)]
pub enum AeroSpaceError {
    #[error("unable to connect to {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("aerospace {command} failed (exit code {exit_code}): {stderr}")]
    Command {
        command: String,
        exit_code: i32,
        stderr: String,
    },
    #[error("unable to locate the AeroSpace socket: {0}")]
    Socket(String),
    #[error("connection already closed")]
    Closed,
    #[error("resize helper {path} failed: {message}")]
    Helper { path: String, message: String },
    #[error("server version {found} is older than the minimum {}.{}", MIN_SERVER_VERSION.0, MIN_SERVER_VERSION.1)]
    IncompatibleVersion { found: String },
    #[error("unparseable server version {0:?}")]
    InvalidVersion(String),
}

/// Request body understood by the AeroSpace server.
#[derive(Debug, Serialize)]
pub(crate) struct ClientRequest<'a> {
    pub command: &'a str,
    pub args: Vec<&'a str>,
    pub stdin: &'a str,
}

/// Response body sent back by the AeroSpace server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServerAnswer {
    #[serde(default)]
    pub server_version: String,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    pub exit_code: i32,
}

/// `$AEROSPACESOCK`, or `/tmp/bobko.aerospace-$USER.sock`.
pub fn default_socket_path() -> Result<PathBuf, AeroSpaceError> {
    if let Ok(path) = std::env::var(SOCKET_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let user = std::env::var("USER")
        .map_err(|_| AeroSpaceError::Socket(format!("neither {} nor USER is set", SOCKET_ENV)))?;
    Ok(PathBuf::from(format!("/tmp/bobko.aerospace-{}.sock", user)))
}

/// Parse the leading `major.minor` of a server version such as
/// `0.19.2-Beta`.
fn parse_version(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.trim().trim_start_matches('v').split('.');
    let major = parts.next()?.parse().ok()?;
    let minor: String = parts
        .next()?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some((major, minor.parse().ok()?))
}

/// Check that the server is recent enough.
pub fn check_server_version(version: &str) -> Result<(), AeroSpaceError> {
    let parsed =
        parse_version(version).ok_or_else(|| AeroSpaceError::InvalidVersion(version.to_string()))?;
    if parsed < MIN_SERVER_VERSION {
        return Err(AeroSpaceError::IncompatibleVersion {
            found: version.to_string(),
        });
    }
    Ok(())
}
