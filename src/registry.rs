//! Persistent list of sticky window patterns.
//!
//! Windows whose application name matches a sticky pattern follow the user
//! from workspace to workspace (see [`tracker`](crate::tracker)).  The list
//! lives in `$XDG_CONFIG_HOME/aerospace-sticky/registry.json`:
//!
//! ```json
//! {
//!   "sticky_patterns": [
//!     "^Music$",
//!     "Zoom"
//!   ]
//! }
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    sticky_patterns: Vec<String>,
}

/// Errors from reading or writing the registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unable to read registry {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("unable to parse registry {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("unable to write registry {path}: {source}")]
    Write { path: String, source: io::Error },
    #[error("invalid sticky pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Resolve `$XDG_CONFIG_HOME/aerospace-sticky/registry.json`, falling back to
/// `$HOME/.config`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("aerospace-sticky").join("registry.json")
}

/// Ordered, duplicate-free set of sticky patterns backed by a JSON file.
#[derive(Debug, Clone)]
pub struct StickyRegistry {
    path: PathBuf,
    patterns: Vec<String>,
}

impl StickyRegistry {
    /// Open the registry at the default location.
    pub fn load() -> Result<Self, RegistryError> {
        Self::open(default_path())
    }

    /// Open the registry at `path`.  A missing file is an empty registry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let mut registry = Self {
            path: path.as_ref().to_path_buf(),
            patterns: Vec::new(),
        };
        registry.reload()?;
        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, picking up changes made by other processes.
    pub fn reload(&mut self) -> Result<(), RegistryError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no registry at {}", self.path.display());
                self.patterns.clear();
                return Ok(());
            }
            Err(source) => {
                return Err(RegistryError::Read {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };
        let file: RegistryFile =
            serde_json::from_str(&contents).map_err(|source| RegistryError::Parse {
                path: self.path.display().to_string(),
                source,
            })?;

        self.patterns.clear();
        for pattern in file.sticky_patterns {
            if !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
        Ok(())
    }

    /// Add `pattern` and persist.  Returns `false` if it was already present.
    pub fn add(&mut self, pattern: &str) -> Result<bool, RegistryError> {
        regex::Regex::new(pattern).map_err(|source| RegistryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        if self.has(pattern) {
            return Ok(false);
        }
        self.patterns.push(pattern.to_string());
        self.save()?;
        info!("added sticky pattern {:?}", pattern);
        Ok(true)
    }

    /// Remove `pattern` and persist.  Returns `false` if it was not present.
    pub fn remove(&mut self, pattern: &str) -> Result<bool, RegistryError> {
        let Some(index) = self.patterns.iter().position(|p| p == pattern) else {
            return Ok(false);
        };
        self.patterns.remove(index);
        self.save()?;
        info!("removed sticky pattern {:?}", pattern);
        Ok(true)
    }

    pub fn has(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Write the registry as pretty-printed JSON, creating parent
    /// directories as needed.
    ///
    /// The file is replaced by renaming a sibling temp file over it, so a
    /// concurrent reader sees either the old or the new contents.
    pub fn save(&self) -> Result<(), RegistryError> {
        let write_err = |source: io::Error| RegistryError::Write {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let file = RegistryFile {
            sticky_patterns: self.patterns.clone(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| write_err(e.into()))?;

        let tmp = self
            .path
            .with_extension(format!("json.tmp-{}", std::process::id()));
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp);
            write_err(source)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    /// Registry path in a private temp directory, removed on drop.
    struct TempRegistry {
        path: PathBuf,
    }

    impl TempRegistry {
        fn new() -> Self {
            let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
            let path = std::env::temp_dir()
                .join(format!("aerospace-sticky-test-{}-{}", std::process::id(), id))
                .join("registry.json");
            Self { path }
        }

        fn dir(&self) -> &Path {
            self.path.parent().unwrap()
        }
    }

    impl Drop for TempRegistry {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(self.dir());
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = TempRegistry::new();
        let reg = StickyRegistry::open(&tmp.path).unwrap();
        assert!(reg.is_empty());
        assert!(!reg.path().exists());
    }

    #[test]
    fn add_persists_and_dedups() {
        let tmp = TempRegistry::new();
        let mut reg = StickyRegistry::open(&tmp.path).unwrap();
        assert!(reg.add("^Music$").unwrap());
        assert!(reg.add("Zoom").unwrap());
        assert!(!reg.add("Zoom").unwrap());

        let reopened = StickyRegistry::open(&tmp.path).unwrap();
        assert_eq!(reopened.patterns(), ["^Music$", "Zoom"]);

        let raw = std::fs::read_to_string(&tmp.path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["sticky_patterns"][1], "Zoom");
        assert!(raw.contains('\n'), "registry should be pretty-printed");
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let tmp = TempRegistry::new();
        let mut reg = StickyRegistry::open(&tmp.path).unwrap();
        reg.add("a").unwrap();
        reg.add("b").unwrap();
        reg.remove("a").unwrap();

        let names: Vec<String> = std::fs::read_dir(tmp.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["registry.json"]);
    }

    #[test]
    fn remove_keeps_order() {
        let tmp = TempRegistry::new();
        let mut reg = StickyRegistry::open(&tmp.path).unwrap();
        for p in ["a", "b", "c"] {
            reg.add(p).unwrap();
        }
        assert!(reg.remove("b").unwrap());
        assert!(!reg.remove("b").unwrap());
        assert_eq!(reg.patterns(), ["a", "c"]);
        assert!(reg.has("c"));
        assert!(!reg.has("b"));
        assert_eq!(StickyRegistry::open(&tmp.path).unwrap().patterns(), ["a", "c"]);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let tmp = TempRegistry::new();
        let mut reg = StickyRegistry::open(&tmp.path).unwrap();
        assert!(matches!(
            reg.add("[oops"),
            Err(RegistryError::InvalidPattern { .. })
        ));
        assert!(!tmp.path.exists());
    }

    #[test]
    fn reload_sees_external_changes() {
        let tmp = TempRegistry::new();
        let mut reg = StickyRegistry::open(&tmp.path).unwrap();
        reg.add("a").unwrap();

        let mut other = StickyRegistry::open(&tmp.path).unwrap();
        other.remove("a").unwrap();

        reg.reload().unwrap();
        assert!(reg.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempRegistry::new();
        std::fs::create_dir_all(tmp.dir()).unwrap();
        std::fs::write(&tmp.path, "not json").unwrap();
        assert!(matches!(
            StickyRegistry::open(&tmp.path),
            Err(RegistryError::Parse { .. })
        ));
    }

    #[test]
    fn failed_reload_keeps_patterns() {
        let tmp = TempRegistry::new();
        let mut reg = StickyRegistry::open(&tmp.path).unwrap();
        reg.add("Music").unwrap();

        std::fs::write(&tmp.path, "").unwrap();
        assert!(reg.reload().is_err());
        assert_eq!(reg.patterns(), ["Music"]);
    }
}
