use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

/// File name looked up in the current directory when no config is given.
pub const CONFIG_FILE: &str = "lcview.toml";

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "LCVIEW_CONFIG";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "invalid config {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { .. } => None,
        }
    }
}

/// Top-level `lcview.toml`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tool: ToolConfig,
    pub view: ViewConfig,
    pub browse: BrowseConfig,
}

/// External periodogram tool invocation.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Shell script run with `bash`.
    pub script: PathBuf,
    /// Directory the tool runs in and writes `output` to.
    pub workdir: PathBuf,
    pub start: u32,
    pub count: u32,
    pub output: String,
    pub timeout_secs: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from("lcdft.bash"),
            workdir: PathBuf::from("."),
            start: 0,
            count: 300,
            output: "lcf.trf".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn resolve_against(&mut self, base: &Path) {
        if base.as_os_str().is_empty() {
            return;
        }
        if self.script.is_relative() {
            self.script = base.join(&self.script);
        }
        if self.workdir.is_relative() {
            self.workdir = base.join(&self.workdir);
        }
    }
}

/// Initial display settings for the viewer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub smooth_window: usize,
    pub show_errors: bool,
    pub show_smoothed: bool,
    /// Print folded points over two cycles, phase 0 to 2.
    pub two_cycles: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            smooth_window: lc_core::DEFAULT_SMOOTH_WINDOW,
            show_errors: false,
            show_smoothed: true,
            two_cycles: false,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BrowseConfig {
    /// File extensions shown by `browse`; empty shows everything.
    pub extensions: Vec<String>,
}

impl Config {
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Read a config file. Relative tool paths resolve against the file's
    /// directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content, path)?;
        if let Some(base) = path.parent() {
            config.tool.resolve_against(base);
        }
        Ok(config)
    }

    /// Resolve the active config.
    ///
    /// Priority chain:
    /// 1. Explicit `--config` path
    /// 2. `LCVIEW_CONFIG` environment variable
    /// 3. `lcview.toml` in the current directory, if present
    /// 4. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }
}
