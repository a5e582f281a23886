//! Configuration for the glimmer CLI (§10.3).
//!
//! Mirrors `faxt::config`'s `Config` shape and its three-tier search order
//! (current directory, then the user's `~/.config`, then the platform
//! config directory), deserialized the same way with `serde` + `toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GlimmerCliError, Result};

pub const CONFIG_FILE_NAME: &str = "glimmer.toml";

/// CLI-wide configuration. §10.3 names three ambient concerns beyond the
/// language itself: whether the REPL echoes parsed ASTs, whether the
/// dot-file visualizer hook is wired up (a no-op stub — the Graphviz
/// collaborator itself is out of scope), and the evaluator's recursion
/// depth guard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub verbose: bool,

    /// Echo each parsed statement's AST before evaluating it, in `run` and
    /// `repl`.
    #[serde(default)]
    pub repl_echo_ast: bool,

    /// Whether the dot-file visualizer hook fires. It has nothing to call
    /// yet — implementing the Graphviz collaborator itself is out of scope
    /// — so this only gates a one-line notice that the hook would have run.
    #[serde(default)]
    pub visualizer_enabled: bool,

    /// Maximum call-stack depth the evaluator allows before erroring out
    /// instead of overflowing the native stack.
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: u32,
}

fn default_max_call_depth() -> u32 {
    glimmer_eval::DEFAULT_MAX_CALL_DEPTH
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbose: false,
            repl_echo_ast: false,
            visualizer_enabled: false,
            max_call_depth: default_max_call_depth(),
        }
    }
}

impl Config {
    /// Searches the standard locations for a config file, falling back to
    /// `Config::default()` if none is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GlimmerCliError::Config(format!("configuration file not found: {}", path.display())));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| GlimmerCliError::Config(format!("failed to parse configuration: {e}")))
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        dirs::home_dir().map(|dir| dir.join(".config").join("glimmer").join(CONFIG_FILE_NAME)).filter(|p| p.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("glimmer").join(CONFIG_FILE_NAME)).filter(|p| p.exists())
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config().or_else(Self::check_home_config).or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_the_documented_defaults() {
        let config = Config::default();
        assert!(!config.verbose);
        assert!(!config.repl_echo_ast);
        assert!(!config.visualizer_enabled);
        assert_eq!(config.max_call_depth, glimmer_eval::DEFAULT_MAX_CALL_DEPTH);
    }

    #[test]
    fn load_from_path_roundtrips_through_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test_config.toml");
        std::fs::write(&path, "verbose = true\nrepl_echo_ast = true\nmax_call_depth = 64\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert!(config.verbose);
        assert!(config.repl_echo_ast);
        assert_eq!(config.max_call_depth, 64);
        assert!(!config.visualizer_enabled);
    }

    #[test]
    fn load_from_nonexistent_path_is_an_error() {
        let result = Config::load_from_path(Path::new("/nonexistent/glimmer.toml"));
        assert!(result.is_err());
    }
}
