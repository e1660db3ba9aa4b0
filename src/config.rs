//! Configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--config`, `--depth`, `--dirs-first`, etc.)
//! 2. `$FSTREE_CONFIG` environment variable (path to config file)
//! 3. Project-local `.fstree.toml` in the current working directory
//! 4. Global `~/.config/fstree/config.toml`
//! 5. Built-in defaults

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use tracing::warn;

use crate::error::{AppError, Result};
use crate::listing::DEFAULT_TIME_FORMAT;

// ── Section configs ──────────────────────────────────────────────────────────

/// General settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by the CLI positional arg).
    pub default_path: Option<String>,
    /// List dot-files.
    pub show_hidden: Option<bool>,
}

/// Tree walk settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Directories listed before files.
    pub dirs_first: Option<bool>,
    /// Number of levels to print.
    pub depth: Option<usize>,
    /// Use nerd font icons (false = ASCII markers).
    pub use_icons: Option<bool>,
}

/// Column formatting settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print sizes as B/KB/MB/GB.
    pub human_sizes: Option<bool>,
    /// `strftime` pattern for the Last Modified column.
    pub time_format: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub display: DisplayConfig,
}

/// Default number of printed levels.
pub const DEFAULT_DEPTH: usize = 2;

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path, which is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("FSTREE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".fstree.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("fstree").join("config.toml"));
    }

    paths
}

/// Read and parse a TOML config file.
fn read_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str::<AppConfig>(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
}

/// Load a config file. Returns `None` if the file doesn't exist or can't be
/// parsed (with a warning logged for the latter).
fn load_file(path: &Path) -> Option<AppConfig> {
    match read_file(path) {
        Ok(cfg) => Some(cfg),
        Err(AppError::Io(_)) => None,
        Err(e) => {
            warn!("skipping config file: {e}");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: other
                    .general
                    .default_path
                    .clone()
                    .or(self.general.default_path),
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
            },
            tree: TreeConfig {
                dirs_first: other.tree.dirs_first.or(self.tree.dirs_first),
                depth: other.tree.depth.or(self.tree.depth),
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
            },
            display: DisplayConfig {
                human_sizes: other.display.human_sizes.or(self.display.human_sizes),
                time_format: other
                    .display
                    .time_format
                    .clone()
                    .or(self.display.time_format),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        let paths = candidate_paths();
        for path in paths.iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether dot-files are listed.
    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(true)
    }

    pub fn dirs_first(&self) -> bool {
        self.tree.dirs_first.unwrap_or(false)
    }

    /// Number of printed levels, at least 1.
    pub fn depth(&self) -> usize {
        self.tree.depth.unwrap_or(DEFAULT_DEPTH).max(1)
    }

    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(false)
    }

    pub fn human_sizes(&self) -> bool {
        self.display.human_sizes.unwrap_or(true)
    }

    /// `strftime` pattern; an invalid configured pattern falls back to the
    /// default with a warning.
    pub fn time_format(&self) -> &str {
        match self.display.time_format.as_deref() {
            Some(format) if is_valid_time_format(format) => format,
            Some(format) => {
                warn!("ignoring invalid time_format {format:?}");
                DEFAULT_TIME_FORMAT
            }
            None => DEFAULT_TIME_FORMAT,
        }
    }
}

fn is_valid_time_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.show_hidden());
        assert!(!cfg.dirs_first());
        assert_eq!(cfg.depth(), 2);
        assert!(!cfg.use_icons());
        assert!(cfg.human_sizes());
        assert_eq!(cfg.time_format(), "%Y-%m-%d %H:%M:%S");
        assert!(cfg.general.default_path.is_none());
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
default_path = "/srv"
show_hidden = false

[tree]
dirs_first = true
depth = 4
use_icons = true

[display]
human_sizes = false
time_format = "%d.%m.%Y"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.general.default_path.as_deref(), Some("/srv"));
        assert!(!cfg.show_hidden());
        assert!(cfg.dirs_first());
        assert_eq!(cfg.depth(), 4);
        assert!(cfg.use_icons());
        assert!(!cfg.human_sizes());
        assert_eq!(cfg.time_format(), "%d.%m.%Y");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[tree]
dirs_first = true
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.dirs_first());
        assert!(cfg.show_hidden());
        assert_eq!(cfg.depth(), 2);
    }

    #[test]
    fn test_depth_is_at_least_one() {
        let cfg: AppConfig = toml::from_str("[tree]\ndepth = 0\n").expect("parse failed");
        assert_eq!(cfg.depth(), 1);
    }

    #[test]
    fn test_invalid_time_format_uses_default() {
        let cfg: AppConfig =
            toml::from_str("[display]\ntime_format = \"%Q\"\n").expect("parse failed");
        assert_eq!(cfg.time_format(), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(false),
                ..Default::default()
            },
            tree: TreeConfig {
                depth: Some(3),
                use_icons: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let over = AppConfig {
            tree: TreeConfig {
                depth: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert_eq!(merged.depth(), 5); // overridden
        assert!(merged.use_icons()); // from base
        assert!(!merged.show_hidden()); // from base
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            display: DisplayConfig {
                human_sizes: Some(false),
                time_format: Some("%H:%M".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert!(!merged.human_sizes());
        assert_eq!(merged.time_format(), "%H:%M");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
show_hidden = false

[tree]
depth = 3
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(!cfg.show_hidden());
        assert_eq!(cfg.depth(), 3);
        assert!(!cfg.dirs_first());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
        assert!(matches!(
            read_file(Path::new("/nonexistent/config.toml")),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
        assert!(matches!(read_file(&cfg_path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
show_hidden = false

[tree]
depth = 3
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            tree: TreeConfig {
                depth: Some(6),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert_eq!(cfg.depth(), 6);
        assert!(!cfg.show_hidden());
    }
}
