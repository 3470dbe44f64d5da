//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--log-file`, `--no-confirm`, `--theme`, start path)
//! 2. `--config <file>`
//! 3. `$DNAV_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dnav.toml` in the current working directory
//! 5. Global `~/.config/dnav/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Folder to reveal at startup (overridden by CLI positional arg).
    pub start_path: Option<String>,
    /// Confirm before delete operations.
    pub confirm_delete: Option<bool>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    /// Use nerd font icons (false = ASCII markers).
    pub use_icons: Option<bool>,
    /// chrono format string for the modified column.
    pub date_format: Option<String>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub list_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub dir_fg: Option<String>,
    pub file_fg: Option<String>,
    pub drive_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
    pub dialog_border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log output settings. Nothing is logged unless a file is set.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<String>,
    /// Filter directive, e.g. "info" or "drive_navigator=debug".
    pub level: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub listing: ListingConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Default format of the modified column.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that one is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DNAV_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dnav.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("dnav").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
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
                start_path: other
                    .general
                    .start_path
                    .clone()
                    .or(self.general.start_path),
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
            },
            listing: ListingConfig {
                use_icons: other.listing.use_icons.or(self.listing.use_icons),
                date_format: other
                    .listing
                    .date_format
                    .clone()
                    .or(self.listing.date_format),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
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
        for path in candidate_paths().iter().rev() {
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

    /// Folder to reveal at startup, if any.
    pub fn start_path(&self) -> Option<&str> {
        self.general.start_path.as_deref()
    }

    /// Whether to confirm before delete.
    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    /// Whether to use nerd font icons.
    pub fn use_icons(&self) -> bool {
        self.listing.use_icons.unwrap_or(false)
    }

    /// chrono format string for modification times.
    pub fn date_format(&self) -> &str {
        self.listing
            .date_format
            .as_deref()
            .unwrap_or(DEFAULT_DATE_FORMAT)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    /// Log file path; logging is off when unset.
    pub fn log_file(&self) -> Option<&str> {
        self.log.file.as_deref()
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
