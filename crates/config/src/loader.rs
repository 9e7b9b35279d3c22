use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::ChartrelayConfig;

/// Standard config file name.
const CONFIG_FILENAME: &str = "chartrelay.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<ChartrelayConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./chartrelay.toml` (project-local)
/// 2. `~/.config/chartrelay/chartrelay.toml` (user-global)
///
/// Returns `ChartrelayConfig::default()` if no config file is found.
pub fn discover_and_load() -> ChartrelayConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    ChartrelayConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    let p = PathBuf::from(CONFIG_FILENAME);
    if p.exists() {
        return Some(p);
    }

    // User-global: ~/.config/chartrelay/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "chartrelay") {
        let p = dirs.config_dir().join(CONFIG_FILENAME);
        if p.exists() {
            return Some(p);
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/chartrelay/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "chartrelay").map(|d| d.config_dir().to_path_buf())
}

/// Apply `CHARTRELAY_BIND` / `CHARTRELAY_PORT` environment overrides.
pub fn apply_env_overrides(config: &mut ChartrelayConfig) {
    if let Ok(bind) = std::env::var("CHARTRELAY_BIND")
        && !bind.is_empty()
    {
        config.server.bind = bind;
    }
    if let Ok(port) = std::env::var("CHARTRELAY_PORT") {
        match port.parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(e) => warn!(port, error = %e, "ignoring invalid CHARTRELAY_PORT"),
        }
    }
}
