pub mod viewer;

pub use viewer::{SceneConfig, ShaderConfig, ViewerConfig, WindowConfig};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Loads the viewer config, writing the defaults first if the file is absent.
pub fn load_or_create_config(config_path: &Path) -> Result<ViewerConfig> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !config_path.exists() {
        let default_config = ViewerConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(config_path, toml_content).context("Failed to write default config")?;
        log::info!("Wrote default config to {}", config_path.display());
        return Ok(default_config);
    }

    let content = std::fs::read_to_string(config_path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "MetroManDevTeam", "RigidShader")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join("viewer.toml"))
}
