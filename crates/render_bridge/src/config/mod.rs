//! # Configuration System
//!
//! Serializable configuration for the renderer facade and the headless
//! resource manager. Files are read and written as TOML or RON, chosen by
//! extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::render::api::SwapChainFlags;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load configuration from file, falling back to defaults when the file is missing
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// On-disk formats understood by [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document
    Toml,
    /// Rusty Object Notation document
    Ron,
}

impl ConfigFormat {
    /// Pick a format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// # Renderer Configuration
///
/// Settings applied by [`crate::render::Renderer`] when it acquires its swap
/// chain and frame renderer from the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Background clear color [R, G, B, A] (0.0-1.0 range)
    pub clear_color: [f32; 4],
    /// Clear the target before the first view of each frame is drawn
    pub clear: bool,
    /// Request a swap chain with an alpha channel
    pub transparent_swap_chain: bool,
    /// Request a swap chain whose contents can be read back
    pub readable_swap_chain: bool,
    /// Log a warning when a GUI scene replaces an existing one
    pub warn_on_gui_scene_replace: bool,
}

impl RendererConfig {
    /// Set the clear color
    pub fn with_clear_color(mut self, clear_color: [f32; 4]) -> Self {
        self.clear_color = clear_color.map(|c| c.clamp(0.0, 1.0));
        self
    }

    /// Enable or disable clearing
    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    /// Swap chain creation flags derived from this configuration
    pub fn swap_chain_flags(&self) -> SwapChainFlags {
        let mut flags = SwapChainFlags::empty();
        flags.set(SwapChainFlags::TRANSPARENT, self.transparent_swap_chain);
        flags.set(SwapChainFlags::READABLE, self.readable_swap_chain);
        flags
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            clear: true,
            transparent_swap_chain: false,
            readable_swap_chain: false,
            warn_on_gui_scene_replace: true,
        }
    }
}

impl Config for RendererConfig {}

/// # Resource Configuration
///
/// Capacity limits for resource managers. A limit of zero means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Maximum number of live materials
    pub max_materials: usize,
    /// Maximum number of live material instances
    pub max_material_instances: usize,
    /// Maximum number of live textures
    pub max_textures: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            max_materials: 256,
            max_material_instances: 4096,
            max_textures: 1024,
        }
    }
}

impl Config for ResourceConfig {}
