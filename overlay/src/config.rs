//! Overlay configuration loaded from `navoverlay.toml`.

use std::fmt;
use std::path::{Path, PathBuf};

use navoverlay_navmesh::NavMeshDrawFlags;
use serde::{Deserialize, Serialize};

use crate::state::PipelineStateConfig;

/// Top-level overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    /// Draw with [`render_state`](Self::render_state) instead of the built-in state.
    pub use_state_editor: bool,
    /// Swizzle navmesh coordinates into a z-up world.
    pub eq_coords: bool,
    pub topologies: TopologyConfig,
    pub draw_flags: DrawFlagsConfig,
    pub render_state: Option<PipelineStateConfig>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_state_editor: false,
            eq_coords: false,
            topologies: TopologyConfig::default(),
            draw_flags: DrawFlagsConfig::default(),
            render_state: None,
        }
    }
}

/// Which batch topologies are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    pub points: bool,
    pub lines: bool,
    pub triangles: bool,
    pub quads: bool,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            points: true,
            lines: true,
            triangles: true,
            quads: true,
        }
    }
}

/// Optional navmesh layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawFlagsConfig {
    pub off_mesh_connections: bool,
    pub closed_list: bool,
    pub color_tiles: bool,
    pub tile_bounds: bool,
}

impl Default for DrawFlagsConfig {
    fn default() -> Self {
        Self::from(NavMeshDrawFlags::default())
    }
}

impl From<NavMeshDrawFlags> for DrawFlagsConfig {
    fn from(flags: NavMeshDrawFlags) -> Self {
        Self {
            off_mesh_connections: flags.contains(NavMeshDrawFlags::OFF_MESH_CONNECTIONS),
            closed_list: flags.contains(NavMeshDrawFlags::CLOSED_LIST),
            color_tiles: flags.contains(NavMeshDrawFlags::COLOR_TILES),
            tile_bounds: flags.contains(NavMeshDrawFlags::TILE_BOUNDS),
        }
    }
}

impl From<DrawFlagsConfig> for NavMeshDrawFlags {
    fn from(config: DrawFlagsConfig) -> Self {
        let mut flags = NavMeshDrawFlags::empty();
        flags.set(NavMeshDrawFlags::OFF_MESH_CONNECTIONS, config.off_mesh_connections);
        flags.set(NavMeshDrawFlags::CLOSED_LIST, config.closed_list);
        flags.set(NavMeshDrawFlags::COLOR_TILES, config.color_tiles);
        flags.set(NavMeshDrawFlags::TILE_BOUNDS, config.tile_bounds);
        flags
    }
}

/// Failure to load an [`OverlayConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl OverlayConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<OverlayConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    OverlayConfig::from_toml(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a configuration file, falling back to defaults if it is missing or invalid.
pub fn load_or_default(path: &Path) -> OverlayConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!("Loaded overlay config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("No overlay config ({e}), using defaults");
            OverlayConfig::default()
        }
    }
}
