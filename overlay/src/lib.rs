//! # Navoverlay
//!
//! Draws a navigation mesh as debug geometry inside a host renderer's frame.
//!
//! ## Overview
//!
//! - [`NavMeshOverlay`] - Rebuilds batched geometry when the active navmesh
//!   changes and draws it on the geometry render phase
//! - [`PipelineStateConfig`] - Editable fixed-function state, optionally used
//!   instead of the built-in overlay state
//! - [`DebugDrawAdapter`] - Feeds the navmesh debug-draw protocol into a
//!   [`BatchGroup`](navoverlay_debug_drawer::BatchGroup)
//! - [`OverlayConfig`] - Settings loaded from TOML
//!
//! ## Usage
//!
//! ```ignore
//! let loader = Arc::new(MeshLoader::new());
//! let mut overlay = NavMeshOverlay::new(&loader, &load_or_default(path));
//!
//! loader.set_navmesh(Arc::new(navmesh));
//!
//! // Each frame, on the host's render thread:
//! overlay.render(device, RenderPhase::Geometry);
//! ```

pub mod adapter;
pub mod config;
pub mod overlay;
pub mod state;
mod state_ui;
mod ui;

pub use adapter::DebugDrawAdapter;
pub use config::{ConfigError, OverlayConfig, load_config, load_or_default};
pub use overlay::{NavMeshOverlay, OverlayState};
pub use state::{PipelineStateConfig, TextureStageConfig, apply_default_overlay_state};
