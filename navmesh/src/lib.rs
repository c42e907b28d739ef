//! Navigation mesh collaborators of the overlay.
//!
//! - [`NavMesh`] - Tiled polygon mesh with off-mesh connections
//! - [`DebugDraw`] - Callback protocol the mesh is drawn through
//! - [`draw_navmesh`] - Emits a mesh through a [`DebugDraw`] receiver
//! - [`MeshLoader`] - Holds the active mesh and publishes changes

pub mod debug_draw;
pub mod draw;
pub mod loader;
pub mod mesh;

pub use debug_draw::{DebugDraw, DebugDrawPrimitive};
pub use draw::{NavMeshDrawFlags, append_arc, append_box, append_circle, draw_navmesh};
pub use loader::{MeshLoader, NavMeshChangedFn, SubscriptionId};
pub use mesh::{
    ClosedList, MAX_GRID_CELLS, MeshTile, NavMesh, OffMeshConnection, Poly, PolyKind, PolyRef,
};
