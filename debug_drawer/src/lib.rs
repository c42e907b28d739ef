//! Topology-batched debug geometry.
//!
//! Immediate-mode `begin` / `vertex` / `end` calls are collected per
//! primitive topology and drawn through a
//! [`FixedFunctionDevice`](navoverlay_graphics::FixedFunctionDevice) with one
//! indexed draw per submission.
//!
//! # Architecture
//!
//! - [`GeometryBatch`] - CPU vertex/index storage for one [`Topology`] plus
//!   its device buffers
//! - [`BatchGroup`] - One batch per topology, routes the draw protocol to the
//!   open batch and renders them in a fixed order
//!
//! # Usage
//!
//! ```ignore
//! let mut group = BatchGroup::new();
//!
//! // Rebuild (whenever the source data changes):
//! group.reset();
//! group.begin(Topology::Lines, 2.0)?;
//! group.add_vertex(0.0, 0.0, 0.0, 0xffff_ffff, 0.0, 0.0)?;
//! group.add_vertex(1.0, 0.0, 0.0, 0xffff_ffff, 0.0, 0.0)?;
//! group.end()?;
//!
//! // Each frame:
//! group.render(device, RenderPhase::Geometry);
//!
//! // Around device loss:
//! group.invalidate_device_objects(device);
//! ```

mod batch;
mod error;
mod group;
mod topology;
mod ui;
mod vertex;

pub use batch::{GeometryBatch, PrimitiveRun};
pub use error::DrawProtocolError;
pub use group::BatchGroup;
pub use topology::Topology;
pub use vertex::Vertex;
