//! Draw call description.

use super::buffer::BufferHandle;

/// Phase of the host's frame in which a renderable is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    /// 3D scene geometry, depth-tested against the host's frame.
    Geometry,
    /// 2D user interface drawn after the scene.
    Overlay,
}

/// Primitive assembly for an indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Each index is a separate point.
    PointList,
    /// Every two indices form a line.
    LineList,
    /// Every three indices form a triangle.
    TriangleList,
}

impl PrimitiveType {
    /// Number of indices consumed per primitive.
    pub const fn indices_per_primitive(self) -> u32 {
        match self {
            Self::PointList => 1,
            Self::LineList => 2,
            Self::TriangleList => 3,
        }
    }
}

/// A single indexed draw call, in the shape of `DrawIndexedPrimitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexedDraw {
    /// How the indices are assembled into primitives.
    pub primitive: PrimitiveType,
    /// Vertex stream 0.
    pub vertex_buffer: BufferHandle,
    /// Size of one vertex in bytes.
    pub vertex_stride: u32,
    /// 32-bit index buffer.
    pub index_buffer: BufferHandle,
    /// Lowest vertex index referenced by the draw.
    pub min_vertex: u32,
    /// Number of vertices spanned by the draw, starting at `min_vertex`.
    pub vertex_count: u32,
    /// First index to read.
    pub start_index: u32,
    /// Number of primitives to assemble.
    pub primitive_count: u32,
}

impl IndexedDraw {
    /// Number of indices read by this draw.
    pub fn index_count(&self) -> u32 {
        self.primitive_count * self.primitive.indices_per_primitive()
    }
}
