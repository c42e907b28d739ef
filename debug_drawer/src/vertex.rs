/// A debug geometry vertex: position, packed color and texture coordinate.
///
/// Matches the `XYZ | DIFFUSE | TEX1` fixed-function vertex format, so the
/// CPU-side vector is uploaded byte for byte.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Packed ARGB, 8 bits per channel.
    pub color: u32,
    pub uv: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes.
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;

    pub fn new(position: [f32; 3], color: u32, uv: [f32; 2]) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }
}
