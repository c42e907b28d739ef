//! Graphics device.
//!
//! The [`FixedFunctionDevice`] is the interface through which the overlay
//! consumes the host's device. The host owns the device; the overlay only
//! creates and releases its own buffers on it and pushes pipeline state before
//! drawing.

use crate::error::GraphicsError;
use crate::types::{
    BufferDescriptor, BufferHandle, IndexedDraw, RenderState, SamplerState, TextureStageState,
};

/// Capabilities of a graphics device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceCapabilities {
    /// Number of texture stages the combiner supports.
    pub max_texture_stages: u32,
    /// Largest point size the rasterizer accepts.
    pub max_point_size: f32,
    /// Maximum number of primitives in one draw call.
    pub max_primitive_count: u32,
    /// Maximum buffer size.
    pub max_buffer_size: u64,
    /// Whether texture stages accept a per-stage constant color.
    pub per_stage_constant: bool,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_texture_stages: 8,
            max_point_size: 256.0,
            max_primitive_count: 0x00ff_ffff,
            max_buffer_size: 1 << 28, // 256 MB
            per_stage_constant: true,
        }
    }
}

/// A fixed-function graphics device supplied by the host.
///
/// All calls happen on the host's render thread. Buffers created through the
/// device must be released before the host resets it.
///
/// # Example
///
/// ```ignore
/// let vb = device.create_buffer(
///     &BufferDescriptor::new(1024, BufferUsage::VERTEX).with_label("navmesh_vb"),
/// )?;
/// device.write_buffer(vb, 0, bytemuck::cast_slice(&vertices))?;
/// device.set_render_state(RenderState::ZEnable(true));
/// device.draw_indexed(&draw)?;
/// device.release_buffer(vb);
/// ```
pub trait FixedFunctionDevice {
    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Query the device capabilities.
    fn capabilities(&self) -> DeviceCapabilities;

    /// Whether the device is currently lost and awaiting a reset.
    fn is_lost(&self) -> bool;

    /// Allocate a device-resident buffer.
    ///
    /// # Errors
    ///
    /// Returns [`GraphicsError::OutOfMemory`] when the allocation cannot be
    /// satisfied and [`GraphicsError::DeviceLost`] while the device is lost.
    fn create_buffer(&mut self, descriptor: &BufferDescriptor)
    -> Result<BufferHandle, GraphicsError>;

    /// Release a buffer previously returned by [`create_buffer`](Self::create_buffer).
    fn release_buffer(&mut self, buffer: BufferHandle);

    /// Copy `data` into `buffer` at byte `offset`.
    fn write_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), GraphicsError>;

    /// Unbind any programmable shaders so the fixed-function pipeline is used.
    fn set_fixed_function_pipeline(&mut self);

    /// Assign one render state.
    fn set_render_state(&mut self, state: RenderState);

    /// Assign one texture stage state.
    fn set_texture_stage_state(&mut self, stage: u32, state: TextureStageState);

    /// Assign one sampler state.
    fn set_sampler_state(&mut self, sampler: u32, state: SamplerState);

    /// Issue an indexed draw with the current state.
    fn draw_indexed(&mut self, draw: &IndexedDraw) -> Result<(), GraphicsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capabilities() {
        let caps = DeviceCapabilities::default();
        assert_eq!(caps.max_texture_stages, 8);
        assert!(caps.per_stage_constant);
        assert!(caps.max_buffer_size > 0);
    }
}
