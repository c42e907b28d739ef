//! Recording backend for testing and development.
//!
//! This backend doesn't touch a GPU. It keeps the current value of every
//! state, the contents of every live buffer and a log of draw calls, and it
//! can simulate allocation failure, device loss and device reset.

use std::collections::HashMap;
use std::mem::{Discriminant, discriminant};

use crate::device::{DeviceCapabilities, FixedFunctionDevice};
use crate::error::GraphicsError;
use crate::types::{
    BufferDescriptor, BufferHandle, IndexedDraw, RenderState, SamplerState, TextureStageState,
};

struct RecordedBuffer {
    descriptor: BufferDescriptor,
    data: Vec<u8>,
}

/// The state-setting portion of a device, captured for comparison.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceStateSnapshot {
    render_states: HashMap<Discriminant<RenderState>, RenderState>,
    texture_stage_states: HashMap<(u32, Discriminant<TextureStageState>), TextureStageState>,
    sampler_states: HashMap<(u32, Discriminant<SamplerState>), SamplerState>,
    fixed_function: bool,
}

/// Headless [`FixedFunctionDevice`] that records everything it is asked to do.
pub struct RecordingDevice {
    name: String,
    capabilities: DeviceCapabilities,
    lost: bool,
    next_handle: u64,
    buffers: HashMap<BufferHandle, RecordedBuffer>,
    failing_allocations: u32,
    total_allocations: u64,
    state: DeviceStateSnapshot,
    draws: Vec<IndexedDraw>,
}

impl RecordingDevice {
    /// Create a new recording device with default capabilities.
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCapabilities::default())
    }

    /// Create a new recording device reporting the given capabilities.
    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        Self {
            name: "Recording Device".to_string(),
            capabilities,
            lost: false,
            next_handle: 1,
            buffers: HashMap::new(),
            failing_allocations: 0,
            total_allocations: 0,
            state: DeviceStateSnapshot::default(),
            draws: Vec::new(),
        }
    }

    /// Make the next `count` buffer allocations fail with [`GraphicsError::OutOfMemory`].
    pub fn fail_next_allocations(&mut self, count: u32) {
        self.failing_allocations = count;
    }

    /// Simulate the device being lost (e.g. the host window losing exclusive mode).
    pub fn lose_device(&mut self) {
        log::debug!("RecordingDevice: device lost");
        self.lost = true;
    }

    /// Reset the device after a loss.
    ///
    /// Like a D3D9 reset, this fails while any buffer created on the device is
    /// still alive. A successful reset returns every state to its default.
    pub fn reset(&mut self) -> Result<(), GraphicsError> {
        if !self.buffers.is_empty() {
            log::warn!(
                "RecordingDevice: reset refused, {} buffers still alive",
                self.buffers.len()
            );
            return Err(GraphicsError::ResourcesOutstanding(self.buffers.len()));
        }
        self.lost = false;
        self.state = DeviceStateSnapshot::default();
        log::debug!("RecordingDevice: device reset");
        Ok(())
    }

    /// Number of buffers currently alive.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of successful allocations over the device lifetime.
    pub fn total_allocations(&self) -> u64 {
        self.total_allocations
    }

    /// Handles of all live buffers, sorted.
    pub fn live_buffers(&self) -> Vec<BufferHandle> {
        let mut handles: Vec<_> = self.buffers.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Descriptor a live buffer was created with.
    pub fn buffer_descriptor(&self, buffer: BufferHandle) -> Option<&BufferDescriptor> {
        self.buffers.get(&buffer).map(|b| &b.descriptor)
    }

    /// Current contents of a live buffer.
    pub fn buffer_data(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|b| b.data.as_slice())
    }

    /// Draw calls issued since the last [`clear_draws`](Self::clear_draws).
    pub fn draws(&self) -> &[IndexedDraw] {
        &self.draws
    }

    /// Forget the recorded draw calls.
    pub fn clear_draws(&mut self) {
        self.draws.clear();
    }

    /// Whether the fixed-function pipeline is bound.
    pub fn is_fixed_function(&self) -> bool {
        self.state.fixed_function
    }

    /// Current value of the render state of the same kind as `probe`.
    ///
    /// ```ignore
    /// let cull = device.render_state(RenderState::CullMode(CullMode::None));
    /// ```
    pub fn render_state(&self, probe: RenderState) -> Option<RenderState> {
        self.state.render_states.get(&discriminant(&probe)).copied()
    }

    /// Current value of the texture stage state of the same kind as `probe`.
    pub fn texture_stage_state(
        &self,
        stage: u32,
        probe: TextureStageState,
    ) -> Option<TextureStageState> {
        self.state
            .texture_stage_states
            .get(&(stage, discriminant(&probe)))
            .copied()
    }

    /// Current value of the sampler state of the same kind as `probe`.
    pub fn sampler_state(&self, sampler: u32, probe: SamplerState) -> Option<SamplerState> {
        self.state
            .sampler_states
            .get(&(sampler, discriminant(&probe)))
            .copied()
    }

    /// Capture the current state assignments.
    pub fn state_snapshot(&self) -> DeviceStateSnapshot {
        self.state.clone()
    }

    fn check_range(&self, buffer: BufferHandle, offset: u64, len: u64) -> Result<(), GraphicsError> {
        let recorded = self
            .buffers
            .get(&buffer)
            .ok_or(GraphicsError::InvalidHandle(buffer.raw()))?;
        if offset + len > recorded.descriptor.size {
            return Err(GraphicsError::InvalidParameter(format!(
                "range {}..{} exceeds buffer {:?} of size {}",
                offset,
                offset + len,
                recorded.descriptor.label,
                recorded.descriptor.size
            )));
        }
        Ok(())
    }
}

// The recording device is handed across threads by test harnesses.
static_assertions::assert_impl_all!(RecordingDevice: Send, Sync);

impl Default for RecordingDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedFunctionDevice for RecordingDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn is_lost(&self) -> bool {
        self.lost
    }

    fn create_buffer(
        &mut self,
        descriptor: &BufferDescriptor,
    ) -> Result<BufferHandle, GraphicsError> {
        if self.lost {
            return Err(GraphicsError::DeviceLost);
        }
        if self.failing_allocations > 0 {
            self.failing_allocations -= 1;
            log::trace!(
                "RecordingDevice: simulated allocation failure for {:?}",
                descriptor.label
            );
            return Err(GraphicsError::OutOfMemory);
        }
        if descriptor.size == 0 {
            return Err(GraphicsError::InvalidParameter(
                "buffer size cannot be zero".to_string(),
            ));
        }
        if descriptor.size > self.capabilities.max_buffer_size {
            return Err(GraphicsError::InvalidParameter(format!(
                "buffer size {} exceeds maximum {}",
                descriptor.size, self.capabilities.max_buffer_size
            )));
        }

        let handle = BufferHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.total_allocations += 1;
        self.buffers.insert(
            handle,
            RecordedBuffer {
                descriptor: descriptor.clone(),
                data: vec![0u8; descriptor.size as usize],
            },
        );

        log::trace!(
            "RecordingDevice: created buffer {:?} (size: {})",
            descriptor.label,
            descriptor.size
        );
        Ok(handle)
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        match self.buffers.remove(&buffer) {
            Some(recorded) => {
                log::trace!("RecordingDevice: released buffer {:?}", recorded.descriptor.label)
            }
            None => log::warn!("RecordingDevice: release of unknown buffer {:?}", buffer),
        }
    }

    fn write_buffer(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), GraphicsError> {
        if self.lost {
            return Err(GraphicsError::DeviceLost);
        }
        self.check_range(buffer, offset, data.len() as u64)?;
        log::trace!(
            "RecordingDevice: write_buffer offset={} len={}",
            offset,
            data.len()
        );
        if let Some(recorded) = self.buffers.get_mut(&buffer) {
            let start = offset as usize;
            recorded.data[start..start + data.len()].copy_from_slice(data);
        }
        Ok(())
    }

    fn set_fixed_function_pipeline(&mut self) {
        self.state.fixed_function = true;
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.state
            .render_states
            .insert(discriminant(&state), state);
    }

    fn set_texture_stage_state(&mut self, stage: u32, state: TextureStageState) {
        if stage >= self.capabilities.max_texture_stages {
            log::warn!("RecordingDevice: texture stage {} out of range", stage);
            return;
        }
        self.state
            .texture_stage_states
            .insert((stage, discriminant(&state)), state);
    }

    fn set_sampler_state(&mut self, sampler: u32, state: SamplerState) {
        self.state
            .sampler_states
            .insert((sampler, discriminant(&state)), state);
    }

    fn draw_indexed(&mut self, draw: &IndexedDraw) -> Result<(), GraphicsError> {
        if self.lost {
            return Err(GraphicsError::DeviceLost);
        }
        if draw.primitive_count > self.capabilities.max_primitive_count {
            return Err(GraphicsError::InvalidParameter(format!(
                "primitive count {} exceeds maximum {}",
                draw.primitive_count, self.capabilities.max_primitive_count
            )));
        }
        let index_bytes = u64::from(draw.index_count()) * 4;
        self.check_range(draw.index_buffer, u64::from(draw.start_index) * 4, index_bytes)?;
        let vertex_bytes = u64::from(draw.vertex_count) * u64::from(draw.vertex_stride);
        self.check_range(
            draw.vertex_buffer,
            u64::from(draw.min_vertex) * u64::from(draw.vertex_stride),
            vertex_bytes,
        )?;

        log::trace!(
            "RecordingDevice: draw {:?} start_index={} primitives={}",
            draw.primitive,
            draw.start_index,
            draw.primitive_count
        );
        self.draws.push(*draw);
        Ok(())
    }
}
