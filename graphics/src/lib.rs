//! # Navoverlay Graphics
//!
//! Fixed-function device abstraction for drawing debug geometry inside a host
//! application's frame.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`FixedFunctionDevice`] - Trait for the host-supplied graphics device
//! - [`types`] - Render state, texture stage state and buffer descriptors
//! - [`RecordingDevice`] - Headless backend for tests and demos (`dummy` feature)
//!
//! The overlay never creates or destroys the device. It allocates its own
//! buffers on it, releases them around device loss, and pushes pipeline state
//! before drawing.

pub mod backend;
pub mod device;
pub mod error;
pub mod types;

// Re-export main types for convenience
#[cfg(feature = "dummy")]
pub use backend::{DeviceStateSnapshot, RecordingDevice};
pub use device::{DeviceCapabilities, FixedFunctionDevice};
pub use error::GraphicsError;
pub use types::{
    BlendFactor, BlendOperation, BufferDescriptor, BufferHandle, BufferUsage, CompareFunction,
    CullMode, IndexedDraw, MAX_TEXTURE_STAGES, PrimitiveType, RenderPhase, RenderState,
    SamplerState, StencilOperation, TextureArg, TextureFilter, TextureOp, TextureStageState,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
pub fn init() {
    log::info!("Navoverlay Graphics v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_recording_device() {
        let device = RecordingDevice::new();
        assert_eq!(device.name(), "Recording Device");
        assert!(!device.is_lost());
    }
}
