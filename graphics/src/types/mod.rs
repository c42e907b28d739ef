//! Common types and descriptors for device resources and pipeline state.
//!
//! This module contains the fixed-function state enums, buffer usage flags,
//! and the descriptor structs used throughout the graphics system.

mod buffer;
mod draw;
mod state;

pub use buffer::{BufferDescriptor, BufferHandle, BufferUsage};
pub use draw::{IndexedDraw, PrimitiveType, RenderPhase};
pub use state::{
    BlendFactor, BlendOperation, CompareFunction, CullMode, MAX_TEXTURE_STAGES, RenderState,
    SamplerState, StencilOperation, TextureArg, TextureFilter, TextureOp, TextureStageState,
};
