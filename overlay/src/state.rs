//! Fixed-function pipeline state applied before the overlay draws.

use std::cell::OnceCell;

use navoverlay_graphics::{
    BlendFactor, BlendOperation, CompareFunction, CullMode, DeviceCapabilities,
    FixedFunctionDevice, MAX_TEXTURE_STAGES, RenderState, SamplerState, StencilOperation,
    TextureArg, TextureFilter, TextureOp, TextureStageState,
};
use serde::{Deserialize, Serialize};

/// Combiner settings of one texture stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureStageConfig {
    pub color_op: TextureOp,
    pub color_arg1: TextureArg,
    pub color_arg2: TextureArg,
    pub alpha_op: TextureOp,
    pub alpha_arg1: TextureArg,
    pub alpha_arg2: TextureArg,
    /// Packed ARGB.
    pub constant: u32,
}

impl TextureStageConfig {
    /// Device reset values of stage 0.
    pub const fn first_stage() -> Self {
        Self {
            color_op: TextureOp::Modulate,
            color_arg1: TextureArg::Texture,
            color_arg2: TextureArg::Current,
            alpha_op: TextureOp::SelectArg1,
            alpha_arg1: TextureArg::Texture,
            alpha_arg2: TextureArg::Current,
            constant: 0,
        }
    }

    /// Device reset values of stages 1 and up.
    pub const fn disabled() -> Self {
        Self {
            color_op: TextureOp::Disable,
            alpha_op: TextureOp::Disable,
            ..Self::first_stage()
        }
    }

    fn apply(&self, device: &mut dyn FixedFunctionDevice, stage: u32) {
        device.set_texture_stage_state(stage, TextureStageState::ColorOp(self.color_op));
        device.set_texture_stage_state(stage, TextureStageState::ColorArg1(self.color_arg1));
        device.set_texture_stage_state(stage, TextureStageState::ColorArg2(self.color_arg2));
        device.set_texture_stage_state(stage, TextureStageState::AlphaOp(self.alpha_op));
        device.set_texture_stage_state(stage, TextureStageState::AlphaArg1(self.alpha_arg1));
        device.set_texture_stage_state(stage, TextureStageState::AlphaArg2(self.alpha_arg2));
        device.set_texture_stage_state(stage, TextureStageState::Constant(self.constant));
    }
}

impl Default for TextureStageConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Device capabilities captured on first use.
///
/// Never serialized and ignored by comparisons.
#[derive(Debug, Clone, Default)]
pub(crate) struct CapabilityCache(OnceCell<DeviceCapabilities>);

impl CapabilityCache {
    pub(crate) fn get(&self) -> Option<&DeviceCapabilities> {
        self.0.get()
    }

    fn get_or_query(&self, device: &dyn FixedFunctionDevice) -> &DeviceCapabilities {
        self.0.get_or_init(|| {
            let caps = device.capabilities();
            log::debug!("captured capabilities of {}: {:?}", device.name(), caps);
            caps
        })
    }
}

impl PartialEq for CapabilityCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

/// Editable fixed-function state, applied as a whole before the overlay draws.
///
/// Defaults are the device reset values. The capability snapshot is taken
/// from the first device passed to [`apply_state`](Self::apply_state) and is
/// only used by the debug UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineStateConfig {
    pub cull_mode: CullMode,
    pub lighting: bool,

    pub z_enable: bool,
    pub z_write_enable: bool,
    pub z_func: CompareFunction,

    pub alpha_blend_enable: bool,
    pub blend_op: BlendOperation,
    pub src_blend: BlendFactor,
    pub dest_blend: BlendFactor,

    pub scissor_test_enable: bool,
    pub clipping: bool,

    pub alpha_test_enable: bool,
    pub alpha_func: CompareFunction,
    pub alpha_ref: u8,

    pub stencil_enable: bool,
    pub stencil_fail: StencilOperation,
    pub stencil_z_fail: StencilOperation,
    pub stencil_pass: StencilOperation,
    pub stencil_func: CompareFunction,
    pub stencil_ref: u32,
    pub stencil_mask: u32,
    pub stencil_write_mask: u32,

    pub texture_stages: [TextureStageConfig; MAX_TEXTURE_STAGES],

    #[serde(skip)]
    pub(crate) caps: CapabilityCache,
}

impl Default for PipelineStateConfig {
    fn default() -> Self {
        let mut texture_stages = [TextureStageConfig::disabled(); MAX_TEXTURE_STAGES];
        texture_stages[0] = TextureStageConfig::first_stage();

        Self {
            cull_mode: CullMode::CounterClockwise,
            lighting: true,
            z_enable: true,
            z_write_enable: true,
            z_func: CompareFunction::LessEqual,
            alpha_blend_enable: false,
            blend_op: BlendOperation::Add,
            src_blend: BlendFactor::One,
            dest_blend: BlendFactor::Zero,
            scissor_test_enable: false,
            clipping: true,
            alpha_test_enable: false,
            alpha_func: CompareFunction::Always,
            alpha_ref: 0,
            stencil_enable: false,
            stencil_fail: StencilOperation::Keep,
            stencil_z_fail: StencilOperation::Keep,
            stencil_pass: StencilOperation::Keep,
            stencil_func: CompareFunction::Always,
            stencil_ref: 0,
            stencil_mask: 0xffff_ffff,
            stencil_write_mask: 0xffff_ffff,
            texture_stages,
            caps: CapabilityCache::default(),
        }
    }
}

impl PipelineStateConfig {
    /// Push every field to the device.
    ///
    /// The same field values always produce the same device state; nothing is
    /// toggled or accumulated between calls.
    pub fn apply_state(&self, device: &mut dyn FixedFunctionDevice) {
        self.caps.get_or_query(device);

        device.set_render_state(RenderState::CullMode(self.cull_mode));
        device.set_render_state(RenderState::Lighting(self.lighting));

        device.set_render_state(RenderState::ZEnable(self.z_enable));
        device.set_render_state(RenderState::ZWriteEnable(self.z_write_enable));
        device.set_render_state(RenderState::ZFunc(self.z_func));

        device.set_render_state(RenderState::AlphaBlendEnable(self.alpha_blend_enable));
        device.set_render_state(RenderState::BlendOp(self.blend_op));
        device.set_render_state(RenderState::SrcBlend(self.src_blend));
        device.set_render_state(RenderState::DestBlend(self.dest_blend));

        device.set_render_state(RenderState::ScissorTestEnable(self.scissor_test_enable));
        device.set_render_state(RenderState::Clipping(self.clipping));

        device.set_render_state(RenderState::AlphaTestEnable(self.alpha_test_enable));
        device.set_render_state(RenderState::AlphaFunc(self.alpha_func));
        device.set_render_state(RenderState::AlphaRef(self.alpha_ref));

        device.set_render_state(RenderState::StencilEnable(self.stencil_enable));
        device.set_render_state(RenderState::StencilFail(self.stencil_fail));
        device.set_render_state(RenderState::StencilZFail(self.stencil_z_fail));
        device.set_render_state(RenderState::StencilPass(self.stencil_pass));
        device.set_render_state(RenderState::StencilFunc(self.stencil_func));
        device.set_render_state(RenderState::StencilRef(self.stencil_ref));
        device.set_render_state(RenderState::StencilMask(self.stencil_mask));
        device.set_render_state(RenderState::StencilWriteMask(self.stencil_write_mask));

        for (stage, config) in self.texture_stages.iter().enumerate() {
            config.apply(device, stage as u32);
        }
    }

    /// Capabilities captured by the first [`apply_state`](Self::apply_state).
    pub fn capabilities(&self) -> Option<&DeviceCapabilities> {
        self.caps.get()
    }
}

/// The state the overlay draws with when the state editor is off.
///
/// Alpha blended, depth tested and written, clockwise faces culled, vertex
/// colour only, with every texture stage past the first disabled.
pub fn apply_default_overlay_state(device: &mut dyn FixedFunctionDevice) {
    device.set_render_state(RenderState::AlphaBlendEnable(true));
    device.set_render_state(RenderState::BlendOp(BlendOperation::Add));
    device.set_render_state(RenderState::SrcBlend(BlendFactor::SrcAlpha));
    device.set_render_state(RenderState::DestBlend(BlendFactor::InvSrcAlpha));

    device.set_render_state(RenderState::AlphaTestEnable(true));
    device.set_render_state(RenderState::AlphaRef(0));
    device.set_render_state(RenderState::AlphaFunc(CompareFunction::Always));

    device.set_render_state(RenderState::ZEnable(true));
    device.set_render_state(RenderState::ZFunc(CompareFunction::LessEqual));
    device.set_render_state(RenderState::ZWriteEnable(true));

    device.set_render_state(RenderState::CullMode(CullMode::Clockwise));
    device.set_render_state(RenderState::Lighting(false));
    device.set_render_state(RenderState::ScissorTestEnable(true));

    device.set_render_state(RenderState::StencilEnable(false));

    device.set_texture_stage_state(0, TextureStageState::AlphaOp(TextureOp::Modulate));
    device.set_texture_stage_state(0, TextureStageState::AlphaArg1(TextureArg::Texture));
    device.set_texture_stage_state(0, TextureStageState::AlphaArg2(TextureArg::Diffuse));

    device.set_texture_stage_state(0, TextureStageState::ColorOp(TextureOp::SelectArg1));
    device.set_texture_stage_state(0, TextureStageState::ColorArg1(TextureArg::Diffuse));
    device.set_texture_stage_state(0, TextureStageState::ColorArg2(TextureArg::Current));

    for stage in 1..MAX_TEXTURE_STAGES as u32 {
        device.set_texture_stage_state(stage, TextureStageState::AlphaOp(TextureOp::Disable));
        device.set_texture_stage_state(stage, TextureStageState::ColorOp(TextureOp::Disable));
    }
}

/// Bind the fixed-function pipeline and the overlay's sampler settings.
pub(crate) fn bind_fixed_function(device: &mut dyn FixedFunctionDevice) {
    device.set_fixed_function_pipeline();
    device.set_sampler_state(0, SamplerState::MinFilter(TextureFilter::Anisotropic));
    device.set_sampler_state(0, SamplerState::MagFilter(TextureFilter::Anisotropic));
}
