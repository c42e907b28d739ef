//! Fixed-function pipeline state.
//!
//! Every state the overlay pushes to the device is one variant of
//! [`RenderState`], [`TextureStageState`] or [`SamplerState`]. The value enums
//! carry the complete value sets of a D3D9-class fixed-function device so the
//! debug editor can offer every option, and each exposes an `ALL` table plus a
//! display name for combo boxes.

use serde::{Deserialize, Serialize};

/// Number of texture stages in the fixed-function combiner.
pub const MAX_TEXTURE_STAGES: usize = 8;

macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal, )+
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every value, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Human-readable name for UI.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

state_enum! {
    /// Which triangle winding is culled.
    pub enum CullMode {
        /// Draw both faces.
        None => "None",
        /// Cull clockwise faces.
        Clockwise => "CW",
        /// Cull counter-clockwise faces.
        CounterClockwise => "CCW",
    }
    default = CounterClockwise;
}

state_enum! {
    /// Comparison used by depth, alpha and stencil tests.
    pub enum CompareFunction {
        Never => "Never",
        Less => "Less",
        Equal => "Equal",
        LessEqual => "Less Equal",
        Greater => "Greater",
        NotEqual => "Not Equal",
        GreaterEqual => "Greater Equal",
        Always => "Always",
    }
    default = Always;
}

state_enum! {
    /// Blend operation for combining source and destination.
    pub enum BlendOperation {
        /// source + destination
        Add => "Add",
        /// source - destination
        Subtract => "Subtract",
        /// destination - source
        ReverseSubtract => "Reverse Subtract",
        /// min(source, destination)
        Min => "Minimum",
        /// max(source, destination)
        Max => "Maximum",
    }
    default = Add;
}

state_enum! {
    /// Blend factor applied to source or destination.
    pub enum BlendFactor {
        Zero => "Zero",
        One => "One",
        SrcColor => "Source Color",
        InvSrcColor => "Inverse Source Color",
        SrcAlpha => "Source Alpha",
        InvSrcAlpha => "Inverse Source Alpha",
        DestAlpha => "Dest Alpha",
        InvDestAlpha => "Inverse Dest Alpha",
        DestColor => "Dest Color",
        InvDestColor => "Inverse Dest Color",
        SrcAlphaSat => "Source Alpha Saturation",
        BothSrcAlpha => "Both Source Alpha",
        BothInvSrcAlpha => "Both Inverse Source Alpha",
        BlendFactor => "Blend Factor",
        InvBlendFactor => "Inverse Blend Factor",
        SrcColor2 => "Source Color 2",
        InvSrcColor2 => "Inverse Source Color 2",
    }
    default = One;
}

state_enum! {
    /// Stencil buffer update operation.
    pub enum StencilOperation {
        Keep => "Keep",
        Zero => "Zero",
        Replace => "Replace",
        IncrementSaturate => "Incrsat",
        DecrementSaturate => "Decrsat",
        Invert => "Invert",
        Increment => "Increase",
        Decrement => "Decrease",
    }
    default = Keep;
}

state_enum! {
    /// Texture stage combiner operation.
    pub enum TextureOp {
        Disable => "Disable",
        SelectArg1 => "Select Arg 1",
        SelectArg2 => "Select Arg 2",
        Modulate => "Modulate",
        Modulate2x => "Modulate 2x",
        Modulate4x => "Modulate 4x",
        Add => "Add",
        AddSigned => "Add Signed",
        AddSigned2x => "Add Signed 2x",
        Subtract => "Subtract",
        AddSmooth => "Add Smooth",
        BlendDiffuseAlpha => "Blend Diffuse Alpha",
        BlendTextureAlpha => "Blend Texture Alpha",
        BlendFactorAlpha => "Blend Factor Alpha",
        BlendTextureAlphaPm => "Blend Texture Alpha PM",
        BlendCurrentAlpha => "Blend Current Alpha",
        Premodulate => "Premodulate",
        ModulateAlphaAddColor => "Modulate Alpha Add Color",
        ModulateColorAddAlpha => "Modulate Color Add Alpha",
        ModulateInvAlphaAddColor => "Modulate Inv Alpha Add Color",
        ModulateInvColorAddAlpha => "Modulate Inv Color Add Alpha",
        BumpEnvMap => "Bump Env Map",
        BumpEnvMapLuminance => "Bump Env Map Luminance",
        DotProduct3 => "Dot Product 3",
        MultiplyAdd => "Multiply Add",
        Lerp => "Lerp",
    }
    default = Disable;
}

state_enum! {
    /// Texture stage combiner argument.
    pub enum TextureArg {
        Constant => "Constant",
        Current => "Current",
        Diffuse => "Diffuse",
        SelectMask => "Select Mask",
        Specular => "Specular",
        Temp => "Temp",
        Texture => "Texture",
        TFactor => "Texture Factor",
    }
    default = Current;
}

state_enum! {
    /// Texture sampling filter.
    pub enum TextureFilter {
        None => "None",
        Point => "Point",
        Linear => "Linear",
        Anisotropic => "Anisotropic",
        PyramidalQuad => "Pyramidal Quad",
        GaussianQuad => "Gaussian Quad",
    }
    default = Point;
}

/// A single device-global render state assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderState {
    CullMode(CullMode),
    Lighting(bool),
    ZEnable(bool),
    ZWriteEnable(bool),
    ZFunc(CompareFunction),
    AlphaBlendEnable(bool),
    BlendOp(BlendOperation),
    SrcBlend(BlendFactor),
    DestBlend(BlendFactor),
    ScissorTestEnable(bool),
    Clipping(bool),
    AlphaTestEnable(bool),
    AlphaFunc(CompareFunction),
    AlphaRef(u8),
    StencilEnable(bool),
    StencilFail(StencilOperation),
    StencilZFail(StencilOperation),
    StencilPass(StencilOperation),
    StencilFunc(CompareFunction),
    StencilRef(u32),
    StencilMask(u32),
    StencilWriteMask(u32),
    /// Rasterized size of point primitives, in pixels.
    PointSize(f32),
}

/// A single per-stage texture combiner assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureStageState {
    ColorOp(TextureOp),
    ColorArg1(TextureArg),
    ColorArg2(TextureArg),
    AlphaOp(TextureOp),
    AlphaArg1(TextureArg),
    AlphaArg2(TextureArg),
    /// Per-stage constant color, packed ARGB.
    Constant(u32),
}

/// A single per-sampler assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerState {
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
    MipFilter(TextureFilter),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_tables_are_complete() {
        assert_eq!(CullMode::ALL.len(), 3);
        assert_eq!(CompareFunction::ALL.len(), 8);
        assert_eq!(BlendOperation::ALL.len(), 5);
        assert_eq!(BlendFactor::ALL.len(), 17);
        assert_eq!(StencilOperation::ALL.len(), 8);
        assert_eq!(TextureOp::ALL.len(), 26);
        assert_eq!(TextureArg::ALL.len(), 8);
    }

    #[test]
    fn test_names() {
        assert_eq!(CullMode::Clockwise.name(), "CW");
        assert_eq!(BlendFactor::InvSrcAlpha.to_string(), "Inverse Source Alpha");
        assert_eq!(StencilOperation::IncrementSaturate.name(), "Incrsat");
    }

    #[test]
    fn test_defaults_match_device_reset_values() {
        assert_eq!(CullMode::default(), CullMode::CounterClockwise);
        assert_eq!(BlendFactor::default(), BlendFactor::One);
        assert_eq!(BlendOperation::default(), BlendOperation::Add);
        assert_eq!(StencilOperation::default(), StencilOperation::Keep);
    }
}
