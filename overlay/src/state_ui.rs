//! egui editor for [`PipelineStateConfig`].

use std::fmt::Display;
use std::hash::Hash;

use navoverlay_graphics::{
    BlendFactor, BlendOperation, CompareFunction, CullMode, DeviceCapabilities,
    MAX_TEXTURE_STAGES, StencilOperation, TextureArg, TextureOp,
};

use crate::state::{PipelineStateConfig, TextureStageConfig};

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

/// Combo box over a value table. Returns `true` if changed.
fn combo<T: Copy + PartialEq + Display>(
    ui: &mut egui::Ui,
    id_salt: impl Hash,
    label: &str,
    value: &mut T,
    all: &[T],
) -> bool {
    let mut changed = false;
    egui::ComboBox::new(id_salt, label)
        .selected_text(value.to_string())
        .show_ui(ui, |ui| {
            for &option in all {
                changed |= ui
                    .selectable_value(value, option, option.to_string())
                    .changed();
            }
        });
    changed
}

fn hex_value(ui: &mut egui::Ui, label: &str, value: &mut u32) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).hexadecimal(8, false, true))
            .changed()
    })
    .inner
}

fn argb_to_rgba(color: u32) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), channel(24)]
}

fn rgba_to_argb(color: [f32; 4]) -> u32 {
    let byte = |c: f32| u32::from((c.clamp(0.0, 1.0) * 255.0).round() as u8);
    byte(color[3]) << 24 | byte(color[0]) << 16 | byte(color[1]) << 8 | byte(color[2])
}

/// Editor controls the device can honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExposedControls {
    texture_stages: usize,
    constant_color: bool,
}

impl ExposedControls {
    /// Everything is shown until capabilities have been captured.
    fn for_capabilities(caps: Option<&DeviceCapabilities>) -> Self {
        match caps {
            Some(caps) => Self {
                texture_stages: (caps.max_texture_stages as usize).min(MAX_TEXTURE_STAGES),
                constant_color: caps.per_stage_constant,
            },
            None => Self {
                texture_stages: MAX_TEXTURE_STAGES,
                constant_color: true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

impl PipelineStateConfig {
    /// Edit every field. Returns `true` if anything changed.
    pub fn show_debug_ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        let exposed = ExposedControls::for_capabilities(self.capabilities());

        egui::CollapsingHeader::new("Render States")
            .default_open(true)
            .show(ui, |ui| {
                changed |= self.show_render_states(ui);
            });

        egui::CollapsingHeader::new("Texture Stage State")
            .default_open(false)
            .show(ui, |ui| {
                let stages = self.texture_stages.iter_mut().take(exposed.texture_stages);
                for (stage, config) in stages.enumerate() {
                    changed |= show_texture_stage(ui, stage, config, exposed.constant_color);
                }
            });

        egui::CollapsingHeader::new("Capabilities")
            .default_open(false)
            .show(ui, |ui| match self.capabilities() {
                Some(caps) => {
                    ui.label(format!("Texture Stages: {}", caps.max_texture_stages));
                    ui.label(format!("Max Point Size: {:.1}", caps.max_point_size));
                    ui.label(format!("Max Primitives: {}", caps.max_primitive_count));
                    ui.label(format!(
                        "Supports Constant: {}",
                        caps.per_stage_constant
                    ));
                }
                None => {
                    ui.weak("(not captured yet)");
                }
            });

        changed
    }

    fn show_render_states(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;

        egui::CollapsingHeader::new("Alpha Blending").show(ui, |ui| {
            changed |= ui.checkbox(&mut self.alpha_blend_enable, "Enabled").changed();
            changed |= combo(ui, "blend_op", "Blend Op", &mut self.blend_op, BlendOperation::ALL);
            changed |= combo(ui, "src_blend", "Source", &mut self.src_blend, BlendFactor::ALL);
            changed |= combo(ui, "dest_blend", "Dest", &mut self.dest_blend, BlendFactor::ALL);
        });

        egui::CollapsingHeader::new("Alpha Testing").show(ui, |ui| {
            changed |= ui.checkbox(&mut self.alpha_test_enable, "Enabled").changed();
            changed |= combo(
                ui,
                "alpha_func",
                "Function",
                &mut self.alpha_func,
                CompareFunction::ALL,
            );
            changed |= ui
                .add(egui::Slider::new(&mut self.alpha_ref, 0..=255).text("Reference"))
                .changed();
        });

        egui::CollapsingHeader::new("Depth Buffer").show(ui, |ui| {
            changed |= ui.checkbox(&mut self.z_enable, "Enabled").changed();
            changed |= ui.checkbox(&mut self.z_write_enable, "Writeable").changed();
            changed |= combo(ui, "z_func", "Function", &mut self.z_func, CompareFunction::ALL);
        });

        egui::CollapsingHeader::new("Misc").show(ui, |ui| {
            changed |= combo(ui, "cull_mode", "Cull Mode", &mut self.cull_mode, CullMode::ALL);
            changed |= ui.checkbox(&mut self.lighting, "Lighting").changed();
            changed |= ui
                .checkbox(&mut self.scissor_test_enable, "Scissor Test")
                .changed();
            changed |= ui.checkbox(&mut self.clipping, "Clipping").changed();
        });

        egui::CollapsingHeader::new("Stencil Buffer").show(ui, |ui| {
            changed |= ui.checkbox(&mut self.stencil_enable, "Enabled").changed();
            changed |= combo(
                ui,
                "stencil_fail",
                "Fail",
                &mut self.stencil_fail,
                StencilOperation::ALL,
            );
            changed |= combo(
                ui,
                "stencil_z_fail",
                "Z Fail",
                &mut self.stencil_z_fail,
                StencilOperation::ALL,
            );
            changed |= combo(
                ui,
                "stencil_pass",
                "Pass",
                &mut self.stencil_pass,
                StencilOperation::ALL,
            );
            changed |= combo(
                ui,
                "stencil_func",
                "Function",
                &mut self.stencil_func,
                CompareFunction::ALL,
            );
            changed |= hex_value(ui, "Reference", &mut self.stencil_ref);
            changed |= hex_value(ui, "Mask", &mut self.stencil_mask);
            changed |= hex_value(ui, "Write Mask", &mut self.stencil_write_mask);
        });

        changed
    }
}

fn show_texture_stage(
    ui: &mut egui::Ui,
    stage: usize,
    config: &mut TextureStageConfig,
    constant_color: bool,
) -> bool {
    let mut changed = false;

    egui::CollapsingHeader::new(format!("Stage {stage}"))
        .id_salt(("texture_stage", stage))
        .show(ui, |ui| {
            changed |= combo(
                ui,
                ("color_op", stage),
                "Color Op",
                &mut config.color_op,
                TextureOp::ALL,
            );
            changed |= combo(
                ui,
                ("color_arg1", stage),
                "Color Arg 1",
                &mut config.color_arg1,
                TextureArg::ALL,
            );
            changed |= combo(
                ui,
                ("color_arg2", stage),
                "Color Arg 2",
                &mut config.color_arg2,
                TextureArg::ALL,
            );
            changed |= combo(
                ui,
                ("alpha_op", stage),
                "Alpha Op",
                &mut config.alpha_op,
                TextureOp::ALL,
            );
            changed |= combo(
                ui,
                ("alpha_arg1", stage),
                "Alpha Arg 1",
                &mut config.alpha_arg1,
                TextureArg::ALL,
            );
            changed |= combo(
                ui,
                ("alpha_arg2", stage),
                "Alpha Arg 2",
                &mut config.alpha_arg2,
                TextureArg::ALL,
            );

            if !constant_color {
                return;
            }
            let mut color = argb_to_rgba(config.constant);
            ui.horizontal(|ui| {
                ui.label("Constant Color");
                if ui.color_edit_button_rgba_unmultiplied(&mut color).changed() {
                    config.constant = rgba_to_argb(color);
                    changed = true;
                }
            });
        });

    changed
}
