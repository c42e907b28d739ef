//! egui debug controls for a [`GeometryBatch`].

use crate::batch::GeometryBatch;

impl GeometryBatch {
    /// Counts plus step-through controls over the recorded runs.
    pub fn show_debug_ui(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(self.topology().name())
            .id_salt(("geometry_batch", self.topology().index()))
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new(("batch_counts", self.topology().index()))
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Runs");
                        ui.label(self.run_count().to_string());
                        ui.end_row();
                        ui.label("Primitives");
                        ui.label(self.primitive_count().to_string());
                        ui.end_row();
                        ui.label("Vertices");
                        ui.label(self.vertex_count().to_string());
                        ui.end_row();
                        ui.label("Indices");
                        ui.label(self.index_count().to_string());
                        ui.end_row();
                    });

                if self.run_count() == 0 {
                    ui.weak("(empty)");
                    return;
                }

                let max = self.run_count() - 1;
                let (mut first, mut last) = self.visible_runs().unwrap_or((0, max));
                let mut changed = false;
                changed |= ui
                    .add(egui::Slider::new(&mut first, 0..=max).text("First run"))
                    .changed();
                changed |= ui
                    .add(egui::Slider::new(&mut last, 0..=max).text("Last run"))
                    .changed();
                if changed {
                    self.set_visible_runs(first, last.max(first));
                }

                let (first_index, last_index) = self.visible_range();
                if last_index == u32::MAX {
                    ui.weak(format!("indices {first_index}.."));
                } else {
                    ui.weak(format!("indices {first_index}..={last_index}"));
                }

                if ui.button("Show all").clicked() {
                    self.show_all();
                }
            });
    }
}
