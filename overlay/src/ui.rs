//! The "NavMesh" debug window.

use navoverlay_debug_drawer::Topology;
use navoverlay_navmesh::NavMeshDrawFlags;

use crate::overlay::NavMeshOverlay;

const DRAW_FLAG_LABELS: [(NavMeshDrawFlags, &str); 4] = [
    (NavMeshDrawFlags::OFF_MESH_CONNECTIONS, "Off-Mesh Connections"),
    (NavMeshDrawFlags::CLOSED_LIST, "Closed List"),
    (NavMeshDrawFlags::COLOR_TILES, "Color Tiles"),
    (NavMeshDrawFlags::TILE_BOUNDS, "Tile Bounds"),
];

impl NavMeshOverlay {
    /// Show the overlay controls in their own window.
    pub fn show_ui(&mut self, ctx: &egui::Context) {
        egui::Window::new("NavMesh").show(ctx, |ui| {
            self.show_ui_contents(ui);
        });
    }

    /// Overlay controls, for embedding in a host panel.
    pub fn show_ui_contents(&mut self, ui: &mut egui::Ui) {
        let mut enabled = self.is_enabled();
        if ui.checkbox(&mut enabled, "Enabled").changed() {
            self.set_enabled(enabled);
        }

        ui.horizontal(|ui| {
            ui.label("State");
            ui.label(format!("{:?}", self.state()));
        });
        ui.horizontal(|ui| {
            ui.label("Rebuilds");
            ui.label(self.rebuild_count().to_string());
        });

        egui::CollapsingHeader::new("Primitives")
            .default_open(true)
            .show(ui, |ui| {
                for topology in Topology::ALL {
                    let mut on = self.batch_group().is_enabled(topology);
                    if ui.checkbox(&mut on, topology.name()).changed() {
                        self.set_topology_enabled(topology, on);
                    }
                }
            });

        egui::CollapsingHeader::new("Layers").show(ui, |ui| {
            let mut flags = self.draw_flags();
            for (flag, label) in DRAW_FLAG_LABELS {
                let mut on = flags.contains(flag);
                if ui.checkbox(&mut on, label).changed() {
                    flags.set(flag, on);
                }
            }
            self.set_draw_flags(flags);
        });

        egui::CollapsingHeader::new("Batches").show(ui, |ui| {
            for topology in Topology::ALL {
                self.batch_group_mut()
                    .batch_mut(topology)
                    .show_debug_ui(ui);
            }
        });

        let mut use_state_editor = self.use_state_editor();
        if ui.checkbox(&mut use_state_editor, "Modify State").changed() {
            self.set_use_state_editor(use_state_editor);
        }
        if self.use_state_editor() {
            self.pipeline_state_mut().show_debug_ui(ui);
        }
    }
}
