use navoverlay_graphics::{FixedFunctionDevice, GraphicsError, RenderPhase};

use crate::batch::GeometryBatch;
use crate::error::{DrawProtocolError, violation};
use crate::topology::Topology;

/// One [`GeometryBatch`] per [`Topology`], with a single open batch at a time.
///
/// `begin` / `add_vertex` / `end` are routed to the batch opened by the last
/// `begin`. Rendering walks the batches in [`Topology::ALL`] order, so
/// triangles are drawn before quads.
pub struct BatchGroup {
    batches: [GeometryBatch; Topology::COUNT],
    enabled: [bool; Topology::COUNT],
    current: Option<Topology>,
}

impl BatchGroup {
    /// Create a group with one empty, enabled batch per topology.
    pub fn new() -> Self {
        Self {
            batches: Topology::ALL.map(GeometryBatch::new),
            enabled: [true; Topology::COUNT],
            current: None,
        }
    }

    /// The batch collecting `topology`.
    pub fn batch(&self, topology: Topology) -> &GeometryBatch {
        &self.batches[topology.index()]
    }

    /// Mutable access to the batch collecting `topology`.
    pub fn batch_mut(&mut self, topology: Topology) -> &mut GeometryBatch {
        &mut self.batches[topology.index()]
    }

    /// Every batch, in render order.
    pub fn batches(&self) -> impl Iterator<Item = &GeometryBatch> {
        self.batches.iter()
    }

    /// The topology of the currently open batch.
    pub fn current(&self) -> Option<Topology> {
        self.current
    }

    /// Whether `topology` is drawn.
    pub fn is_enabled(&self, topology: Topology) -> bool {
        self.enabled[topology.index()]
    }

    /// Enable or disable drawing of one topology. Takes effect on the next render.
    pub fn set_enabled(&mut self, topology: Topology, enabled: bool) {
        self.enabled[topology.index()] = enabled;
    }

    /// Set the z-up swizzle on every batch.
    pub fn set_eq_coords(&mut self, eq_coords: bool) {
        for batch in &mut self.batches {
            batch.set_eq_coords(eq_coords);
        }
    }

    /// Whether any batch holds geometry.
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(GeometryBatch::is_empty)
    }

    /// Reset every batch and drop any open batch.
    pub fn reset(&mut self) {
        for batch in &mut self.batches {
            batch.reset();
        }
        self.current = None;
    }

    /// Open a run on the `topology` batch.
    pub fn begin(&mut self, topology: Topology, size: f32) -> Result<(), DrawProtocolError> {
        if let Some(open) = self.current {
            return Err(violation(DrawProtocolError::NestedBegin(open)));
        }
        self.batches[topology.index()].begin(size)?;
        self.current = Some(topology);
        Ok(())
    }

    /// Append a vertex to the open batch.
    pub fn add_vertex(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        color: u32,
        u: f32,
        v: f32,
    ) -> Result<(), DrawProtocolError> {
        let Some(topology) = self.current else {
            return Err(violation(DrawProtocolError::NoOpenBatch));
        };
        self.batches[topology.index()].add_vertex(x, y, z, color, u, v)
    }

    /// Close the open batch's run.
    pub fn end(&mut self) -> Result<(), DrawProtocolError> {
        let Some(topology) = self.current.take() else {
            return Err(violation(DrawProtocolError::NoOpenBatch));
        };
        self.batches[topology.index()].end()
    }

    /// Allocate device buffers for every batch with content.
    ///
    /// Every batch is attempted; the first failure is returned.
    pub fn create_device_objects(
        &mut self,
        device: &mut dyn FixedFunctionDevice,
    ) -> Result<(), GraphicsError> {
        let mut result = Ok(());
        for batch in &mut self.batches {
            if let Err(err) = batch.create_device_objects(device) {
                log::warn!("{} batch: failed to create device objects: {err}", batch.topology());
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// Release the device buffers of every batch.
    pub fn invalidate_device_objects(&mut self, device: &mut dyn FixedFunctionDevice) {
        for batch in &mut self.batches {
            batch.invalidate_device_objects(device);
        }
    }

    /// Draw every enabled batch. Phases other than [`RenderPhase::Geometry`]
    /// draw nothing. Returns the number of draw calls issued.
    pub fn render(&mut self, device: &mut dyn FixedFunctionDevice, phase: RenderPhase) -> usize {
        if phase != RenderPhase::Geometry {
            return 0;
        }
        if let Some(open) = self.current {
            log::warn!("rendering while the {open} batch is still open");
        }

        let mut draws = 0;
        for (batch, enabled) in self.batches.iter_mut().zip(self.enabled) {
            if enabled {
                draws += batch.render(device);
            }
        }
        draws
    }
}

impl Default for BatchGroup {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navoverlay_graphics::{PrimitiveType, RecordingDevice};

    fn triangle(group: &mut BatchGroup) {
        group.begin(Topology::Triangles, 1.0).unwrap();
        for i in 0..3 {
            group.add_vertex(i as f32, 0.0, 1.0, 0xff00_00ff, 0.0, 0.0).unwrap();
        }
        group.end().unwrap();
    }

    #[test]
    fn test_routes_to_current_batch() {
        let mut group = BatchGroup::new();
        triangle(&mut group);

        assert_eq!(group.batch(Topology::Triangles).index_count(), 3);
        assert!(group.batch(Topology::Points).is_empty());
        assert_eq!(group.current(), None);
    }

    #[test]
    fn test_render_order_and_enable_flags() {
        let mut device = RecordingDevice::new();
        let mut group = BatchGroup::new();

        group.begin(Topology::Quads, 1.0).unwrap();
        for _ in 0..4 {
            group.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
        }
        group.end().unwrap();
        triangle(&mut group);
        group.begin(Topology::Lines, 2.0).unwrap();
        group.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
        group.add_vertex(1.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
        group.end().unwrap();

        assert_eq!(group.render(&mut device, RenderPhase::Geometry), 3);
        let kinds: Vec<_> = device.draws().iter().map(|d| d.primitive).collect();
        assert_eq!(
            kinds,
            vec![
                PrimitiveType::LineList,
                PrimitiveType::TriangleList,
                PrimitiveType::TriangleList
            ]
        );

        device.clear_draws();
        group.set_enabled(Topology::Lines, false);
        assert_eq!(group.render(&mut device, RenderPhase::Geometry), 2);

        group.invalidate_device_objects(&mut device);
        assert_eq!(device.live_buffer_count(), 0);
    }

    #[test]
    fn test_overlay_phase_draws_nothing() {
        let mut device = RecordingDevice::new();
        let mut group = BatchGroup::new();
        triangle(&mut group);

        assert_eq!(group.render(&mut device, RenderPhase::Overlay), 0);
        assert_eq!(device.live_buffer_count(), 0);
    }
}
