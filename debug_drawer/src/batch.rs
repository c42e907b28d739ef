use navoverlay_graphics::{
    BufferDescriptor, BufferHandle, BufferUsage, FixedFunctionDevice, GraphicsError, IndexedDraw,
    RenderState,
};

use crate::error::{DrawProtocolError, violation};
use crate::topology::Topology;
use crate::vertex::Vertex;

/// One `begin`..`end` submission inside a [`GeometryBatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveRun {
    /// Position of the run's first index in the batch index buffer.
    pub start_index: u32,
    /// Number of indices in the run, always a multiple of the topology's
    /// indices per primitive.
    pub index_count: u32,
    /// First vertex referenced by the run.
    pub first_vertex: u32,
    /// Number of vertices referenced by the run.
    pub vertex_count: u32,
    /// Thickness / point size hint passed to `begin`.
    pub size: f32,
}

#[derive(Debug, Clone, Copy)]
struct OpenRun {
    start_index: u32,
    first_vertex: u32,
    size: f32,
}

#[derive(Debug, Clone, Copy)]
struct DeviceBuffers {
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    vertex_capacity: usize,
    index_capacity: usize,
}

/// Accumulates vertices for a single [`Topology`] and draws them with one
/// indexed draw call per [`PrimitiveRun`].
///
/// Vertices are buffered until a primitive is complete, so the index count is
/// always a whole number of primitives. Quads are split into two triangles
/// `(0, 1, 2)` and `(0, 2, 3)` as their fourth vertex arrives.
///
/// CPU content survives [`invalidate_device_objects`](Self::invalidate_device_objects);
/// the device buffers are recreated and refilled on the next
/// [`render`](Self::render).
pub struct GeometryBatch {
    topology: Topology,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    runs: Vec<PrimitiveRun>,
    open: Option<OpenRun>,
    pending: [Vertex; 4],
    pending_len: usize,
    dirty: bool,
    eq_coords: bool,
    visible_first: u32,
    visible_last: u32,
    device_objects: Option<DeviceBuffers>,
}

impl GeometryBatch {
    /// Create an empty batch for `topology`.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            vertices: Vec::new(),
            indices: Vec::new(),
            runs: Vec::new(),
            open: None,
            pending: [bytemuck::Zeroable::zeroed(); 4],
            pending_len: 0,
            dirty: false,
            eq_coords: false,
            visible_first: 0,
            visible_last: u32::MAX,
            device_objects: None,
        }
    }

    /// The topology this batch collects.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Discard all CPU-side content. Device buffers are kept for reuse.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.runs.clear();
        self.open = None;
        self.pending_len = 0;
        self.dirty = true;
    }

    /// Swizzle incoming positions from navmesh space `(x, y, z)` into the
    /// host's z-up space `(z, x, y)`. Affects vertices pushed afterwards.
    pub fn set_eq_coords(&mut self, eq_coords: bool) {
        self.eq_coords = eq_coords;
    }

    /// Whether positions are swizzled into z-up space.
    pub fn eq_coords(&self) -> bool {
        self.eq_coords
    }

    // ------------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------------

    /// Open a new run with the given size hint.
    pub fn begin(&mut self, size: f32) -> Result<(), DrawProtocolError> {
        if self.open.is_some() {
            return Err(violation(DrawProtocolError::NestedBegin(self.topology)));
        }
        self.open = Some(OpenRun {
            start_index: self.indices.len() as u32,
            first_vertex: self.vertices.len() as u32,
            size,
        });
        self.pending_len = 0;
        Ok(())
    }

    /// Append one vertex to the open run.
    pub fn add_vertex(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        color: u32,
        u: f32,
        v: f32,
    ) -> Result<(), DrawProtocolError> {
        if self.open.is_none() {
            return Err(violation(DrawProtocolError::NoOpenBatch));
        }

        let position = if self.eq_coords { [z, x, y] } else { [x, y, z] };
        self.pending[self.pending_len] = Vertex::new(position, color, [u, v]);
        self.pending_len += 1;

        if self.pending_len == self.topology.arity() {
            self.commit_pending();
        }
        Ok(())
    }

    /// Close the open run and record it.
    pub fn end(&mut self) -> Result<(), DrawProtocolError> {
        let Some(open) = self.open.take() else {
            return Err(violation(DrawProtocolError::NoOpenBatch));
        };

        if self.pending_len > 0 {
            log::warn!(
                "{} batch: discarding {} vertices of an incomplete primitive",
                self.topology,
                self.pending_len
            );
            self.pending_len = 0;
        }

        self.runs.push(PrimitiveRun {
            start_index: open.start_index,
            index_count: self.indices.len() as u32 - open.start_index,
            first_vertex: open.first_vertex,
            vertex_count: self.vertices.len() as u32 - open.first_vertex,
            size: open.size,
        });
        Ok(())
    }

    fn commit_pending(&mut self) {
        let base = self.vertices.len() as u32;
        self.vertices
            .extend_from_slice(&self.pending[..self.pending_len]);

        match self.topology {
            Topology::Quads => {
                self.indices
                    .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            }
            _ => self.indices.extend(base..base + self.pending_len as u32),
        }

        self.pending_len = 0;
        self.dirty = true;
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Closed runs, in submission order.
    pub fn runs(&self) -> &[PrimitiveRun] {
        &self.runs
    }

    /// CPU vertex data of every completed primitive.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// CPU index data of every completed primitive.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of closed runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of stored vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of stored indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of completed primitives (quads count once, not as two triangles).
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_primitive()
    }

    /// Whether no primitive has been completed.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether a run is currently open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Whether the CPU content differs from what was last uploaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether device buffers are currently held.
    pub fn has_device_objects(&self) -> bool {
        self.device_objects.is_some()
    }

    // ------------------------------------------------------------------------
    // Step-through debugging
    // ------------------------------------------------------------------------

    /// Only draw runs whose start index lies in `first..=last`.
    pub fn set_visible_range(&mut self, first: u32, last: u32) {
        self.visible_first = first.min(last);
        self.visible_last = first.max(last);
    }

    /// The inclusive index range of runs that are drawn.
    pub fn visible_range(&self) -> (u32, u32) {
        (self.visible_first, self.visible_last)
    }

    /// Only draw runs `first_run..=last_run`, clamped to the recorded runs.
    pub fn set_visible_runs(&mut self, first_run: usize, last_run: usize) {
        if self.runs.is_empty() {
            self.show_all();
            return;
        }
        let max = self.runs.len() - 1;
        let first = self.runs[first_run.min(max)].start_index;
        let last = self.runs[last_run.min(max)].start_index;
        self.set_visible_range(first, last);
    }

    /// Run numbers covered by the visible range, if any run is visible.
    pub fn visible_runs(&self) -> Option<(usize, usize)> {
        let first = self.runs.iter().position(|r| self.is_run_visible(r))?;
        let last = self.runs.iter().rposition(|r| self.is_run_visible(r))?;
        Some((first, last))
    }

    /// Draw every run.
    pub fn show_all(&mut self) {
        self.visible_first = 0;
        self.visible_last = u32::MAX;
    }

    /// Whether `run` starts inside the visible range.
    pub fn is_run_visible(&self, run: &PrimitiveRun) -> bool {
        (self.visible_first..=self.visible_last).contains(&run.start_index)
    }

    // ------------------------------------------------------------------------
    // Device objects
    // ------------------------------------------------------------------------

    /// Allocate device buffers large enough for the current content.
    ///
    /// Does nothing when the existing buffers already fit, or when there is no
    /// content to hold. Larger content replaces the old buffers.
    pub fn create_device_objects(
        &mut self,
        device: &mut dyn FixedFunctionDevice,
    ) -> Result<(), GraphicsError> {
        let vertex_count = self.vertices.len();
        let index_count = self.indices.len();
        if vertex_count == 0 || index_count == 0 {
            return Ok(());
        }

        if let Some(buffers) = self.device_objects {
            if buffers.vertex_capacity >= vertex_count && buffers.index_capacity >= index_count {
                return Ok(());
            }
            self.invalidate_device_objects(device);
        }

        let vertex_buffer = device.create_buffer(
            &BufferDescriptor::new(
                vertex_count as u64 * u64::from(Vertex::STRIDE),
                BufferUsage::VERTEX | BufferUsage::DYNAMIC | BufferUsage::WRITE_ONLY,
            )
            .with_label(format!("navmesh_{}_vertices", self.topology)),
        )?;
        let index_buffer = match device.create_buffer(
            &BufferDescriptor::new(
                index_count as u64 * 4,
                BufferUsage::INDEX | BufferUsage::DYNAMIC | BufferUsage::WRITE_ONLY,
            )
            .with_label(format!("navmesh_{}_indices", self.topology)),
        ) {
            Ok(buffer) => buffer,
            Err(err) => {
                device.release_buffer(vertex_buffer);
                return Err(err);
            }
        };

        log::debug!(
            "{} batch: created device objects for {} vertices, {} indices",
            self.topology,
            vertex_count,
            index_count
        );
        self.device_objects = Some(DeviceBuffers {
            vertex_buffer,
            index_buffer,
            vertex_capacity: vertex_count,
            index_capacity: index_count,
        });
        self.dirty = true;
        Ok(())
    }

    /// Release the device buffers. CPU content is kept.
    pub fn invalidate_device_objects(&mut self, device: &mut dyn FixedFunctionDevice) {
        if let Some(buffers) = self.device_objects.take() {
            device.release_buffer(buffers.vertex_buffer);
            device.release_buffer(buffers.index_buffer);
            self.dirty = true;
            log::debug!("{} batch: released device objects", self.topology);
        }
    }

    fn upload(
        &mut self,
        device: &mut dyn FixedFunctionDevice,
        buffers: DeviceBuffers,
    ) -> Result<(), GraphicsError> {
        device.write_buffer(buffers.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices))?;
        device.write_buffer(buffers.index_buffer, 0, bytemuck::cast_slice(&self.indices))?;
        self.dirty = false;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Upload dirty content and draw every visible run.
    ///
    /// Returns the number of draw calls issued. Allocation or upload failures
    /// are logged and leave the batch undrawn for this frame.
    pub fn render(&mut self, device: &mut dyn FixedFunctionDevice) -> usize {
        if self.is_empty() || device.is_lost() {
            return 0;
        }

        if let Err(err) = self.create_device_objects(device) {
            log::warn!("{} batch: failed to create device objects: {err}", self.topology);
            return 0;
        }
        let Some(buffers) = self.device_objects else {
            return 0;
        };

        if self.dirty {
            if let Err(err) = self.upload(device, buffers) {
                log::warn!("{} batch: upload failed: {err}", self.topology);
                return 0;
            }
        }

        let primitive = self.topology.primitive_type();
        let max_point_size = device.capabilities().max_point_size;
        let mut draws = 0;

        for run in self.runs.iter().filter(|run| run.index_count > 0) {
            if !self.is_run_visible(run) {
                continue;
            }

            if self.topology == Topology::Points {
                device.set_render_state(RenderState::PointSize(run.size.min(max_point_size)));
            }

            let draw = IndexedDraw {
                primitive,
                vertex_buffer: buffers.vertex_buffer,
                vertex_stride: Vertex::STRIDE,
                index_buffer: buffers.index_buffer,
                min_vertex: run.first_vertex,
                vertex_count: run.vertex_count,
                start_index: run.start_index,
                primitive_count: run.index_count / primitive.indices_per_primitive(),
            };
            if let Err(err) = device.draw_indexed(&draw) {
                log::warn!("{} batch: draw failed: {err}", self.topology);
                break;
            }
            draws += 1;
        }

        draws
    }
}

impl Drop for GeometryBatch {
    fn drop(&mut self) {
        if self.device_objects.is_some() {
            log::warn!(
                "{} batch dropped without invalidating its device objects",
                self.topology
            );
        }
    }
}
