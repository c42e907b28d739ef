use navoverlay_debug_drawer::{BatchGroup, DrawProtocolError, Topology};
use navoverlay_navmesh::{DebugDraw, DebugDrawPrimitive};

/// Map a debug-draw primitive onto a batch topology.
pub fn topology_for(prim: DebugDrawPrimitive) -> Topology {
    match prim {
        DebugDrawPrimitive::Points => Topology::Points,
        DebugDrawPrimitive::Lines => Topology::Lines,
        DebugDrawPrimitive::Tris => Topology::Triangles,
        DebugDrawPrimitive::Quads => Topology::Quads,
    }
}

/// Convert a navmesh colour (RGBA, red in the low byte) to device ARGB.
pub const fn rgba_to_argb(color: u32) -> u32 {
    (color & 0xff00_ff00) | (color & 0x0000_00ff) << 16 | (color >> 16) & 0x0000_00ff
}

/// [`DebugDraw`] receiver that feeds a [`BatchGroup`].
///
/// Depth-mask and texture toggles are recorded but not forwarded; the
/// overlay's pipeline state decides depth and texturing for every batch.
pub struct DebugDrawAdapter<'a> {
    group: &'a mut BatchGroup,
    depth_mask: bool,
    texture: bool,
    protocol_errors: usize,
}

impl<'a> DebugDrawAdapter<'a> {
    pub fn new(group: &'a mut BatchGroup) -> Self {
        Self {
            group,
            depth_mask: true,
            texture: false,
            protocol_errors: 0,
        }
    }

    /// Last depth-mask state requested by the drawer.
    pub fn depth_mask_state(&self) -> bool {
        self.depth_mask
    }

    /// Last texture state requested by the drawer.
    pub fn texture_state(&self) -> bool {
        self.texture
    }

    /// Number of rejected protocol calls.
    pub fn protocol_errors(&self) -> usize {
        self.protocol_errors
    }

    fn check(&mut self, result: Result<(), DrawProtocolError>) {
        if result.is_err() {
            self.protocol_errors += 1;
        }
    }
}

impl DebugDraw for DebugDrawAdapter<'_> {
    fn depth_mask(&mut self, state: bool) {
        self.depth_mask = state;
    }

    fn texture(&mut self, state: bool) {
        self.texture = state;
    }

    fn begin(&mut self, prim: DebugDrawPrimitive, size: f32) {
        let result = self.group.begin(topology_for(prim), size);
        self.check(result);
    }

    fn vertex(&mut self, pos: [f32; 3], color: u32) {
        self.vertex_uv(pos, color, [0.0, 0.0]);
    }

    fn vertex_uv(&mut self, pos: [f32; 3], color: u32, uv: [f32; 2]) {
        let result =
            self.group
                .add_vertex(pos[0], pos[1], pos[2], rgba_to_argb(color), uv[0], uv[1]);
        self.check(result);
    }

    fn end(&mut self) {
        let result = self.group.end();
        self.check(result);
    }
}
