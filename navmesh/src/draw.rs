//! Navmesh debug drawing.
//!
//! Walks a [`NavMesh`] and emits its polygons, boundaries, vertices and
//! off-mesh connections through a [`DebugDraw`] receiver.

use bitflags::bitflags;

use crate::debug_draw::{
    DebugDraw, DebugDrawPrimitive, box_colors, dark_col, int_to_col, rgba, trans_col,
};
use crate::mesh::{ClosedList, EXT_LINK, MeshTile, NavMesh, PolyKind, PolyRef};

bitflags! {
    /// Optional layers of [`draw_navmesh`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NavMeshDrawFlags: u8 {
        const OFF_MESH_CONNECTIONS = 0x01;
        const CLOSED_LIST = 0x02;
        const COLOR_TILES = 0x04;
        const TILE_BOUNDS = 0x08;
    }
}

impl Default for NavMeshDrawFlags {
    fn default() -> Self {
        Self::OFF_MESH_CONNECTIONS | Self::CLOSED_LIST
    }
}

const CLOSED_LIST_FILL: u32 = rgba(255, 196, 0, 64);
const CLOSED_LIST_LINE: u32 = rgba(255, 196, 0, 220);
const INNER_BOUNDARY: u32 = rgba(0, 48, 64, 32);
const OUTER_BOUNDARY: u32 = rgba(0, 48, 64, 220);
const PORTAL_EDGE: u32 = rgba(255, 255, 255, 48);
const VERTEX_POINT: u32 = rgba(0, 0, 0, 220);
const UNCONNECTED_END: u32 = rgba(220, 32, 16, 196);

/// Draw every tile of `mesh`.
///
/// Polygon fill, boundaries and vertices are always drawn; `flags` selects
/// the optional layers. `closed_list` is only consulted with
/// [`NavMeshDrawFlags::CLOSED_LIST`].
pub fn draw_navmesh(
    dd: &mut dyn DebugDraw,
    mesh: &NavMesh,
    closed_list: Option<&ClosedList>,
    flags: NavMeshDrawFlags,
) {
    let closed_list = closed_list.filter(|_| flags.contains(NavMeshDrawFlags::CLOSED_LIST));
    for (index, tile) in mesh.tiles().iter().enumerate() {
        draw_mesh_tile(dd, tile, index as u32, closed_list, flags);
    }
}

fn draw_mesh_tile(
    dd: &mut dyn DebugDraw,
    tile: &MeshTile,
    tile_index: u32,
    closed_list: Option<&ClosedList>,
    flags: NavMeshDrawFlags,
) {
    let is_closed = |poly: usize| {
        closed_list.is_some_and(|list| list.contains(PolyRef::new(tile_index, poly as u32)))
    };

    dd.depth_mask(false);

    dd.begin(DebugDrawPrimitive::Tris, 1.0);
    for (index, poly) in tile.ground_polys() {
        let color = if is_closed(index) {
            CLOSED_LIST_FILL
        } else if flags.contains(NavMeshDrawFlags::COLOR_TILES) {
            int_to_col(tile_index, 128)
        } else {
            trans_col(dd.area_to_col(poly.area), 64)
        };
        let Some(verts) = tile.poly_positions(poly) else {
            log::warn!("tile {tile_index}: polygon {index} references a missing vertex, skipped");
            continue;
        };
        for j in 2..verts.len() {
            dd.vertex(verts[0], color);
            dd.vertex(verts[j - 1], color);
            dd.vertex(verts[j], color);
        }
    }
    dd.end();

    draw_poly_boundaries(dd, tile, INNER_BOUNDARY, 1.5, true);
    draw_poly_boundaries(dd, tile, OUTER_BOUNDARY, 2.5, false);

    if flags.contains(NavMeshDrawFlags::OFF_MESH_CONNECTIONS) {
        dd.begin(DebugDrawPrimitive::Lines, 2.0);
        for con in &tile.off_mesh_connections {
            let Some(poly) = tile.polys.get(usize::from(con.poly)) else {
                continue;
            };
            if poly.kind != PolyKind::OffMeshConnection {
                continue;
            }
            let color = if is_closed(usize::from(con.poly)) {
                CLOSED_LIST_LINE
            } else {
                dark_col(int_to_col(u32::from(poly.area), 220))
            };

            append_circle(dd, con.start, con.radius, color);
            let end_color = if con.end_connected {
                color
            } else {
                UNCONNECTED_END
            };
            append_circle(dd, con.end, con.radius, end_color);

            let head = if con.bidirectional { 0.6 } else { 0.0 };
            append_arc(dd, con.start, con.end, 0.25, head, 0.6, color);
        }
        dd.end();
    }

    dd.begin(DebugDrawPrimitive::Points, 3.0);
    for (_, poly) in tile.ground_polys() {
        for pos in tile.poly_positions(poly).unwrap_or_default() {
            dd.vertex(pos, VERTEX_POINT);
        }
    }
    dd.end();

    if flags.contains(NavMeshDrawFlags::TILE_BOUNDS) {
        let colors = box_colors(rgba(255, 255, 255, 24), rgba(128, 128, 128, 24));
        dd.begin(DebugDrawPrimitive::Quads, 1.0);
        append_box(dd, tile.bmin, tile.bmax, colors);
        dd.end();
    }

    dd.depth_mask(true);
}

fn draw_poly_boundaries(
    dd: &mut dyn DebugDraw,
    tile: &MeshTile,
    color: u32,
    width: f32,
    inner: bool,
) {
    dd.begin(DebugDrawPrimitive::Lines, width);
    for (_, poly) in tile.ground_polys() {
        let Some(verts) = tile.poly_positions(poly) else {
            continue;
        };
        let n = verts.len();
        for (j, &neighbour) in poly.neighbours.iter().enumerate().take(n) {
            let edge_color = match (inner, neighbour) {
                (true, 0) | (false, 1..) => continue,
                (true, link) if link & EXT_LINK != 0 => PORTAL_EDGE,
                _ => color,
            };
            dd.vertex(verts[j], edge_color);
            dd.vertex(verts[(j + 1) % n], edge_color);
        }
    }
    dd.end();
}

const CIRCLE_SEGMENTS: usize = 40;

/// Append a horizontal circle as line pairs.
pub fn append_circle(dd: &mut dyn DebugDraw, center: [f32; 3], radius: f32, color: u32) {
    let point = |i: usize| {
        let a = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
        [
            center[0] + a.cos() * radius,
            center[1],
            center[2] + a.sin() * radius,
        ]
    };
    let mut prev = point(CIRCLE_SEGMENTS - 1);
    for i in 0..CIRCLE_SEGMENTS {
        let next = point(i);
        dd.vertex(prev, color);
        dd.vertex(next, color);
        prev = next;
    }
}

const ARC_POINTS: usize = 8;
const ARC_PAD: f32 = 0.05;

/// Append a parabolic arc from `from` to `to` as line pairs, with optional
/// arrow heads of size `head0` at the start and `head1` at the end.
pub fn append_arc(
    dd: &mut dyn DebugDraw,
    from: [f32; 3],
    to: [f32; 3],
    height: f32,
    head0: f32,
    head1: f32,
    color: u32,
) {
    let delta = sub(to, from);
    let h = length(delta) * height;
    let eval = |u: f32| {
        [
            from[0] + delta[0] * u,
            from[1] + delta[1] * u + h * (1.0 - (u * 2.0 - 1.0).powi(2)),
            from[2] + delta[2] * u,
        ]
    };

    let step = (1.0 - ARC_PAD * 2.0) / ARC_POINTS as f32;
    let mut prev = eval(ARC_PAD);
    for i in 1..=ARC_POINTS {
        let next = eval(ARC_PAD + i as f32 * step);
        dd.vertex(prev, color);
        dd.vertex(next, color);
        prev = next;
    }

    if head0 > 0.0 {
        append_arrow_head(dd, eval(ARC_PAD), eval(ARC_PAD + 0.05), head0, color);
    }
    if head1 > 0.0 {
        append_arrow_head(dd, eval(1.0 - ARC_PAD), eval(1.0 - (ARC_PAD + 0.05)), head1, color);
    }
}

fn append_arrow_head(dd: &mut dyn DebugDraw, p: [f32; 3], q: [f32; 3], size: f32, color: u32) {
    let dir = sub(q, p);
    let len = length(dir);
    if len < 0.001 {
        return;
    }
    let az = scale(dir, 1.0 / len);
    let ax = cross([0.0, 1.0, 0.0], az);

    let tip = |side: f32| {
        [
            p[0] + az[0] * size + ax[0] * side * size / 3.0,
            p[1] + az[1] * size + ax[1] * side * size / 3.0,
            p[2] + az[2] * size + ax[2] * side * size / 3.0,
        ]
    };
    dd.vertex(p, color);
    dd.vertex(tip(1.0), color);
    dd.vertex(p, color);
    dd.vertex(tip(-1.0), color);
}

/// Append the six faces of an axis-aligned box as quads.
///
/// `colors` are the top, bottom and four side faces.
pub fn append_box(dd: &mut dyn DebugDraw, bmin: [f32; 3], bmax: [f32; 3], colors: [u32; 6]) {
    let corners = [
        [bmin[0], bmin[1], bmin[2]],
        [bmax[0], bmin[1], bmin[2]],
        [bmax[0], bmin[1], bmax[2]],
        [bmin[0], bmin[1], bmax[2]],
        [bmin[0], bmax[1], bmin[2]],
        [bmax[0], bmax[1], bmin[2]],
        [bmax[0], bmax[1], bmax[2]],
        [bmin[0], bmax[1], bmax[2]],
    ];
    const FACES: [[usize; 4]; 6] = [
        [7, 6, 5, 4],
        [0, 1, 2, 3],
        [1, 5, 6, 2],
        [3, 7, 4, 0],
        [2, 6, 7, 3],
        [0, 4, 5, 1],
    ];
    for (face, color) in FACES.iter().zip(colors) {
        for &corner in face {
            dd.vertex(corners[corner], color);
        }
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: [f32; 3], s: f32) -> [f32; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn length(a: [f32; 3]) -> f32 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{OffMeshConnection, Poly};

    /// Counts vertices per primitive kind and checks begin/end pairing.
    #[derive(Default)]
    struct Counter {
        open: Option<DebugDrawPrimitive>,
        counts: std::collections::HashMap<DebugDrawPrimitive, usize>,
        batches: usize,
        depth_mask: Vec<bool>,
    }

    impl DebugDraw for Counter {
        fn depth_mask(&mut self, state: bool) {
            self.depth_mask.push(state);
        }

        fn texture(&mut self, _state: bool) {}

        fn begin(&mut self, prim: DebugDrawPrimitive, _size: f32) {
            assert!(self.open.is_none());
            self.open = Some(prim);
            self.batches += 1;
        }

        fn vertex(&mut self, _pos: [f32; 3], _color: u32) {
            let prim = self.open.expect("vertex outside begin/end");
            *self.counts.entry(prim).or_default() += 1;
        }

        fn vertex_uv(&mut self, pos: [f32; 3], color: u32, _uv: [f32; 2]) {
            self.vertex(pos, color);
        }

        fn end(&mut self) {
            assert!(self.open.take().is_some());
        }
    }

    #[test]
    fn test_single_quad_tile() {
        let mesh = NavMesh::grid(1, 1, 1, 1.0);
        let mut dd = Counter::default();
        draw_navmesh(&mut dd, &mesh, None, NavMeshDrawFlags::default());

        // One quad polygon fans into two triangles.
        assert_eq!(dd.counts[&DebugDrawPrimitive::Tris], 6);
        // Four outer edges, no inner ones.
        assert_eq!(dd.counts[&DebugDrawPrimitive::Lines], 8);
        assert_eq!(dd.counts[&DebugDrawPrimitive::Points], 4);
        assert!(!dd.counts.contains_key(&DebugDrawPrimitive::Quads));
        assert_eq!(dd.depth_mask, vec![false, true]);
    }

    #[test]
    fn test_tile_bounds_are_quads() {
        let mesh = NavMesh::grid(2, 1, 1, 1.0);
        let mut dd = Counter::default();
        draw_navmesh(&mut dd, &mesh, None, NavMeshDrawFlags::TILE_BOUNDS);
        assert_eq!(dd.counts[&DebugDrawPrimitive::Quads], 2 * 24);
    }

    #[test]
    fn test_off_mesh_connection_lines() {
        let mut mesh = NavMesh::grid(1, 1, 2, 1.0);
        mesh.tile_mut(0)
            .unwrap()
            .add_off_mesh_connection([0.5, 0.0, 0.5], [1.5, 0.0, 1.5], 0.2, false);

        let mut without = Counter::default();
        draw_navmesh(&mut without, &mesh, None, NavMeshDrawFlags::empty());
        let mut with = Counter::default();
        draw_navmesh(&mut with, &mesh, None, NavMeshDrawFlags::OFF_MESH_CONNECTIONS);

        // Two circles, the arc and one arrow head.
        let extra = 2 * CIRCLE_SEGMENTS * 2 + ARC_POINTS * 2 + 4;
        assert_eq!(
            with.counts[&DebugDrawPrimitive::Lines],
            without.counts[&DebugDrawPrimitive::Lines] + extra
        );
    }

    #[test]
    fn test_malformed_tile_is_skipped() {
        let mut mesh = NavMesh::grid(1, 1, 1, 1.0);
        let tile = mesh.tile_mut(0).unwrap();
        tile.polys.push(Poly {
            verts: vec![0, 1, 99],
            neighbours: vec![0, 0, 0],
            ..Default::default()
        });
        tile.off_mesh_connections.push(OffMeshConnection {
            start: [0.0; 3],
            end: [1.0, 0.0, 1.0],
            radius: 0.2,
            bidirectional: false,
            poly: 50,
            end_connected: true,
        });

        let mut dd = Counter::default();
        draw_navmesh(&mut dd, &mesh, None, NavMeshDrawFlags::default());

        // Only the valid cell is drawn.
        assert_eq!(dd.counts[&DebugDrawPrimitive::Tris], 6);
        assert_eq!(dd.counts[&DebugDrawPrimitive::Lines], 8);
        assert_eq!(dd.counts[&DebugDrawPrimitive::Points], 4);
        assert!(dd.open.is_none());
    }

    #[test]
    fn test_append_box_face_count() {
        let mut dd = Counter::default();
        dd.begin(DebugDrawPrimitive::Quads, 1.0);
        append_box(&mut dd, [0.0; 3], [1.0; 3], [0; 6]);
        dd.end();
        assert_eq!(dd.counts[&DebugDrawPrimitive::Quads], 24);
    }
}
