//! Integration tests for the navmesh model and its debug drawing.

use std::collections::HashMap;

use rstest::rstest;

use navoverlay_navmesh::{
    ClosedList, DebugDraw, DebugDrawPrimitive, MAX_GRID_CELLS, MeshTile, NavMesh,
    NavMeshDrawFlags, PolyRef, mesh::EXT_LINK,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Records vertex counts and colours per primitive kind.
#[derive(Default)]
struct Recorder {
    open: Option<DebugDrawPrimitive>,
    counts: HashMap<DebugDrawPrimitive, usize>,
    colors: Vec<(DebugDrawPrimitive, u32)>,
}

impl Recorder {
    fn count(&self, prim: DebugDrawPrimitive) -> usize {
        self.counts.get(&prim).copied().unwrap_or(0)
    }
}

impl DebugDraw for Recorder {
    fn depth_mask(&mut self, _state: bool) {}

    fn texture(&mut self, _state: bool) {}

    fn begin(&mut self, prim: DebugDrawPrimitive, _size: f32) {
        assert!(self.open.is_none(), "nested begin");
        self.open = Some(prim);
    }

    fn vertex(&mut self, _pos: [f32; 3], color: u32) {
        let prim = self.open.expect("vertex outside begin/end");
        *self.counts.entry(prim).or_default() += 1;
        self.colors.push((prim, color));
    }

    fn vertex_uv(&mut self, pos: [f32; 3], color: u32, _uv: [f32; 2]) {
        self.vertex(pos, color);
    }

    fn end(&mut self) {
        assert!(self.open.take().is_some(), "end without begin");
    }
}

fn draw(mesh: &NavMesh, closed_list: Option<&ClosedList>, flags: NavMeshDrawFlags) -> Recorder {
    let mut dd = Recorder::default();
    navoverlay_navmesh::draw_navmesh(&mut dd, mesh, closed_list, flags);
    dd
}

#[rstest]
#[case(1, 1, 1, 1, 4)]
#[case(2, 1, 3, 18, 16)]
#[case(2, 2, 2, 16, 9)]
#[case(3, 2, 4, 96, 25)]
fn test_grid_counts(
    #[case] tiles_x: u32,
    #[case] tiles_z: u32,
    #[case] cells: u32,
    #[case] polys: usize,
    #[case] verts_per_tile: usize,
) {
    init_logging();
    let mesh = NavMesh::grid(tiles_x, tiles_z, cells, 1.0);
    assert_eq!(mesh.tiles().len(), (tiles_x * tiles_z) as usize);
    assert_eq!(mesh.poly_count(), polys);
    for tile in mesh.tiles() {
        assert_eq!(tile.verts.len(), verts_per_tile);
    }
}

#[rstest]
#[case(NavMeshDrawFlags::empty(), 0)]
#[case(NavMeshDrawFlags::default(), 0)]
#[case(NavMeshDrawFlags::TILE_BOUNDS, 4 * 24)]
#[case(NavMeshDrawFlags::all(), 4 * 24)]
fn test_layer_vertex_counts(#[case] flags: NavMeshDrawFlags, #[case] quad_verts: usize) {
    init_logging();
    let mesh = NavMesh::grid(2, 2, 2, 1.0);
    let polys = mesh.poly_count();
    let dd = draw(&mesh, None, flags);

    // Quad cells fan into two triangles; every edge is drawn once per side.
    assert_eq!(dd.count(DebugDrawPrimitive::Tris), polys * 6);
    assert_eq!(dd.count(DebugDrawPrimitive::Lines), polys * 8);
    assert_eq!(dd.count(DebugDrawPrimitive::Points), polys * 4);
    assert_eq!(dd.count(DebugDrawPrimitive::Quads), quad_verts);
}

#[rstest]
fn test_closed_list_needs_its_layer() {
    init_logging();
    let mesh = NavMesh::grid(1, 1, 2, 1.0);
    let closed: ClosedList = [PolyRef::new(0, 0)].into_iter().collect();

    let fills = |dd: &Recorder| -> Vec<u32> {
        dd.colors
            .iter()
            .filter(|(prim, _)| *prim == DebugDrawPrimitive::Tris)
            .map(|&(_, color)| color)
            .collect()
    };

    let highlighted = fills(&draw(&mesh, Some(&closed), NavMeshDrawFlags::CLOSED_LIST));
    let plain = fills(&draw(&mesh, Some(&closed), NavMeshDrawFlags::empty()));

    // The first cell's six fill vertices change colour, the rest do not.
    assert_ne!(highlighted[..6], plain[..6]);
    assert_eq!(highlighted[6..], plain[6..]);
}

#[rstest]
fn test_grid_cells_are_clamped() {
    init_logging();
    let mesh = NavMesh::grid(1, 1, MAX_GRID_CELLS + 20, 0.1);
    let cells = MAX_GRID_CELLS as usize;
    assert_eq!(mesh.poly_count(), cells * cells);

    let tile = &mesh.tiles()[0];
    assert_eq!(tile.verts.len(), (cells + 1) * (cells + 1));
    let max_link = tile
        .polys
        .iter()
        .flat_map(|p| p.neighbours.iter().copied())
        .max()
        .unwrap();
    assert!(max_link < EXT_LINK);
}

#[rstest]
fn test_tile_vertex_limit() {
    init_logging();
    let mut tile = MeshTile::new([0.0; 3], [1.0; 3]);
    for _ in 0..=u16::MAX {
        assert!(tile.add_vertex([0.0; 3]).is_some());
    }
    assert_eq!(tile.add_vertex([0.0; 3]), None);
    assert_eq!(
        tile.add_off_mesh_connection([0.0; 3], [1.0; 3], 0.1, true),
        None
    );
    assert_eq!(tile.verts.len(), usize::from(u16::MAX) + 1);
    assert!(tile.off_mesh_connections.is_empty());
}
