//! Navigation mesh data model.
//!
//! A [`NavMesh`] is a set of [`MeshTile`]s. Each tile owns its vertices and
//! convex polygons. Polygon edges record their neighbour: `0` for a border
//! edge, `n + 1` for polygon `n` of the same tile, or a value with
//! [`EXT_LINK`] set for a portal into an adjacent tile.

use std::collections::HashSet;

/// Neighbour flag marking an edge that links to another tile.
pub const EXT_LINK: u16 = 0x8000;

/// Area id of plain walkable ground.
pub const WALKABLE_AREA: u8 = 63;

/// Maximum number of vertices in one polygon.
pub const MAX_VERTS_PER_POLY: usize = 6;

/// Largest `cells` accepted by [`NavMesh::grid`]: internal neighbour links
/// must stay below [`EXT_LINK`].
pub const MAX_GRID_CELLS: u32 = 181;

/// Reference to one polygon of a navmesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolyRef {
    pub tile: u32,
    pub poly: u32,
}

impl PolyRef {
    pub const fn new(tile: u32, poly: u32) -> Self {
        Self { tile, poly }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolyKind {
    /// Regular walkable polygon.
    #[default]
    Ground,
    /// Two-vertex polygon standing for an off-mesh connection.
    OffMeshConnection,
}

/// A convex polygon, referring to its tile's vertices by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Poly {
    pub verts: Vec<u16>,
    /// One entry per edge `verts[i] -> verts[i + 1]`.
    pub neighbours: Vec<u16>,
    pub flags: u16,
    pub area: u8,
    pub kind: PolyKind,
}

impl Poly {
    pub fn vert_count(&self) -> usize {
        self.verts.len()
    }
}

/// A jump link between two points that are not connected by ground polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffMeshConnection {
    pub start: [f32; 3],
    pub end: [f32; 3],
    pub radius: f32,
    pub bidirectional: bool,
    /// Index of the [`PolyKind::OffMeshConnection`] polygon in the tile.
    pub poly: u16,
    /// Whether the end point landed on a polygon when the tile was linked.
    pub end_connected: bool,
}

/// One tile of a navmesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshTile {
    pub bmin: [f32; 3],
    pub bmax: [f32; 3],
    pub verts: Vec<[f32; 3]>,
    pub polys: Vec<Poly>,
    pub off_mesh_connections: Vec<OffMeshConnection>,
}

impl MeshTile {
    pub fn new(bmin: [f32; 3], bmax: [f32; 3]) -> Self {
        Self {
            bmin,
            bmax,
            ..Default::default()
        }
    }

    /// Add a vertex. Returns its index, or `None` when the tile already
    /// holds as many vertices as a `u16` can address.
    pub fn add_vertex(&mut self, position: [f32; 3]) -> Option<u16> {
        let Ok(index) = u16::try_from(self.verts.len()) else {
            log::warn!("MeshTile: vertex limit reached, vertex dropped");
            return None;
        };
        self.verts.push(position);
        Some(index)
    }

    /// Add a ground polygon with no neighbours. Returns its index, or `None`
    /// when the tile is full.
    pub fn add_poly(&mut self, verts: &[u16], area: u8) -> Option<u16> {
        debug_assert!((3..=MAX_VERTS_PER_POLY).contains(&verts.len()));
        let index = self.next_poly_index()?;
        self.polys.push(Poly {
            verts: verts.to_vec(),
            neighbours: vec![0; verts.len()],
            flags: 1,
            area,
            kind: PolyKind::Ground,
        });
        Some(index)
    }

    /// Add an off-mesh connection together with its two-vertex polygon.
    /// Returns the polygon index, or `None` when the tile is full.
    pub fn add_off_mesh_connection(
        &mut self,
        start: [f32; 3],
        end: [f32; 3],
        radius: f32,
        bidirectional: bool,
    ) -> Option<u16> {
        let poly = self.next_poly_index()?;
        if self.verts.len() + 2 > usize::from(u16::MAX) + 1 {
            log::warn!("MeshTile: vertex limit reached, off-mesh connection dropped");
            return None;
        }
        let a = self.add_vertex(start)?;
        let b = self.add_vertex(end)?;
        self.polys.push(Poly {
            verts: vec![a, b],
            neighbours: vec![0, 0],
            flags: 1,
            area: WALKABLE_AREA,
            kind: PolyKind::OffMeshConnection,
        });
        let end_connected = self.contains_xz(end);
        self.off_mesh_connections.push(OffMeshConnection {
            start,
            end,
            radius,
            bidirectional,
            poly,
            end_connected,
        });
        Some(poly)
    }

    fn next_poly_index(&self) -> Option<u16> {
        let index = u16::try_from(self.polys.len()).ok();
        if index.is_none() {
            log::warn!("MeshTile: polygon limit reached, polygon dropped");
        }
        index
    }

    fn contains_xz(&self, p: [f32; 3]) -> bool {
        p[0] >= self.bmin[0] && p[0] <= self.bmax[0] && p[2] >= self.bmin[2] && p[2] <= self.bmax[2]
    }

    /// Positions of every vertex of `poly`, or `None` if any vertex index is
    /// out of range for this tile.
    pub fn poly_positions(&self, poly: &Poly) -> Option<Vec<[f32; 3]>> {
        poly.verts
            .iter()
            .map(|&v| self.verts.get(usize::from(v)).copied())
            .collect()
    }

    pub fn ground_polys(&self) -> impl Iterator<Item = (usize, &Poly)> {
        self.polys
            .iter()
            .enumerate()
            .filter(|(_, p)| p.kind == PolyKind::Ground)
    }
}

/// A tiled navigation mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavMesh {
    tiles: Vec<MeshTile>,
}

impl NavMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tile(&mut self, tile: MeshTile) -> u32 {
        self.tiles.push(tile);
        (self.tiles.len() - 1) as u32
    }

    pub fn tiles(&self) -> &[MeshTile] {
        &self.tiles
    }

    pub fn tile(&self, index: u32) -> Option<&MeshTile> {
        self.tiles.get(index as usize)
    }

    pub fn tile_mut(&mut self, index: u32) -> Option<&mut MeshTile> {
        self.tiles.get_mut(index as usize)
    }

    pub fn poly(&self, poly_ref: PolyRef) -> Option<&Poly> {
        self.tile(poly_ref.tile)?.polys.get(poly_ref.poly as usize)
    }

    /// Total number of polygons of every kind.
    pub fn poly_count(&self) -> usize {
        self.tiles.iter().map(|t| t.polys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.poly_count() == 0
    }

    /// A flat grid of `tiles_x * tiles_z` tiles, each holding
    /// `cells * cells` square polygons of side `cell_size`, in the XZ plane.
    ///
    /// Edges between cells of a tile are internal links, edges on a tile
    /// border shared with another tile are [`EXT_LINK`] portals and the outer
    /// rim of the grid is border. `cells` is clamped to [`MAX_GRID_CELLS`].
    pub fn grid(tiles_x: u32, tiles_z: u32, cells: u32, cell_size: f32) -> Self {
        if cells > MAX_GRID_CELLS {
            log::warn!("NavMesh::grid: {cells} cells per tile clamped to {MAX_GRID_CELLS}");
        }
        let cells = cells.min(MAX_GRID_CELLS);
        let mut mesh = Self::new();
        let tile_size = cells as f32 * cell_size;

        for tz in 0..tiles_z {
            for tx in 0..tiles_x {
                let origin = [tx as f32 * tile_size, 0.0, tz as f32 * tile_size];
                let mut tile = MeshTile::new(
                    origin,
                    [origin[0] + tile_size, 0.5, origin[2] + tile_size],
                );

                let row = cells + 1;
                for z in 0..=cells {
                    for x in 0..=cells {
                        tile.add_vertex([
                            origin[0] + x as f32 * cell_size,
                            0.0,
                            origin[2] + z as f32 * cell_size,
                        ]);
                    }
                }

                for z in 0..cells {
                    for x in 0..cells {
                        let v0 = (z * row + x) as u16;
                        let v1 = v0 + 1;
                        let v2 = v1 + row as u16;
                        let v3 = v0 + row as u16;
                        let Some(poly) = tile.add_poly(&[v0, v3, v2, v1], WALKABLE_AREA) else {
                            continue;
                        };

                        // Edges: -x, +z, +x, -z.
                        let index = |x: u32, z: u32| (z * cells + x + 1) as u16;
                        let neighbours = &mut tile.polys[usize::from(poly)].neighbours;
                        neighbours[0] = match (x, tx) {
                            (0, 0) => 0,
                            (0, _) => EXT_LINK,
                            _ => index(x - 1, z),
                        };
                        neighbours[1] = match (z + 1 == cells, tz + 1 == tiles_z) {
                            (true, true) => 0,
                            (true, false) => EXT_LINK,
                            _ => index(x, z + 1),
                        };
                        neighbours[2] = match (x + 1 == cells, tx + 1 == tiles_x) {
                            (true, true) => 0,
                            (true, false) => EXT_LINK,
                            _ => index(x + 1, z),
                        };
                        neighbours[3] = match (z, tz) {
                            (0, 0) => 0,
                            (0, _) => EXT_LINK,
                            _ => index(x, z - 1),
                        };
                    }
                }

                mesh.add_tile(tile);
            }
        }

        mesh
    }
}

/// Polygons visited by a path query, highlighted when drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosedList {
    polys: HashSet<PolyRef>,
}

impl ClosedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, poly: PolyRef) -> bool {
        self.polys.insert(poly)
    }

    pub fn contains(&self, poly: PolyRef) -> bool {
        self.polys.contains(&poly)
    }

    pub fn len(&self) -> usize {
        self.polys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    pub fn clear(&mut self) {
        self.polys.clear();
    }
}

impl FromIterator<PolyRef> for ClosedList {
    fn from_iter<I: IntoIterator<Item = PolyRef>>(iter: I) -> Self {
        Self {
            polys: iter.into_iter().collect(),
        }
    }
}
