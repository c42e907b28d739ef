use navoverlay_graphics::PrimitiveType;

/// The four primitive kinds the debug-draw protocol can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
    /// Submitted as four vertices, stored and drawn as two triangles.
    Quads,
}

impl Topology {
    /// Number of topologies.
    pub const COUNT: usize = 4;

    /// Every topology, in render order.
    pub const ALL: [Self; Self::COUNT] = [Self::Points, Self::Lines, Self::Triangles, Self::Quads];

    /// Number of input vertices that complete one primitive.
    pub const fn arity(self) -> usize {
        match self {
            Self::Points => 1,
            Self::Lines => 2,
            Self::Triangles => 3,
            Self::Quads => 4,
        }
    }

    /// Number of indices stored per completed primitive.
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            Self::Quads => 6,
            other => other.arity(),
        }
    }

    /// How the stored indices are assembled by the device.
    pub const fn primitive_type(self) -> PrimitiveType {
        match self {
            Self::Points => PrimitiveType::PointList,
            Self::Lines => PrimitiveType::LineList,
            Self::Triangles | Self::Quads => PrimitiveType::TriangleList,
        }
    }

    /// Slot of this topology in per-topology arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Lines => "Lines",
            Self::Triangles => "Triangles",
            Self::Quads => "Quads",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
