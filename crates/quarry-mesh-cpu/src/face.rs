use quarry_geom::{V3i, Vec3};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face; also the index into per-face tile tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Face looking along the unit axis direction `d`.
    pub fn from_dir(d: V3i) -> Option<Face> {
        match (d.x, d.y, d.z) {
            (0, 1, 0) => Some(Face::PosY),
            (0, -1, 0) => Some(Face::NegY),
            (1, 0, 0) => Some(Face::PosX),
            (-1, 0, 0) => Some(Face::NegX),
            (0, 0, 1) => Some(Face::PosZ),
            (0, 0, -1) => Some(Face::NegZ),
            _ => None,
        }
    }

    #[inline]
    pub fn opposite(self) -> Face {
        match self {
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        Vec3::from(self.delta())
    }

    /// Returns the integer grid delta when stepping out of this face.
    #[inline]
    pub fn delta(self) -> V3i {
        match self {
            Face::PosY => V3i::new(0, 1, 0),
            Face::NegY => V3i::new(0, -1, 0),
            Face::PosX => V3i::new(1, 0, 0),
            Face::NegX => V3i::new(-1, 0, 0),
            Face::PosZ => V3i::new(0, 0, 1),
            Face::NegZ => V3i::new(0, 0, -1),
        }
    }
}
