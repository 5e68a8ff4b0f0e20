//! Small geometry value types shared by the chunk, lighting and meshing crates.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Floating point vector used for render geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, rhs: Vec3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[inline]
    pub fn cross(self, rhs: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Rotates around the Y axis (in the XZ plane) by `degrees`.
    ///
    /// Positive angles turn +X towards +Z.
    #[inline]
    pub fn rotate_xz_by(self, degrees: f32) -> Vec3 {
        let (sn, cs) = degrees.to_radians().sin_cos();
        Vec3 {
            x: self.x * cs - self.z * sn,
            y: self.y,
            z: self.x * sn + self.z * cs,
        }
    }

    /// Rotates around the X axis (in the YZ plane) by `degrees`.
    ///
    /// Positive angles turn +Y towards +Z.
    #[inline]
    pub fn rotate_yz_by(self, degrees: f32) -> Vec3 {
        let (sn, cs) = degrees.to_radians().sin_cos();
        Vec3 {
            x: self.x,
            y: self.y * cs - self.z * sn,
            z: self.y * sn + self.z * cs,
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<V3i> for Vec3 {
    #[inline]
    fn from(v: V3i) -> Self {
        Vec3::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

/// Integer grid position or direction. Used for chunk-local, world and chunk coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct V3i {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl V3i {
    pub const ZERO: V3i = V3i::new(0, 0, 0);
    pub const UP: V3i = V3i::new(0, 1, 0);
    pub const DOWN: V3i = V3i::new(0, -1, 0);

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn splat(v: i32) -> Self {
        Self { x: v, y: v, z: v }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Euclidean division by `size` on every axis (floor semantics for negatives).
    #[inline]
    pub fn div_floor(self, size: i32) -> Self {
        Self::new(
            self.x.div_euclid(size),
            self.y.div_euclid(size),
            self.z.div_euclid(size),
        )
    }

    /// Remainder matching [`V3i::div_floor`]; always in `[0, size)`.
    #[inline]
    pub fn rem_floor(self, size: i32) -> Self {
        Self::new(
            self.x.rem_euclid(size),
            self.y.rem_euclid(size),
            self.z.rem_euclid(size),
        )
    }
}

impl Add for V3i {
    type Output = V3i;
    #[inline]
    fn add(self, rhs: V3i) -> V3i {
        V3i::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for V3i {
    type Output = V3i;
    #[inline]
    fn sub(self, rhs: V3i) -> V3i {
        V3i::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<i32> for V3i {
    type Output = V3i;
    #[inline]
    fn mul(self, rhs: i32) -> V3i {
        V3i::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for V3i {
    type Output = V3i;
    #[inline]
    fn neg(self) -> V3i {
        V3i::new(-self.x, -self.y, -self.z)
    }
}

impl From<(i32, i32, i32)> for V3i {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Inverted box that any [`Aabb::include`] call will snap onto.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn include(&mut self, p: Vec3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    #[inline]
    pub fn union(mut self, other: &Aabb) -> Aabb {
        if other.is_empty() {
            return self;
        }
        self.include(other.min);
        self.include(other.max);
        self
    }
}
