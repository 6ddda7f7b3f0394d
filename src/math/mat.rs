//! Dense square matrices (row-major storage)

use super::vec::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, Mul};

/// 3x3 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

/// 4x4 matrix, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat3 {
    pub const ZERO: Mat3 = Mat3 { m: [[0.0; 3]; 3] };

    pub fn identity() -> Self {
        let mut out = Self::ZERO;
        for i in 0..3 {
            out.m[i][i] = 1.0;
        }
        out
    }

    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self {
            m: [[r0.x, r0.y, r0.z], [r1.x, r1.y, r1.z], [r2.x, r2.y, r2.z]],
        }
    }

    pub fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self::from_rows(c0, c1, c2).transposed()
    }

    pub fn row(&self, i: usize) -> Vec3 {
        Vec3::new(self.m[i][0], self.m[i][1], self.m[i][2])
    }

    pub fn col(&self, j: usize) -> Vec3 {
        Vec3::new(self.m[0][j], self.m[1][j], self.m[2][j])
    }

    pub fn transposed(&self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.m[j][i] = self.m[i][j];
            }
        }
        out
    }
}

impl Mat4 {
    pub const ZERO: Mat4 = Mat4 { m: [[0.0; 4]; 4] };

    pub fn identity() -> Self {
        let mut out = Self::ZERO;
        for i in 0..4 {
            out.m[i][i] = 1.0;
        }
        out
    }

    pub fn from_rows(r0: Vec4, r1: Vec4, r2: Vec4, r3: Vec4) -> Self {
        Self {
            m: [
                [r0.x, r0.y, r0.z, r0.w],
                [r1.x, r1.y, r1.z, r1.w],
                [r2.x, r2.y, r2.z, r2.w],
                [r3.x, r3.y, r3.z, r3.w],
            ],
        }
    }

    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self::from_rows(c0, c1, c2, c3).transposed()
    }

    pub fn row(&self, i: usize) -> Vec4 {
        Vec4::new(self.m[i][0], self.m[i][1], self.m[i][2], self.m[i][3])
    }

    pub fn col(&self, j: usize) -> Vec4 {
        Vec4::new(self.m[0][j], self.m[1][j], self.m[2][j], self.m[3][j])
    }

    pub fn transposed(&self) -> Self {
        let mut out = Self::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.m[j][i] = self.m[i][j];
            }
        }
        out
    }
}

impl Index<(usize, usize)> for Mat3 {
    type Output = f32;
    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        &self.m[i][j]
    }
}

impl IndexMut<(usize, usize)> for Mat3 {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        &mut self.m[i][j]
    }
}

impl Index<(usize, usize)> for Mat4 {
    type Output = f32;
    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        &self.m[i][j]
    }
}

impl IndexMut<(usize, usize)> for Mat4 {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        &mut self.m[i][j]
    }
}

impl Mul for Mat3 {
    type Output = Mat3;
    fn mul(self, rhs: Mat3) -> Mat3 {
        let mut out = Mat3::ZERO;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = self.row(i).dot(rhs.col(j));
            }
        }
        out
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(self.row(0).dot(v), self.row(1).dot(v), self.row(2).dot(v))
    }
}

impl Mul for Mat4 {
    type Output = Mat4;
    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                out.m[i][j] = self.row(i).dot(rhs.col(j));
            }
        }
        out
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        Vec4::new(
            self.row(0).dot(v),
            self.row(1).dot(v),
            self.row(2).dot(v),
            self.row(3).dot(v),
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}
