//! 3x3 matrix type
use std::ops::{Add, Sub, Mul, Index, IndexMut};
use std::ops::{AddAssign, SubAssign, Deref, DerefMut};

use approx::{AbsDiffEq, RelativeEq};

use super::Vector3D;

/// A 3x3 square matrix type, stored in row-major order.
///
/// `Matrix3` implements all the usual arithmetic operations:
///
/// ```
/// # use saxs::{Matrix3, Vector3D};
/// let one = Matrix3::one();
/// let a = Matrix3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 10.0]]);
///
/// // Indexing
/// assert_eq!(a[0][1], 2.0);
/// assert_eq!(a[2][2], 10.0);
///
/// // Addition and subtraction
/// assert_eq!((a + one)[0][0], 2.0);
/// assert_eq!((a - one)[1][1], 4.0);
///
/// // Matrix-matrix and matrix-vector multiplication
/// assert_eq!(one * a, a);
/// assert_eq!(a * Vector3D::new(1.0, 0.0, 0.0), Vector3D::new(1.0, 4.0, 7.0));
///
/// // Scalar multiplication
/// assert_eq!((2.0 * one)[2][2], 2.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[repr(transparent)]
pub struct Matrix3([[f64; 3]; 3]);

impl Matrix3 {
    /// Create a new `Matrix3` from rows
    pub const fn new(data: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(data)
    }

    /// Create a new `Matrix3` with all elements set to zero
    pub const fn zero() -> Matrix3 {
        Matrix3([[0.0; 3]; 3])
    }

    /// Create a new identity `Matrix3`
    pub const fn one() -> Matrix3 {
        Matrix3([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Compute the trace of the matrix
    pub fn trace(&self) -> f64 {
        self[0][0] + self[1][1] + self[2][2]
    }

    /// Computes the determinant of the matrix
    pub fn determinant(&self) -> f64 {
        let m = self;
        let x = m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2]);
        let y = m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]);
        let z = m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        return x - y + z;
    }

    /// Computes the inverse of a matrix.
    ///
    /// # Panics
    ///
    /// If the matrix is not invertible, *i.e.* if its determinant is zero.
    #[must_use]
    pub fn inverse(&self) -> Matrix3 {
        let determinant = self.determinant();
        assert!(determinant.abs() > f64::EPSILON, "this matrix is not invertible");

        let m = self;
        let inv_det = 1.0 / determinant;
        let mut res = Matrix3::zero();
        res[0][0] = (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * inv_det;
        res[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        res[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        res[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        res[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        res[1][2] = (m[1][0] * m[0][2] - m[0][0] * m[1][2]) * inv_det;
        res[2][0] = (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * inv_det;
        res[2][1] = (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * inv_det;
        res[2][2] = (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * inv_det;
        return res;
    }

    /// Transpose this matrix into a new matrix
    #[must_use]
    pub fn transposed(&self) -> Matrix3 {
        let m = self;
        Matrix3::new([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    fn from(data: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(data)
    }
}

impl Deref for Matrix3 {
    type Target = [[f64; 3]; 3];
    #[inline]
    fn deref(&self) -> &[[f64; 3]; 3] {
        &self.0
    }
}

impl DerefMut for Matrix3 {
    #[inline]
    fn deref_mut(&mut self) -> &mut [[f64; 3]; 3] {
        &mut self.0
    }
}

impl Index<usize> for Matrix3 {
    type Output = [f64; 3];
    #[inline]
    fn index(&self, index: usize) -> &[f64; 3] {
        &self.0[index]
    }
}

impl IndexMut<usize> for Matrix3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut [f64; 3] {
        &mut self.0[index]
    }
}

impl_arithmetic!(
    Matrix3, Matrix3, Add, add, Matrix3,
    self, other,
    {
        let mut res = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                res[i][j] = self[i][j] + other[i][j];
            }
        }
        res
    }
);

impl_arithmetic!(
    Matrix3, Matrix3, Sub, sub, Matrix3,
    self, other,
    {
        let mut res = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                res[i][j] = self[i][j] - other[i][j];
            }
        }
        res
    }
);

impl_arithmetic!(
    Matrix3, Matrix3, Mul, mul, Matrix3,
    self, other,
    {
        let mut res = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    res[i][j] += self[i][k] * other[k][j];
                }
            }
        }
        res
    }
);

impl_arithmetic!(
    Matrix3, Vector3D, Mul, mul, Vector3D,
    self, vector,
    {
        let x = self[0][0] * vector[0] + self[0][1] * vector[1] + self[0][2] * vector[2];
        let y = self[1][0] * vector[0] + self[1][1] * vector[1] + self[1][2] * vector[2];
        let z = self[2][0] * vector[0] + self[2][1] * vector[1] + self[2][2] * vector[2];
        Vector3D::new(x, y, z)
    }
);

lsh_scal_arithmetic!(
    Matrix3, Mul, mul, Matrix3,
    self, other,
    {
        let mut res = Matrix3::zero();
        for i in 0..3 {
            for j in 0..3 {
                res[i][j] = self[i][j] * other;
            }
        }
        res
    }
);

rhs_scal_arithmetic!(
    Matrix3, Mul, mul, Matrix3,
    self, other,
    other * self
);

impl_inplace_arithmetic!(
    Matrix3, Matrix3, AddAssign, add_assign,
    self, other,
    {
        for i in 0..3 {
            for j in 0..3 {
                self[i][j] += other[i][j];
            }
        }
    }
);

impl_inplace_arithmetic!(
    Matrix3, Matrix3, SubAssign, sub_assign,
    self, other,
    {
        for i in 0..3 {
            for j in 0..3 {
                self[i][j] -= other[i][j];
            }
        }
    }
);

impl AbsDiffEq for Matrix3 {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.iter().flatten().zip(other.iter().flatten())
            .all(|(a, b)| f64::abs_diff_eq(a, b, epsilon))
    }
}

impl RelativeEq for Matrix3 {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.iter().flatten().zip(other.iter().flatten())
            .all(|(a, b)| f64::relative_eq(a, b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn determinant() {
        let a = Matrix3::new([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        assert_eq!(a.determinant(), 1.0);
        assert_eq!(Matrix3::one().determinant(), 1.0);
        assert_eq!(Matrix3::zero().determinant(), 0.0);
    }

    #[test]
    fn inverse() {
        let a = Matrix3::new([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        let inverse = a.inverse();
        assert_eq!(inverse, Matrix3::new([[-24.0, 18.0, 5.0], [20.0, -15.0, -4.0], [-5.0, 4.0, 1.0]]));
        assert_relative_eq!(a * inverse, Matrix3::one(), epsilon = 1e-12);
    }

    #[test]
    #[should_panic = "this matrix is not invertible"]
    fn singular_inverse() {
        let _ = Matrix3::zero().inverse();
    }

    #[test]
    fn transposed() {
        let a = Matrix3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let b = a.transposed();
        assert_eq!(b[0], [1.0, 4.0, 7.0]);
        assert_eq!(b[1], [2.0, 5.0, 8.0]);
        assert_eq!(b[2], [3.0, 6.0, 9.0]);
        assert_eq!(a.trace(), 15.0);
    }

    #[test]
    fn arithmetic() {
        let a = Matrix3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let mut b = Matrix3::zero();
        b += a;
        b += a;
        assert_eq!(b, 2.0 * a);
        assert_eq!(b - a, a);
        b -= a;
        assert_eq!(b, a);

        let v = Vector3D::new(1.0, 1.0, 1.0);
        assert_eq!(a * v, Vector3D::new(6.0, 15.0, 24.0));
    }
}
