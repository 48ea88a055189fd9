//! 3-dimensional vector type
use std::ops::{Add, Sub, Neg, Mul, Div, BitXor, Index, IndexMut};
use std::ops::{AddAssign, SubAssign, MulAssign, DivAssign, Deref, DerefMut};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

use super::Matrix3;

/// A 3-dimensional vector type, used for atomic positions, displacements,
/// scattering vectors and per-atom derivatives.
///
/// A `Vector3D` implement all the arithmetic operations:
///
/// ```
/// # use saxs::Vector3D;
/// let u = Vector3D::new(1.0, 2.0, 3.0);
/// let v = Vector3D::new(4.0, -2.0, 1.0);
///
/// // Indexing
/// assert_eq!(u[0], 1.0);
/// assert_eq!(u[1], 2.0);
/// assert_eq!(u[2], 3.0);
///
/// // Addition
/// let w = u + v;
/// assert_eq!(w, Vector3D::new(5.0, 0.0, 4.0));
///
/// // Subtraction
/// let w = u - v;
/// assert_eq!(w, Vector3D::new(-3.0, 4.0, 2.0));
///
/// // Negation
/// let w = -u;
/// assert_eq!(w, Vector3D::new(-1.0, -2.0, -3.0));
///
/// // Cross product
/// let w = u ^ v;
/// assert_eq!(w, Vector3D::new(8.0, 11.0, -10.0));
///
/// // Multiplication
/// let w = 2.0 * u;
/// assert_eq!(w, Vector3D::new(2.0, 4.0, 6.0));
///
/// let w = u * 1.5;
/// assert_eq!(w, Vector3D::new(1.5, 3.0, 4.5));
///
/// // Division
/// let w = u / 2.0;
/// assert_eq!(w, Vector3D::new(0.5, 1.0, 1.5));
///
/// // Dot product
/// let a = u * v;
/// assert_eq!(a, 3.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[repr(transparent)]
pub struct Vector3D([f64; 3]);

impl Vector3D {
    /// Create a new `Vector3D` with components `x`, `y`, `z`
    pub const fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D([x, y, z])
    }

    /// Create a new `Vector3D` with all components set to zero
    pub const fn zero() -> Vector3D {
        Vector3D([0.0, 0.0, 0.0])
    }

    /// Return the squared euclidean norm of a `Vector3D`
    #[inline]
    pub fn norm2(&self) -> f64 {
        self * self
    }

    /// Return the euclidean norm of a `Vector3D`
    #[inline]
    pub fn norm(&self) -> f64 {
        f64::sqrt(self.norm2())
    }

    /// Normalize a `Vector3D`
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Vector3D {
        self / self.norm()
    }

    /// Tensorial product between vectors, `self ⊗ other`.
    pub fn tensorial(&self, other: &Vector3D) -> Matrix3 {
        let x = Vector3D::new(self[0] * other[0], self[0] * other[1], self[0] * other[2]);
        let y = Vector3D::new(self[1] * other[0], self[1] * other[1], self[1] * other[2]);
        let z = Vector3D::new(self[2] * other[0], self[2] * other[1], self[2] * other[2]);
        return Matrix3::new([*x, *y, *z]);
    }

    /// Component-wise minimum of `self` and `other`
    #[must_use]
    pub fn min(&self, other: &Vector3D) -> Vector3D {
        Vector3D::new(
            f64::min(self[0], other[0]),
            f64::min(self[1], other[1]),
            f64::min(self[2], other[2]),
        )
    }

    /// Component-wise maximum of `self` and `other`
    #[must_use]
    pub fn max(&self, other: &Vector3D) -> Vector3D {
        Vector3D::new(
            f64::max(self[0], other[0]),
            f64::max(self[1], other[1]),
            f64::max(self[2], other[2]),
        )
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(array: [f64; 3]) -> Vector3D {
        Vector3D(array)
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(vector: Vector3D) -> [f64; 3] {
        vector.0
    }
}

impl Deref for Vector3D {
    type Target = [f64; 3];
    #[inline]
    fn deref(&self) -> &[f64; 3] {
        &self.0
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut [f64; 3] {
        &mut self.0
    }
}

impl Index<usize> for Vector3D {
    type Output = f64;
    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vector3D {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl_arithmetic!(
    Vector3D, Vector3D, Add, add, Vector3D,
    self, other,
    Vector3D::new(self[0] + other[0], self[1] + other[1], self[2] + other[2])
);

impl_arithmetic!(
    Vector3D, Vector3D, Sub, sub, Vector3D,
    self, other,
    Vector3D::new(self[0] - other[0], self[1] - other[1], self[2] - other[2])
);

// Cross product
impl_arithmetic!(
    Vector3D, Vector3D, BitXor, bitxor, Vector3D,
    self, other,
    {
        let x = self[1] * other[2] - self[2] * other[1];
        let y = self[2] * other[0] - self[0] * other[2];
        let z = self[0] * other[1] - self[1] * other[0];
        Vector3D::new(x, y, z)
    }
);

// Dot product
impl_arithmetic!(
    Vector3D, Vector3D, Mul, mul, f64,
    self, other,
    self[0] * other[0] + self[1] * other[1] + self[2] * other[2]
);

lsh_scal_arithmetic!(
    Vector3D, Mul, mul, Vector3D,
    self, other,
    Vector3D::new(self[0] * other, self[1] * other, self[2] * other)
);

rhs_scal_arithmetic!(
    Vector3D, Mul, mul, Vector3D,
    self, other,
    Vector3D::new(self * other[0], self * other[1], self * other[2])
);

lsh_scal_arithmetic!(
    Vector3D, Div, div, Vector3D,
    self, other,
    Vector3D::new(self[0] / other, self[1] / other, self[2] / other)
);

impl_inplace_arithmetic!(
    Vector3D, Vector3D, AddAssign, add_assign,
    self, other,
    {
        self[0] += other[0];
        self[1] += other[1];
        self[2] += other[2];
    }
);

impl_inplace_arithmetic!(
    Vector3D, Vector3D, SubAssign, sub_assign,
    self, other,
    {
        self[0] -= other[0];
        self[1] -= other[1];
        self[2] -= other[2];
    }
);

impl MulAssign<f64> for Vector3D {
    #[inline]
    fn mul_assign(&mut self, other: f64) {
        self[0] *= other;
        self[1] *= other;
        self[2] *= other;
    }
}

impl DivAssign<f64> for Vector3D {
    #[inline]
    fn div_assign(&mut self, other: f64) {
        self[0] /= other;
        self[1] /= other;
        self[2] /= other;
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;
    #[inline]
    fn neg(self) -> Vector3D {
        Vector3D::new(-self[0], -self[1], -self[2])
    }
}

impl<'a> Neg for &'a Vector3D {
    type Output = Vector3D;
    #[inline]
    fn neg(self) -> Vector3D {
        Vector3D::new(-self[0], -self[1], -self[2])
    }
}

impl num_traits::Zero for Vector3D {
    fn zero() -> Vector3D {
        Vector3D::zero()
    }

    fn is_zero(&self) -> bool {
        self[0] == 0.0 && self[1] == 0.0 && self[2] == 0.0
    }
}

impl std::iter::Sum for Vector3D {
    fn sum<I: Iterator<Item = Vector3D>>(iter: I) -> Vector3D {
        iter.fold(Vector3D::zero(), |acc, v| acc + v)
    }
}

impl AbsDiffEq for Vector3D {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self[0], &other[0], epsilon) &&
        f64::abs_diff_eq(&self[1], &other[1], epsilon) &&
        f64::abs_diff_eq(&self[2], &other[2], epsilon)
    }
}

impl RelativeEq for Vector3D {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        f64::relative_eq(&self[0], &other[0], epsilon, max_relative) &&
        f64::relative_eq(&self[1], &other[1], epsilon, max_relative) &&
        f64::relative_eq(&self[2], &other[2], epsilon, max_relative)
    }
}

impl UlpsEq for Vector3D {
    fn default_max_ulps() -> u32 {
        f64::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        f64::ulps_eq(&self[0], &other[0], epsilon, max_ulps) &&
        f64::ulps_eq(&self[1], &other[1], epsilon, max_ulps) &&
        f64::ulps_eq(&self[2], &other[2], epsilon, max_ulps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_ulps_eq;

    #[test]
    fn add() {
        let mut a = Vector3D::new(2.0, 3.5, 4.8);
        let b = Vector3D::new(6.1, -8.5, 7.3);

        let c = a + b;
        assert_ulps_eq!(c, Vector3D::new(8.1, -5.0, 12.1));

        a += b;
        assert_ulps_eq!(a, Vector3D::new(8.1, -5.0, 12.1));

        // references
        assert_ulps_eq!(&a + &b, Vector3D::new(14.2, -13.5, 19.4));
        assert_ulps_eq!(a + &b, Vector3D::new(14.2, -13.5, 19.4));
    }

    #[test]
    fn sub() {
        let mut a = Vector3D::new(2.0, 3.5, 4.8);
        let b = Vector3D::new(6.1, -8.5, 7.3);

        let c = a - b;
        assert_ulps_eq!(c, Vector3D::new(-4.1, 12.0, -2.5));

        a -= b;
        assert_ulps_eq!(a, Vector3D::new(-4.1, 12.0, -2.5));
    }

    #[test]
    fn scalar() {
        let mut a = Vector3D::new(2.0, 3.5, 4.8);
        assert_eq!(a * 2.0, Vector3D::new(4.0, 7.0, 9.6));
        assert_eq!(2.0 * a, Vector3D::new(4.0, 7.0, 9.6));
        assert_eq!(a / 2.0, Vector3D::new(1.0, 1.75, 2.4));

        a *= 2.0;
        assert_eq!(a, Vector3D::new(4.0, 7.0, 9.6));
        a /= 4.0;
        assert_eq!(a, Vector3D::new(1.0, 1.75, 2.4));
    }

    #[test]
    fn dot_cross() {
        let a = Vector3D::new(1.0, 0.0, 0.0);
        let b = Vector3D::new(0.0, 1.0, 0.0);
        assert_eq!(a * b, 0.0);
        assert_eq!(a ^ b, Vector3D::new(0.0, 0.0, 1.0));
        assert_eq!(b ^ a, Vector3D::new(0.0, 0.0, -1.0));

        let c = Vector3D::new(3.0, -2.0, 5.0);
        assert_eq!(c * c, c.norm2());
        assert_eq!(c.norm(), f64::sqrt(38.0));
        assert_ulps_eq!(c.normalized().norm(), 1.0);
    }

    #[test]
    fn tensorial() {
        let a = Vector3D::new(1.0, 2.0, 3.0);
        let b = Vector3D::new(4.0, 5.0, 6.0);
        let matrix = a.tensorial(&b);
        assert_eq!(matrix[0], [4.0, 5.0, 6.0]);
        assert_eq!(matrix[1], [8.0, 10.0, 12.0]);
        assert_eq!(matrix[2], [12.0, 15.0, 18.0]);
    }

    #[test]
    fn min_max() {
        let a = Vector3D::new(1.0, -2.0, 3.0);
        let b = Vector3D::new(-4.0, 5.0, 3.0);
        assert_eq!(a.min(&b), Vector3D::new(-4.0, -2.0, 3.0));
        assert_eq!(a.max(&b), Vector3D::new(1.0, 5.0, 3.0));
    }

    #[test]
    fn sum() {
        let vectors = [
            Vector3D::new(1.0, -2.0, 3.0),
            Vector3D::new(-4.0, 5.0, 3.0),
        ];
        assert_eq!(vectors.iter().copied().sum::<Vector3D>(), Vector3D::new(-3.0, 3.0, 6.0));
    }
}
