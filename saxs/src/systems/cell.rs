//! The `UnitCell` type represents the periodic box enclosing a system, and
//! implements the minimum image convention used by direct summation.
use crate::{Error, Matrix3, Vector3D};

/// The shape of a cell determine how we will be able to compute the periodic
/// boundaries condition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub enum CellShape {
    /// Infinite unit cell, with no boundaries
    Infinite,
    /// Orthorhombic unit cell, with cuboid shape
    Orthorhombic,
    /// Triclinic unit cell, with arbitrary parallelepiped shape
    Triclinic,
}

/// An `UnitCell` defines the system physical boundaries.
///
/// The cell matrix contains the three lattice vectors as rows. The shape of
/// the cell can be any of the [`CellShape`], and will influence how periodic
/// boundary conditions are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct UnitCell {
    /// Unit cell matrix, with lattice vectors as rows
    matrix: Matrix3,
    /// Unit cell shape
    shape: CellShape,
}

impl From<Matrix3> for UnitCell {
    fn from(matrix: Matrix3) -> UnitCell {
        match UnitCell::new(matrix) {
            Ok(cell) => cell,
            Err(error) => panic!("{}", error),
        }
    }
}

impl UnitCell {
    /// Create a unit cell from a matrix containing the lattice vectors as
    /// rows.
    ///
    /// The matrix must be invertible, and its diagonal must be positive since
    /// the minimum image convention folds displacements by `H_ii`.
    pub fn new(matrix: Matrix3) -> Result<UnitCell, Error> {
        if !(matrix.determinant() > 1e-6) {
            return Err(Error::InvalidParameter("matrix is not invertible".into()));
        }

        if !(matrix[0][0] > 0.0 && matrix[1][1] > 0.0 && matrix[2][2] > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "the diagonal of the cell matrix must be positive, got [{}, {}, {}]",
                matrix[0][0], matrix[1][1], matrix[2][2]
            )));
        }

        let is_close_0 = |value| f64::abs(value) < 1e-6;
        let is_diagonal = |matrix: Matrix3| {
            is_close_0(matrix[0][1]) && is_close_0(matrix[0][2]) &&
            is_close_0(matrix[1][0]) && is_close_0(matrix[1][2]) &&
            is_close_0(matrix[2][0]) && is_close_0(matrix[2][1])
        };

        let shape = if is_diagonal(matrix) {
            CellShape::Orthorhombic
        } else {
            CellShape::Triclinic
        };

        return Ok(UnitCell {
            matrix: matrix,
            shape: shape
        });
    }

    /// Create an infinite unit cell, without periodic boundary conditions
    pub fn infinite() -> UnitCell {
        UnitCell {
            matrix: Matrix3::zero(),
            shape: CellShape::Infinite,
        }
    }

    /// Create an orthorhombic unit cell, with side lengths `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> UnitCell {
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Cell lengths must be positive");
        UnitCell {
            matrix: Matrix3::new([
                [a, 0.0, 0.0],
                [0.0, b, 0.0],
                [0.0, 0.0, c]
            ]),
            shape: CellShape::Orthorhombic,
        }
    }

    /// Create a cubic unit cell, with side lengths `length, length, length`.
    pub fn cubic(length: f64) -> UnitCell {
        UnitCell::orthorhombic(length, length, length)
    }

    /// Create a triclinic unit cell, with side lengths `a, b, c` and angles
    /// `alpha, beta, gamma` (in degrees). The first lattice vector is along
    /// `x` and the second one is in the `xy` plane.
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> UnitCell {
        assert!(a > 0.0 && b > 0.0 && c > 0.0, "Cell lengths must be positive");
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let b_x = b * cos_gamma;
        let b_y = b * sin_gamma;

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z = f64::sqrt(c * c - c_y * c_y - c_x * c_x);

        return UnitCell::from(Matrix3::new([
            [a,   0.0, 0.0],
            [b_x, b_y, 0.0],
            [c_x, c_y, c_z],
        ]));
    }

    /// Get the cell shape
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Check if this unit cell is infinite, *i.e.* if it does not have
    /// periodic boundary conditions.
    pub fn is_infinite(&self) -> bool {
        self.shape() == CellShape::Infinite
    }

    /// Get the matricial representation of the unit cell
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the volume of the cell, zero for infinite cells
    pub fn volume(&self) -> f64 {
        match self.shape {
            CellShape::Infinite => 0.0,
            CellShape::Orthorhombic => self.matrix[0][0] * self.matrix[1][1] * self.matrix[2][2],
            CellShape::Triclinic => self.matrix.determinant(),
        }
    }

    /// Get the reciprocal lattice vectors of this cell as the rows of a
    /// matrix, without the `2π` factor: `b_1 = (a_2 ^ a_3) / V` and so on for
    /// the other vectors.
    pub fn reciprocal(&self) -> Matrix3 {
        assert!(!self.is_infinite(), "can not compute the reciprocal of an infinite cell");
        return self.matrix.transposed().inverse();
    }
}

/// Geometric operations using periodic boundary conditions
impl UnitCell {
    /// Get the displacement from `a` to `b`, folded by the minimum image
    /// convention.
    ///
    /// This is a single pass, order-dependent approximation: starting from `b
    /// - a`, the third lattice vector is removed `floor(d_z / H_zz + 1/2)`
    /// times, then the second lattice vector `floor(d_y / H_yy + 1/2)` times,
    /// and finally the first lattice vector `floor(d_x / H_xx + 1/2)` times,
    /// each step using the displacement produced by the previous one. The
    /// result is the nearest image for orthorhombic and mildly skewed cells,
    /// but not necessarily for strongly skewed ones. Forces depend on this
    /// exact folding, so it must not be replaced by a search over images.
    #[inline]
    pub fn minimum_image_delta(&self, a: Vector3D, b: Vector3D) -> Vector3D {
        let mut delta = b - a;
        if self.is_infinite() {
            return delta;
        }

        let m = &self.matrix;
        for row in [2, 1, 0] {
            let shift = f64::floor(delta[row] / m[row][row] + 0.5);
            delta[0] -= shift * m[row][0];
            delta[1] -= shift * m[row][1];
            delta[2] -= shift * m[row][2];
        }

        return delta;
    }

    /// Periodic boundary conditions distance between the point `u` and
    /// the point `v`
    pub fn distance(&self, u: Vector3D, v: Vector3D) -> f64 {
        self.minimum_image_delta(u, v).norm()
    }
}
