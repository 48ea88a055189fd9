use crate::{Error, Vector3D};

mod cell;
pub use self::cell::{UnitCell, CellShape};

mod simple_system;
pub use self::simple_system::SimpleSystem;

mod chemfiles;
pub use self::chemfiles::read_from_file;

#[cfg(test)]
pub(crate) mod test_utils;

/// A `System` provides the atoms and periodic box for one evaluation of the
/// scattering intensity. The data is only read during the evaluation, and
/// can be modified by the caller between evaluations.
pub trait System: Send + Sync {
    /// Get the unit cell for this system
    fn cell(&self) -> Result<UnitCell, Error>;

    /// Get the number of atoms in this system
    fn size(&self) -> Result<usize, Error>;

    /// Get the atomic types for all atoms in this system. The returned value
    /// must be a slice of length `self.size()`, where each different atomic
    /// type is identified with a different integer value. These values are
    /// usually the atomic number, but don't have to.
    fn types(&self) -> Result<&[i32], Error>;

    /// Get the positions for all atoms in this system. The returned value must
    /// be a slice of length `self.size()` containing the Cartesian coordinates
    /// of all atoms in the system.
    fn positions(&self) -> Result<&[Vector3D], Error>;
}
