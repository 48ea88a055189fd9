use crate::Error;

use super::{UnitCell, System, Vector3D};

/// A simple implementation of `System` to use when no other is available
#[derive(Clone, Debug)]
pub struct SimpleSystem {
    cell: UnitCell,
    types: Vec<i32>,
    positions: Vec<Vector3D>,
}

impl SimpleSystem {
    /// Create a new empty system with the given unit cell
    pub fn new(cell: UnitCell) -> SimpleSystem {
        SimpleSystem {
            cell: cell,
            types: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Add an atom with the given atomic type and position to this system
    pub fn add_atom(&mut self, atomic_type: i32, position: Vector3D) {
        self.types.push(atomic_type);
        self.positions.push(position);
    }

    /// Get mutable access to the positions, to move atoms between two
    /// evaluations
    pub fn positions_mut(&mut self) -> &mut [Vector3D] {
        &mut self.positions
    }

    /// Change the unit cell of this system
    pub fn set_cell(&mut self, cell: UnitCell) {
        self.cell = cell;
    }
}

impl System for SimpleSystem {
    fn size(&self) -> Result<usize, Error> {
        Ok(self.types.len())
    }

    fn positions(&self) -> Result<&[Vector3D], Error> {
        Ok(&self.positions)
    }

    fn types(&self) -> Result<&[i32], Error> {
        Ok(&self.types)
    }

    fn cell(&self) -> Result<UnitCell, Error> {
        Ok(self.cell)
    }
}

impl std::convert::TryFrom<&dyn System> for SimpleSystem {
    type Error = Error;

    fn try_from(system: &dyn System) -> Result<SimpleSystem, Error> {
        let mut new = SimpleSystem::new(system.cell()?);
        for (&atomic_type, &position) in system.types()?.iter().zip(system.positions()?) {
            new.add_atom(atomic_type, position);
        }
        return Ok(new);
    }
}
