use std::path::Path;

use super::SimpleSystem;
use crate::Error;

#[cfg(feature = "chemfiles")]
impl From<chemfiles::Error> for Error {
    fn from(error: chemfiles::Error) -> Error {
        Error::Chemfiles(error.message)
    }
}

/// Read all structures in the file at the given `path` using
/// [chemfiles](https://chemfiles.org/), and convert them to `SimpleSystem`s.
///
/// The atomic type of each atom is its atomic number, or a number starting at
/// 120 for atoms chemfiles does not recognize as an element.
#[cfg(feature = "chemfiles")]
pub fn read_from_file(path: impl AsRef<Path>) -> Result<Vec<SimpleSystem>, Error> {
    use std::collections::HashMap;
    use crate::Matrix3;
    use crate::systems::UnitCell;

    let mut systems = Vec::new();

    let mut trajectory = chemfiles::Trajectory::open(path, 'r')?;
    let mut frame = chemfiles::Frame::new();

    let mut assigned_types = HashMap::new();
    let mut get_type = |atom: chemfiles::AtomRef| {
        let atomic_number = atom.atomic_number();
        if atomic_number == 0 {
            let new_type = 120 + assigned_types.len() as i32;
            *assigned_types.entry(atom.atomic_type()).or_insert(new_type)
        } else {
            atomic_number as i32
        }
    };

    for _ in 0..trajectory.nsteps() {
        trajectory.read(&mut frame)?;

        let cell = if frame.cell().shape() == chemfiles::CellShape::Infinite {
            UnitCell::infinite()
        } else {
            // chemfiles stores the cell vectors as columns
            UnitCell::new(Matrix3::from(frame.cell().matrix()).transposed())?
        };

        let mut system = SimpleSystem::new(cell);
        for (i, &position) in frame.positions().iter().enumerate() {
            system.add_atom(get_type(frame.atom(i)), position.into());
        }

        systems.push(system);
    }

    return Ok(systems);
}

/// Read all structures in the file at the given `path`. This requires the
/// `chemfiles` feature of this crate.
#[cfg(not(feature = "chemfiles"))]
pub fn read_from_file(_: impl AsRef<Path>) -> Result<Vec<SimpleSystem>, Error> {
    Err(Error::Chemfiles(
        "read_from_file is only available with the chemfiles feature enabled".into()
    ))
}
