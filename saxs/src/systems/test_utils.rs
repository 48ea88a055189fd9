use crate::{Vector3D, Matrix3};
use super::{UnitCell, SimpleSystem};

pub fn test_system(name: &str) -> SimpleSystem {
    match name {
        "methane" => get_methane(),
        "water" => get_water(),
        "CH" => get_ch(),
        "ZnSO4" => get_znso4(),
        "peptide" => get_peptide(),
        _ => panic!("unknown test system {}", name)
    }
}

/// Regular grid with `n x n x n` atoms separated by `spacing`, centered
/// around the origin, with an infinite cell.
pub fn grid_system(n: usize, spacing: f64) -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::infinite());
    let shift = 0.5 * (n - 1) as f64 * spacing;
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                system.add_atom(1, Vector3D::new(
                    i as f64 * spacing - shift,
                    j as f64 * spacing - shift,
                    k as f64 * spacing - shift,
                ));
            }
        }
    }
    return system;
}

fn get_methane() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(5.0));
    system.add_atom(6, Vector3D::new(5.0000, 5.0000, 5.0000));
    system.add_atom(1, Vector3D::new(5.5288, 5.1610, 5.9359));
    system.add_atom(1, Vector3D::new(5.2051, 5.8240, 4.3214));
    system.add_atom(1, Vector3D::new(5.3345, 4.0686, 4.5504));
    system.add_atom(1, Vector3D::new(3.9315, 4.9463, 5.1921));
    return system;
}

fn get_water() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(10.0));
    // types do not have to be atomic number
    system.add_atom(-42, Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom(1, Vector3D::new(0.0, 0.75545, -0.58895));
    system.add_atom(1, Vector3D::new(0.0, -0.75545, -0.58895));
    return system;
}

fn get_ch() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(10.0));
    system.add_atom(6, Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom(1, Vector3D::new(0.0, 1.2, 0.0));
    return system;
}

/// ZnS (O4) in wurtzite structure (triclinic cell)
fn get_znso4() -> SimpleSystem {
    let u = 3. / 8.;
    let c = f64::sqrt(1. / u);
    let cell = Matrix3::new([[0.5, -0.5 * f64::sqrt(3.0), 0.0], [0.5, 0.5 * f64::sqrt(3.0), 0.0], [0.0, 0.0, c]]);
    let mut system = SimpleSystem::new(UnitCell::from(cell));
    system.add_atom(16, Vector3D::new(0.5, 0.5 / f64::sqrt(3.0), 0.0));
    system.add_atom(30, Vector3D::new(0.5, 0.5 / f64::sqrt(3.0), u * c));
    system.add_atom(16, Vector3D::new(0.5, -0.5 / f64::sqrt(3.0), 0.5 * c));
    system.add_atom(30, Vector3D::new(0.5, -0.5 / f64::sqrt(3.0), (0.5 + u) * c));
    return system;
}

/// Heavy atoms of a small peptide fragment, without periodic boundary
/// conditions
fn get_peptide() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::infinite());
    system.add_atom(7, Vector3D::new(-2.983, -4.446, 6.956));
    system.add_atom(6, Vector3D::new(-3.068, -3.034, 6.533));
    system.add_atom(6, Vector3D::new(-1.618, -2.590, 6.320));
    system.add_atom(8, Vector3D::new(-0.816, -3.413, 5.843));
    system.add_atom(6, Vector3D::new(-3.830, -2.972, 5.206));
    system.add_atom(7, Vector3D::new(-1.274, -1.338, 6.602));
    system.add_atom(6, Vector3D::new(0.076, -0.849, 6.372));
    system.add_atom(6, Vector3D::new(0.180, 0.521, 7.016));
    system.add_atom(8, Vector3D::new(-0.755, 1.310, 7.042));
    system.add_atom(6, Vector3D::new(0.434, -0.782, 4.881));
    system.add_atom(6, Vector3D::new(1.881, -0.399, 4.584));
    system.add_atom(7, Vector3D::new(1.356, 0.788, 7.551));
    system.add_atom(6, Vector3D::new(1.574, 2.045, 8.254));
    system.add_atom(6, Vector3D::new(2.972, 2.552, 7.925));
    system.add_atom(8, Vector3D::new(3.893, 1.747, 7.773));
    system.add_atom(16, Vector3D::new(2.226, -0.306, 2.812));
    return system;
}
