//! Engines computing the scattering intensity and its derivatives.

use crate::Vector3D;
use crate::systems::UnitCell;
use crate::form_factors::FormFactors;
use crate::scattering::ScatteringVectors;

pub mod parallel;
pub use self::parallel::{ParallelReduction, Reduce};

pub mod planner;
pub use self::planner::{AlgorithmPartition, ExpansionMode};

pub mod interface;
pub use self::interface::{InterfaceParameters, InterfaceWeights};

pub mod direct;
pub use self::direct::{DirectBackend, ScalarDirect, BatchedDirect};

#[cfg(feature = "expansion")]
pub mod expansion;
#[cfg(feature = "expansion")]
pub use self::expansion::HarmonicExpansion;

#[cfg(test)]
pub(crate) mod tests_utils;

/// Input data for one evaluation of the intensity
#[derive(Clone, Copy)]
pub struct EngineInput<'a> {
    /// positions of all atoms
    pub positions: &'a [Vector3D],
    /// unit cell used for the minimum image convention. The harmonic
    /// expansion ignores periodic boundary conditions.
    pub cell: &'a UnitCell,
    /// all the scattering vectors, engines only use the ones they are asked
    /// to compute
    pub vectors: &'a ScatteringVectors,
    /// amplitudes for all scattering vectors and atoms
    pub form_factors: &'a FormFactors,
    /// weights of the atoms close to an interface, multiplying the
    /// amplitudes. Only direct summation supports them.
    pub interface: Option<&'a InterfaceWeights>,
}
