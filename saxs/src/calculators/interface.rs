//! Weighting of the atoms close to an interface.
//!
//! When computing the scattering of a slab or of a liquid close to a wall,
//! atoms are weighted by a Fermi-Dirac function of their `z` coordinate:
//! `w(z) = 1 / (1 + exp((z - z0) / width))`. Atoms with `w(z) <= min_weight`
//! (that is `z >= z_max`) are removed from the calculation. The intensity
//! becomes `Σ_ij w_i w_j f_i f_j K(q, r_ij)`, and the derivative with respect
//! to `z_i` gains a contribution from the weight itself.

use crate::{Error, Vector3D};

fn default_z0() -> f64 {
    0.8
}

fn default_width() -> f64 {
    0.05
}

fn default_min_weight() -> f64 {
    0.001
}

/// Parameters of the interface weighting
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InterfaceParameters {
    /// Position of the interface along `z`, where atoms have a weight of 1/2
    #[serde(default = "default_z0")]
    pub z0: f64,
    /// Width of the interface
    #[serde(default = "default_width")]
    pub width: f64,
    /// Atoms with a weight below this value are ignored
    #[serde(default = "default_min_weight")]
    pub min_weight: f64,
}

impl Default for InterfaceParameters {
    fn default() -> InterfaceParameters {
        InterfaceParameters {
            z0: default_z0(),
            width: default_width(),
            min_weight: default_min_weight(),
        }
    }
}

impl InterfaceParameters {
    /// Check that these parameters define a valid weighting function
    pub fn validate(&self) -> Result<(), Error> {
        if !self.z0.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "the interface position must be finite, got {}", self.z0
            )));
        }

        if !(self.width > 0.0) || !self.width.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "the interface width must be positive, got {}", self.width
            )));
        }

        if !(self.min_weight > 0.0 && self.min_weight < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "the minimal interface weight must be between 0 and 1, got {}", self.min_weight
            )));
        }

        Ok(())
    }

    /// Get the `z` coordinate above which atoms are ignored, where the weight
    /// is equal to `min_weight`
    pub fn z_max(&self) -> f64 {
        self.width * f64::ln(1.0 / self.min_weight - 1.0) + self.z0
    }

    /// Compute the weights of all atoms at the given `positions`
    #[time_graph::instrument(name = "InterfaceParameters::weights")]
    pub fn weights(&self, positions: &[Vector3D]) -> InterfaceWeights {
        let z_max = self.z_max();

        let mut weights = Vec::with_capacity(positions.len());
        let mut slopes = Vec::with_capacity(positions.len());
        for position in positions {
            let z = position[2];
            if z < z_max {
                let weight = 1.0 / (1.0 + f64::exp((z - self.z0) / self.width));
                weights.push(weight);
                slopes.push(-(1.0 - weight) / self.width);
            } else {
                weights.push(0.0);
                slopes.push(0.0);
            }
        }

        return InterfaceWeights {
            weights: weights,
            slopes: slopes,
        };
    }
}

/// Weights of all atoms for one evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceWeights {
    /// weight of each atom, zero for the atoms above `z_max`
    pub weights: Vec<f64>,
    /// logarithmic derivative of the weight with respect to `z`,
    /// `w'(z) / w(z)` for each atom, zero for the atoms above `z_max`
    pub slopes: Vec<f64>,
}

impl InterfaceWeights {
    /// Number of atoms with a non-zero weight
    pub fn n_included(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}
