//! Special functions used by the spherical harmonics expansion of the
//! scattering intensity.

#[cfg(feature = "expansion")]
mod spherical_bessel;
#[cfg(feature = "expansion")]
pub use self::spherical_bessel::{spherical_bessel_first_kind, SPHERICAL_BESSEL_MAX_ARGUMENT};

#[cfg(feature = "expansion")]
mod spherical_harmonics;
#[cfg(feature = "expansion")]
pub use self::spherical_harmonics::{SphericalHarmonics, lm_index, lm_count};

#[cfg(feature = "expansion")]
mod ladder;
#[cfg(feature = "expansion")]
pub use self::ladder::{LadderCoefficients, LADDER_COEFFICIENTS, LADDER_MAX_DEGREE};
