#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access, clippy::many_single_char_names)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

//! Small angle X-ray scattering intensity of atomic systems, and its
//! derivatives with respect to the atomic positions.
//!
//! The main entry point is the [`Calculator`], created from JSON formatted
//! [`SaxsParameters`] and the [`FormFactors`] of all atoms.

pub mod types;
pub use types::*;

pub mod math;

mod errors;
pub use self::errors::Error;

pub mod systems;
pub use systems::{System, SimpleSystem, UnitCell};

pub mod scattering;
pub use self::scattering::{ScatteringVector, ScatteringVectors};

pub mod form_factors;
pub use self::form_factors::{FormFactors, FormFactorProvider, PolynomialFormFactors};

pub mod calculators;

mod calculator;
pub use calculator::{Calculator, Intensities, SaxsParameters, ScatteringVectorsParameters, Backend};
pub use calculators::InterfaceParameters;
