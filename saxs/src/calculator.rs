use std::borrow::Cow;

use log::{debug, info};
use ndarray::Array2;

use crate::{Error, Matrix3, Vector3D};
use crate::systems::{System, UnitCell};
use crate::form_factors::FormFactors;
use crate::scattering::ScatteringVectors;

use crate::calculators::{EngineInput, ParallelReduction};
use crate::calculators::{AlgorithmPartition, ExpansionMode};
use crate::calculators::{DirectBackend, ScalarDirect, BatchedDirect};
use crate::calculators::planner;
use crate::calculators::InterfaceParameters;

/// Scattering vectors at which the intensity should be computed
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
#[serde(tag = "type")]
pub enum ScatteringVectorsParameters {
    /// Orientationally averaged scattering vectors with the given norms,
    /// using the Debye kernel `sin(qr) / qr`
    Norms {
        /// norms of the scattering vectors, positive and in strictly
        /// ascending order
        values: Vec<f64>,
    },
    /// Oriented scattering vectors, using the kernel `cos(q·r)`
    Vectors {
        /// Cartesian components of the scattering vectors, with norms in
        /// strictly ascending order
        values: Vec<[f64; 3]>,
    },
    /// Oriented scattering vectors at the reciprocal lattice points of a
    /// cell
    MillerIndices {
        /// reference cell matrix, with lattice vectors as rows. If this is
        /// not given, the scattering vectors are computed from the cell of
        /// each system, and follow changes of the cell.
        #[serde(default)]
        cell: Option<[[f64; 3]; 3]>,
        /// `[h, k, l]` Miller indices, giving vectors with strictly
        /// ascending norms
        indices: Vec<[i32; 3]>,
    },
}

impl ScatteringVectorsParameters {
    fn build(&self) -> Result<VectorsSource, Error> {
        match self {
            ScatteringVectorsParameters::Norms { values } => {
                ScatteringVectors::from_norms(values).map(VectorsSource::Fixed)
            }
            ScatteringVectorsParameters::Vectors { values } => {
                let values = values.iter().map(|&v| Vector3D::from(v)).collect::<Vec<_>>();
                ScatteringVectors::from_vectors(&values).map(VectorsSource::Fixed)
            }
            ScatteringVectorsParameters::MillerIndices { cell: Some(cell), indices } => {
                let matrix = Matrix3::new(*cell);
                if !(matrix.determinant() > 1e-6) {
                    return Err(Error::InvalidParameter(
                        "the reference cell for Miller indices must have a positive volume".into()
                    ));
                }
                let cell = UnitCell::new(matrix)?;
                ScatteringVectors::from_miller_indices(&cell, indices).map(VectorsSource::Fixed)
            }
            ScatteringVectorsParameters::MillerIndices { cell: None, indices } => {
                if indices.is_empty() {
                    return Err(Error::InvalidParameter(
                        "the list of scattering vectors can not be empty".into()
                    ));
                }

                if let Some(i) = indices.iter().position(|&index| index == [0, 0, 0]) {
                    return Err(Error::InvalidParameter(format!(
                        "scattering vector {} must have a positive norm, got Miller indices [0, 0, 0]", i
                    )));
                }

                Ok(VectorsSource::SystemCell(indices.clone()))
            }
        }
    }

    fn is_orientationally_averaged(&self) -> bool {
        matches!(self, ScatteringVectorsParameters::Norms { .. })
    }
}

/// Where the scattering vectors of a calculator come from
#[derive(Debug, Clone)]
enum VectorsSource {
    /// the same scattering vectors are used for all systems
    Fixed(ScatteringVectors),
    /// Miller indices, converted to scattering vectors with the cell of each
    /// system
    SystemCell(Vec<[i32; 3]>),
}

impl VectorsSource {
    fn len(&self) -> usize {
        match self {
            VectorsSource::Fixed(vectors) => vectors.len(),
            VectorsSource::SystemCell(indices) => indices.len(),
        }
    }

    fn for_system(&self, system: &dyn System) -> Result<Cow<'_, ScatteringVectors>, Error> {
        match self {
            VectorsSource::Fixed(vectors) => Ok(Cow::Borrowed(vectors)),
            VectorsSource::SystemCell(indices) => {
                let cell = system.cell()?;
                if cell.is_infinite() {
                    return Err(Error::InvalidInput(
                        "Miller indices without a reference cell require a system with a periodic cell".into()
                    ));
                }
                ScatteringVectors::from_miller_indices(&cell, indices).map(Cow::Owned)
            }
        }
    }
}

/// Implementation of the direct summation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum Backend {
    /// Double precision, distributed over the workers
    #[serde(rename = "scalar")]
    Scalar,
    /// Single precision, using full `N x N` arrays
    #[serde(rename = "batched")]
    Batched,
}

impl Default for Backend {
    fn default() -> Backend {
        Backend::Scalar
    }
}

fn default_periodic() -> bool {
    true
}

/// Parameters for the SAXS intensity calculator
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SaxsParameters {
    /// Scattering vectors at which the intensity is computed
    pub scattering_vectors: ScatteringVectorsParameters,
    /// Algorithm used to compute the intensity: `"direct"` summation only,
    /// adaptive harmonic `"expansion"` for the small scattering vectors, or
    /// `"forced-expansion"` for all scattering vectors
    #[serde(default)]
    pub algorithm: ExpansionMode,
    /// Number of workers used to distribute the atoms, defaults to the size
    /// of the rayon thread pool
    #[serde(default)]
    pub workers: Option<usize>,
    /// Run the whole calculation on the current thread
    #[serde(default)]
    pub serial: bool,
    /// Implementation of the direct summation
    #[serde(default)]
    pub backend: Backend,
    /// Use the periodic boundary conditions of the systems. If false, the
    /// systems cells are ignored.
    #[serde(default = "default_periodic")]
    pub periodic: bool,
    /// Also compute the box stress, `Σ_i r_i ⊗ ∂I/∂r_i` for each scattering
    /// vector
    #[serde(default)]
    pub box_stress: bool,
    /// Weight the atoms by their distance to an interface along `z`. This is
    /// only supported by direct summation.
    #[serde(default)]
    pub interface: Option<InterfaceParameters>,
}

impl SaxsParameters {
    /// Check the consistency of these parameters
    pub fn validate(&self) -> Result<(), Error> {
        if self.algorithm != ExpansionMode::Off {
            if cfg!(not(feature = "expansion")) {
                return Err(Error::InvalidParameter(
                    "the harmonic expansion requires the 'expansion' feature of saxs".into()
                ));
            }

            if self.backend == Backend::Batched {
                return Err(Error::InvalidParameter(
                    "the harmonic expansion can not be used together with the batched backend".into()
                ));
            }

            if !self.scattering_vectors.is_orientationally_averaged() {
                return Err(Error::InvalidParameter(
                    "the harmonic expansion only supports orientationally averaged \
                    scattering vectors, use \"Norms\" with this algorithm".into()
                ));
            }

            if self.interface.is_some() {
                return Err(Error::InvalidParameter(
                    "interface weights are only supported by direct summation".into()
                ));
            }
        }

        if let Some(interface) = &self.interface {
            interface.validate()?;
        }

        if self.workers == Some(0) {
            return Err(Error::InvalidParameter(
                "the number of workers must be at least 1".into()
            ));
        }

        Ok(())
    }
}

/// Result of a calculation
#[derive(Debug, Clone)]
pub struct Intensities {
    /// Intensity for each scattering vector
    pub intensities: Vec<f64>,
    /// Derivative of the intensities with respect to the position of each
    /// atom, with shape `(n_vectors, n_atoms)`
    pub derivatives: Array2<Vector3D>,
    /// Box stress for each scattering vector, if requested
    pub box_stress: Option<Vec<Matrix3>>,
    /// Scattering vectors used for this system
    pub vectors: ScatteringVectors,
    /// Algorithm used for each scattering vector
    pub partition: AlgorithmPartition,
}

/// The `Calculator` computes the SAXS intensity of a system and its
/// derivatives with respect to atomic positions, dispatching each scattering
/// vector to direct summation or to the harmonic expansion.
pub struct Calculator {
    parameters: String,
    vectors: VectorsSource,
    form_factors: FormFactors,
    mode: ExpansionMode,
    periodic: bool,
    box_stress: bool,
    interface: Option<InterfaceParameters>,
    direct: Box<dyn DirectBackend>,
    #[cfg(feature = "expansion")]
    expansion: crate::calculators::HarmonicExpansion,
}

impl std::fmt::Debug for Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Calculator")
            .field("parameters", &self.parameters)
            .field("direct", &self.direct.name())
            .finish_non_exhaustive()
    }
}

impl Calculator {
    /// Create a new calculator from JSON formatted `parameters` (see
    /// [`SaxsParameters`]) and the amplitudes of all atoms at all scattering
    /// vectors.
    pub fn new(parameters: &str, form_factors: FormFactors) -> Result<Calculator, Error> {
        let parameters = serde_json::from_str::<SaxsParameters>(parameters)?;
        return Calculator::with_parameters(parameters, form_factors);
    }

    /// Create a new calculator from already parsed `parameters`
    pub fn with_parameters(parameters: SaxsParameters, form_factors: FormFactors) -> Result<Calculator, Error> {
        parameters.validate()?;
        let vectors = parameters.scattering_vectors.build()?;

        if form_factors.n_vectors() != vectors.len() {
            return Err(Error::InvalidParameter(format!(
                "expected form factors for {} scattering vectors, got a ({}, {}) matrix",
                vectors.len(), form_factors.n_vectors(), form_factors.n_atoms()
            )));
        }

        let reduction = if parameters.serial {
            ParallelReduction::serial()
        } else {
            match parameters.workers {
                Some(workers) => ParallelReduction::new(workers)?,
                None => ParallelReduction::from_thread_pool(),
            }
        };

        let direct: Box<dyn DirectBackend> = match parameters.backend {
            Backend::Scalar => Box::new(ScalarDirect::new(reduction)),
            Backend::Batched => Box::new(BatchedDirect::new()),
        };

        info!(
            "created SAXS calculator with {} scattering vectors, {:?} algorithm, {} backend and {} workers",
            vectors.len(), parameters.algorithm, direct.name(), reduction.workers()
        );

        return Ok(Calculator {
            parameters: serde_json::to_string(&parameters)?,
            vectors: vectors,
            form_factors: form_factors,
            mode: parameters.algorithm,
            periodic: parameters.periodic,
            box_stress: parameters.box_stress,
            interface: parameters.interface,
            direct: direct,
            #[cfg(feature = "expansion")]
            expansion: crate::calculators::HarmonicExpansion::new(reduction),
        });
    }

    /// Get the parameters used to create this calculator, formatted as JSON
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Get the scattering vectors used by this calculator, or `None` if they
    /// are computed from the cell of each system
    pub fn scattering_vectors(&self) -> Option<&ScatteringVectors> {
        match &self.vectors {
            VectorsSource::Fixed(vectors) => Some(vectors),
            VectorsSource::SystemCell(_) => None,
        }
    }

    /// Get the number of scattering vectors used by this calculator
    pub fn n_vectors(&self) -> usize {
        self.vectors.len()
    }

    /// Get the form factors used by this calculator
    pub fn form_factors(&self) -> &FormFactors {
        &self.form_factors
    }

    /// Compute the intensities and their derivatives for the given `system`
    #[time_graph::instrument(name = "Calculator::compute")]
    pub fn compute(&self, system: &dyn System) -> Result<Intensities, Error> {
        let n_atoms = system.size()?;
        let positions = system.positions()?;
        if positions.len() != n_atoms {
            return Err(Error::InvalidInput(format!(
                "the system contains {} atoms but {} positions", n_atoms, positions.len()
            )));
        }

        self.form_factors.check_shape(self.vectors.len(), n_atoms)?;
        let vectors = self.vectors.for_system(system)?;

        let cell = if self.periodic {
            system.cell()?
        } else {
            UnitCell::infinite()
        };

        let weights = self.interface.map(|interface| interface.weights(positions));
        if let Some(weights) = &weights {
            debug!("{} atoms out of {} are below the interface cutoff", weights.n_included(), n_atoms);
        }

        let partition = planner::plan(&vectors, positions, self.mode);
        debug!(
            "computing {} scattering vectors with the harmonic expansion (degrees {:?}) and {} with direct summation",
            partition.expansion.len(), partition.degrees, partition.direct.len()
        );

        let input = EngineInput {
            positions: positions,
            cell: &cell,
            vectors: &vectors,
            form_factors: &self.form_factors,
            interface: weights.as_ref(),
        };

        let n_vectors = vectors.len();
        let mut intensities = vec![0.0; n_vectors];
        let mut derivatives = Array2::from_elem((n_vectors, n_atoms), Vector3D::zero());

        if !partition.expansion.is_empty() {
            self.compute_expansion(&input, &partition, &mut intensities, &mut derivatives)?;
        }

        self.direct.compute(&input, &partition.direct, &mut intensities, &mut derivatives);

        let box_stress = if self.box_stress {
            Some(compute_box_stress(positions, &derivatives))
        } else {
            None
        };

        return Ok(Intensities {
            intensities,
            derivatives,
            box_stress,
            vectors: vectors.into_owned(),
            partition,
        });
    }

    #[cfg(feature = "expansion")]
    fn compute_expansion(
        &self,
        input: &EngineInput<'_>,
        partition: &AlgorithmPartition,
        intensities: &mut [f64],
        derivatives: &mut Array2<Vector3D>,
    ) -> Result<(), Error> {
        self.expansion.compute(input, partition, intensities, derivatives)
    }

    #[cfg(not(feature = "expansion"))]
    #[allow(clippy::unused_self)]
    fn compute_expansion(
        &self,
        _: &EngineInput<'_>,
        _: &AlgorithmPartition,
        _: &mut [f64],
        _: &mut Array2<Vector3D>,
    ) -> Result<(), Error> {
        Err(Error::Internal(
            "the harmonic expansion was selected, but the 'expansion' feature is disabled".into()
        ))
    }
}

/// Compute `Σ_i r_i ⊗ ∂I/∂r_i` for each scattering vector
fn compute_box_stress(positions: &[Vector3D], derivatives: &Array2<Vector3D>) -> Vec<Matrix3> {
    derivatives.outer_iter().map(|row| {
        let mut stress = Matrix3::zero();
        for (position, derivative) in positions.iter().zip(row) {
            stress += position.tensorial(derivative);
        }
        stress
    }).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::systems::SimpleSystem;

    fn two_atoms() -> SimpleSystem {
        let mut system = SimpleSystem::new(UnitCell::cubic(20.0));
        system.add_atom(1, Vector3D::new(0.0, 0.0, 0.0));
        system.add_atom(1, Vector3D::new(1.5, 0.0, 0.0));
        return system;
    }

    #[test]
    fn parameters() {
        let calculator = Calculator::new(r#"{
            "scattering_vectors": {"type": "Norms", "values": [0.1, 0.2]}
        }"#, FormFactors::constant(2, 2, 1.0)).unwrap();

        assert_eq!(
            calculator.parameters(),
            r#"{"scattering_vectors":{"type":"Norms","values":[0.1,0.2]},"algorithm":"direct","workers":null,"serial":false,"backend":"scalar","periodic":true,"box_stress":false,"interface":null}"#
        );

        let parsed = serde_json::from_str::<SaxsParameters>(calculator.parameters()).unwrap();
        let again = serde_json::to_string(&parsed).unwrap();
        assert_eq!(again, calculator.parameters());

        assert_eq!(calculator.scattering_vectors().unwrap().norms(), [0.1, 0.2]);
        assert_eq!(calculator.n_vectors(), 2);
        assert_eq!(calculator.form_factors().n_atoms(), 2);
    }

    #[test]
    fn box_stress() {
        let calculator = Calculator::new(r#"{
            "scattering_vectors": {"type": "Vectors", "values": [[0.3, 0.1, 0.0], [0.0, 0.5, 0.5]]},
            "box_stress": true,
            "workers": 2
        }"#, FormFactors::constant(2, 2, 1.0)).unwrap();

        let system = two_atoms();
        let result = calculator.compute(&system).unwrap();
        let box_stress = result.box_stress.unwrap();
        assert_eq!(box_stress.len(), 2);

        let positions = system.positions().unwrap();
        for k in 0..2 {
            let mut expected = Matrix3::zero();
            for i in 0..2 {
                expected += positions[i].tensorial(&result.derivatives[[k, i]]);
            }
            assert_relative_eq!(box_stress[k], expected);
        }

        // only the second atom is away from the origin
        assert_relative_eq!(box_stress[0][0][0], 1.5 * result.derivatives[[0, 1]][0]);
    }

    #[test]
    fn non_periodic() {
        let mut system = two_atoms();
        system.set_cell(UnitCell::cubic(2.0));

        let parameters = r#"{
            "scattering_vectors": {"type": "Norms", "values": [0.4]},
            "periodic": false
        }"#;
        let calculator = Calculator::new(parameters, FormFactors::constant(1, 2, 1.0)).unwrap();
        let result = calculator.compute(&system).unwrap();
        assert_relative_eq!(result.intensities[0], 2.0 + 2.0 * f64::sin(0.6) / 0.6, max_relative = 1e-12);

        // with a periodic cell of size 2, the atoms are 0.5 apart
        let parameters = r#"{"scattering_vectors": {"type": "Norms", "values": [0.4]}}"#;
        let calculator = Calculator::new(parameters, FormFactors::constant(1, 2, 1.0)).unwrap();
        let result = calculator.compute(&system).unwrap();
        assert_relative_eq!(result.intensities[0], 2.0 + 2.0 * f64::sin(0.2) / 0.2, max_relative = 1e-12);
    }

    #[test]
    fn miller_indices() {
        let parameters = r#"{
            "scattering_vectors": {
                "type": "MillerIndices",
                "cell": [[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]],
                "indices": [[1, 0, 0], [1, 1, 0]]
            }
        }"#;
        let calculator = Calculator::new(parameters, FormFactors::constant(2, 2, 1.0)).unwrap();
        let vectors = calculator.scattering_vectors().unwrap();
        assert_relative_eq!(vectors[0].norm, 2.0 * std::f64::consts::PI / 10.0, max_relative = 1e-12);
        assert_relative_eq!(vectors[1].norm, f64::sqrt(2.0) * 2.0 * std::f64::consts::PI / 10.0, max_relative = 1e-12);

        let parameters = r#"{
            "scattering_vectors": {
                "type": "MillerIndices",
                "cell": [[0.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]],
                "indices": [[1, 0, 0]]
            }
        }"#;
        let error = Calculator::new(parameters, FormFactors::constant(1, 2, 1.0)).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: the reference cell for Miller indices must have a positive volume");

        let parameters = r#"{
            "scattering_vectors": {
                "type": "MillerIndices",
                "cell": [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
                "indices": [[1, 0, 0]]
            }
        }"#;
        let error = Calculator::new(parameters, FormFactors::constant(1, 2, 1.0)).unwrap_err();
        assert_eq!(error.to_string(), "invalid parameter: the diagonal of the cell matrix must be positive, got [0, 0, 1]");
    }

    #[test]
    fn miller_indices_from_system_cell() {
        let parameters = r#"{
            "scattering_vectors": {"type": "MillerIndices", "indices": [[1, 0, 0], [1, 1, 0]]}
        }"#;
        let calculator = Calculator::new(parameters, FormFactors::constant(2, 2, 1.0)).unwrap();
        assert!(calculator.scattering_vectors().is_none());
        assert_eq!(calculator.n_vectors(), 2);

        let mut system = two_atoms();
        let result = calculator.compute(&system).unwrap();
        let q = 2.0 * std::f64::consts::PI / 20.0;
        assert_relative_eq!(result.vectors[0].norm, q, max_relative = 1e-12);
        assert_relative_eq!(result.intensities[0], 2.0 + 2.0 * f64::cos(1.5 * q), max_relative = 1e-12);

        // the scattering vectors follow the cell of the system
        system.set_cell(UnitCell::orthorhombic(15.0, 20.0, 20.0));
        let result = calculator.compute(&system).unwrap();
        let q = 2.0 * std::f64::consts::PI / 15.0;
        assert_relative_eq!(result.vectors[0].norm, q, max_relative = 1e-12);
        assert_relative_eq!(result.intensities[0], 2.0 + 2.0 * f64::cos(1.5 * q), max_relative = 1e-12);

        system.set_cell(UnitCell::infinite());
        let error = calculator.compute(&system).unwrap_err();
        assert_eq!(error.to_string(), "invalid input: Miller indices without a reference cell require a system with a periodic cell");
    }

    #[test]
    fn interface() {
        let mut system = two_atoms();
        system.positions_mut()[1][2] = 0.5;

        let calculator = Calculator::new(r#"{
            "scattering_vectors": {"type": "Norms", "values": [0.3]},
            "interface": {"z0": 0.0, "width": 0.5}
        }"#, FormFactors::constant(1, 2, 1.0)).unwrap();
        let result = calculator.compute(&system).unwrap();

        let w0 = 0.5;
        let w1 = 1.0 / (1.0 + f64::exp(1.0));
        let r = f64::sqrt(1.5 * 1.5 + 0.5 * 0.5);
        let expected = w0 * w0 + w1 * w1 + 2.0 * w0 * w1 * f64::sin(0.3 * r) / (0.3 * r);
        assert_relative_eq!(result.intensities[0], expected, max_relative = 1e-12);

        // the second atom is above z_max
        system.positions_mut()[1][2] = 5.0;
        let result = calculator.compute(&system).unwrap();
        assert_relative_eq!(result.intensities[0], 0.25, max_relative = 1e-12);
        assert_eq!(result.derivatives[[0, 1]], Vector3D::zero());
    }

    mod bad {
        use super::super::*;

        fn error(parameters: &str, form_factors: FormFactors) -> String {
            Calculator::new(parameters, form_factors).unwrap_err().to_string()
        }

        #[test]
        fn scattering_vectors() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1, -0.2]}}"#,
                FormFactors::constant(2, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: scattering vector 1 must have a positive norm, got -0.2");

            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.2, 0.1]}}"#,
                FormFactors::constant(2, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: scattering vectors norms must be in strictly ascending order, got 0.1 after 0.2 at index 1");

            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": []}}"#,
                FormFactors::constant(0, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the list of scattering vectors can not be empty");
        }

        #[test]
        fn json() {
            let message = error(r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}"#, FormFactors::constant(1, 2, 1.0));
            assert!(message.starts_with("json error: "));

            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "unknown": 3}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert!(message.starts_with("json error: unknown field `unknown`"));

            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "algorithm": "fast"}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert!(message.starts_with("json error: unknown variant `fast`"));
        }

        #[test]
        fn workers() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "workers": 0}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the number of workers must be at least 1");
        }

        #[test]
        fn form_factors_shape() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1, 0.2]}}"#,
                FormFactors::constant(3, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: expected form factors for 2 scattering vectors, got a (3, 2) matrix");

            let calculator = Calculator::new(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1, 0.2]}}"#,
                FormFactors::constant(2, 3, 1.0),
            ).unwrap();
            let system = crate::systems::test_utils::test_system("CH");
            let message = calculator.compute(&system).unwrap_err().to_string();
            assert_eq!(message, "invalid parameter: expected form factors for 2 scattering vectors and 2 atoms, got a (2, 3) matrix");
        }

        #[test]
        fn expansion_with_batched_backend() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "algorithm": "expansion", "backend": "batched"}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            if cfg!(feature = "expansion") {
                assert_eq!(message, "invalid parameter: the harmonic expansion can not be used together with the batched backend");
            } else {
                assert_eq!(message, "invalid parameter: the harmonic expansion requires the 'expansion' feature of saxs");
            }
        }

        #[test]
        #[cfg(feature = "expansion")]
        fn expansion_with_oriented_vectors() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Vectors", "values": [[0.1, 0.0, 0.0]]}, "algorithm": "forced-expansion"}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the harmonic expansion only supports orientationally averaged scattering vectors, use \"Norms\" with this algorithm");

            let message = error(
                r#"{"scattering_vectors": {"type": "MillerIndices", "indices": [[1, 0, 0]]}, "algorithm": "expansion"}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the harmonic expansion only supports orientationally averaged scattering vectors, use \"Norms\" with this algorithm");
        }

        #[test]
        fn interface() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "interface": {"width": -1.0}}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the interface width must be positive, got -1");

            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "interface": {}, "algorithm": "expansion"}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            if cfg!(feature = "expansion") {
                assert_eq!(message, "invalid parameter: interface weights are only supported by direct summation");
            } else {
                assert_eq!(message, "invalid parameter: the harmonic expansion requires the 'expansion' feature of saxs");
            }
        }

        #[test]
        fn miller_indices() {
            let message = error(
                r#"{"scattering_vectors": {"type": "MillerIndices", "indices": []}}"#,
                FormFactors::constant(0, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the list of scattering vectors can not be empty");

            let message = error(
                r#"{"scattering_vectors": {"type": "MillerIndices", "indices": [[1, 0, 0], [0, 0, 0]]}}"#,
                FormFactors::constant(2, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: scattering vector 1 must have a positive norm, got Miller indices [0, 0, 0]");
        }

        #[test]
        #[cfg(not(feature = "expansion"))]
        fn expansion_without_feature() {
            let message = error(
                r#"{"scattering_vectors": {"type": "Norms", "values": [0.1]}, "algorithm": "forced-expansion"}"#,
                FormFactors::constant(1, 2, 1.0),
            );
            assert_eq!(message, "invalid parameter: the harmonic expansion requires the 'expansion' feature of saxs");
        }
    }
}
