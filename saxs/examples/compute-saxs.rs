use std::collections::BTreeMap;

use saxs::{Calculator, FormFactors, PolynomialFormFactors, System};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // load the systems from command line argument
    let path = std::env::args().nth(1).expect("expected a command line argument");
    let systems = saxs::systems::read_from_file(path)?;

    // pass parameters as JSON
    let q_values = (1..=40).map(|i| 0.025 * i as f64).collect::<Vec<_>>();
    let parameters = serde_json::json!({
        "scattering_vectors": {"type": "Norms", "values": q_values},
        "algorithm": "expansion",
        "box_stress": true,
    });

    // crude form factors for H, C, N and O, as a quadratic in q
    let mut coefficients = BTreeMap::new();
    coefficients.insert(1, vec![1.0, 0.0, -0.2]);
    coefficients.insert(6, vec![6.0, 0.0, -1.8]);
    coefficients.insert(7, vec![7.0, 0.0, -2.0]);
    coefficients.insert(8, vec![8.0, 0.0, -2.2]);

    for (i, system) in systems.iter().enumerate() {
        let provider = PolynomialFormFactors::by_type(q_values.clone(), system.types()?, &coefficients)?;
        let mut form_factors = FormFactors::from_provider(&provider);
        // the intensity at q = 0 is normalized to 1
        form_factors.normalize(provider.zero_angle_intensity(), 1.0)?;

        let calculator = Calculator::new(&parameters.to_string(), form_factors)?;
        let result = calculator.compute(system)?;

        println!("structure {} ({} atoms)", i, system.size()?);
        println!("  scattering vectors using the harmonic expansion: {:?}", result.partition.expansion);
        for (q, intensity) in q_values.iter().zip(&result.intensities) {
            println!("  I({:.3}) = {:.6}", q, intensity);
        }
    }

    Ok(())
}
