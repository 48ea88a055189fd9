use std::collections::BTreeMap;

use saxs::{Calculator, FormFactors, Intensities, PolynomialFormFactors, System};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).expect("expected a command line argument");

    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    // clear any existing collected data
    time_graph::clear_collected_data();

    // run the calculation
    let results = compute_saxs(&path)?;
    for (i, result) in results.iter().enumerate() {
        println!("structure {}: I(q) = {:?}", i, result.intensities);
    }

    // get the call graph and display it
    let graph = time_graph::get_full_graph();
    // (this requires the "table" feature for the time_graph crate)
    println!("{}", graph.as_short_table());

    // also available for saving profiling data to the disk & future analysis
    // (this requires the "json" feature for the time_graph crate)
    println!("{}", graph.as_json());

    Ok(())
}

/// Compute the SAXS intensity and its derivatives for all structures in the
/// file at `path`, using the atomic number as a crude form factor
fn compute_saxs(path: &str) -> Result<Vec<Intensities>, Box<dyn std::error::Error>> {
    let systems = saxs::systems::read_from_file(path)?;

    let q_values = (1..=50).map(|i| 0.02 * i as f64).collect::<Vec<_>>();
    let parameters = serde_json::json!({
        "scattering_vectors": {"type": "Norms", "values": q_values},
        "algorithm": "expansion",
    });

    let mut results = Vec::new();
    for system in &systems {
        let types = system.types()?;
        let coefficients = types.iter()
            .map(|&atomic_type| (atomic_type, vec![atomic_type as f64]))
            .collect::<BTreeMap<_, _>>();

        let provider = PolynomialFormFactors::by_type(q_values.clone(), types, &coefficients)?;
        let form_factors = FormFactors::from_provider(&provider);

        let result = time_graph::spanned!("Full calculation", {
            let calculator = Calculator::new(&parameters.to_string(), form_factors)?;
            calculator.compute(system)?
        });
        results.push(result);
    }

    Ok(results)
}
