//! Property tests for the deterministic part of the pipeline.

use proptest::prelude::*;
use std::f64::consts::TAU;

use qcanvas::{Ansatz, CanvasConfig, derive_seed, normalize_name, sample_parameters};

proptest! {
    /// Surrounding whitespace and ASCII case never change the seed.
    #[test]
    fn test_seed_normalization_invariance(
        name in "[a-zA-Z][a-zA-Z0-9 ]{0,20}",
        left in "[ \t]{0,3}",
        right in "[ \t\n]{0,3}",
    ) {
        let padded = format!("{left}{name}{right}");
        prop_assert_eq!(derive_seed(&padded).unwrap(), derive_seed(&name).unwrap());
        prop_assert_eq!(
            derive_seed(&name.to_uppercase()).unwrap(),
            derive_seed(&name.to_lowercase()).unwrap()
        );
    }

    /// Whitespace-only names are rejected.
    #[test]
    fn test_blank_names_rejected(name in "[ \t\n]{0,8}") {
        prop_assert!(normalize_name(&name).is_empty());
        prop_assert!(derive_seed(&name).is_err());
    }

    /// Angles have the requested length, lie in [0, 2π) and are reproducible.
    #[test]
    fn test_parameter_range(seed in any::<u32>(), count in 0_usize..200) {
        let params = sample_parameters(seed, count);
        prop_assert_eq!(params.len(), count);
        prop_assert!(params.iter().all(|&p| (0.0..TAU).contains(&p)));
        prop_assert_eq!(params, sample_parameters(seed, count));
    }

    /// The ansatz declares (D+1)·n·2 parameters and binds exactly that many.
    #[test]
    fn test_ansatz_parameter_count(num_qubits in 1_u32..=8, layers in 0_u32..=4, seed in any::<u32>()) {
        let config = CanvasConfig::new(num_qubits, layers, 10).unwrap();
        let ansatz = Ansatz::new(&config).unwrap();
        let expected = ((layers + 1) * num_qubits * 2) as usize;
        prop_assert_eq!(ansatz.num_parameters(), expected);

        let circuit = ansatz.bind(&sample_parameters(seed, expected), "p").unwrap();
        prop_assert!(circuit.is_bound());
        prop_assert_eq!(circuit.num_parameters(), expected);
        prop_assert_eq!(circuit.num_clbits(), num_qubits as usize);
        prop_assert!(ansatz.bind(&sample_parameters(seed, expected + 1), "p").is_err());
    }
}
