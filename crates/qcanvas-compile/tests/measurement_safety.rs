//! Integration tests: transpilation never disturbs terminal measurements.

use proptest::prelude::*;

use qcanvas_compile::passes::{PeepholeOptimization, is_in_basis, measured_clbits};
use qcanvas_compile::{BasisGates, CouplingMap, Pass, PassManagerBuilder, PropertySet};
use qcanvas_ir::{Circuit, ClbitId, QubitId};

/// Operation names on one qubit wire, in program order.
fn ops_on_qubit(circuit: &Circuit, qubit: QubitId) -> Vec<&'static str> {
    circuit
        .instructions()
        .iter()
        .filter(|inst| inst.qubits.contains(&qubit))
        .map(|inst| inst.name())
        .collect()
}

#[test]
fn test_h_measure_h_not_optimized() {
    let mut b = Circuit::builder("test", 1, 1);
    b.h(QubitId(0)).unwrap();
    b.measure(QubitId(0), ClbitId(0)).unwrap();
    b.h(QubitId(0)).unwrap();

    let out = PeepholeOptimization::for_level(3)
        .run(b.build(), &mut PropertySet::new())
        .unwrap();

    assert_eq!(ops_on_qubit(&out, QubitId(0)), vec!["h", "measure", "h"]);
}

#[test]
fn test_cx_measure_cx_not_cancelled() {
    let mut b = Circuit::builder("test", 2, 1);
    b.cx(QubitId(0), QubitId(1)).unwrap();
    b.measure(QubitId(1), ClbitId(0)).unwrap();
    b.cx(QubitId(0), QubitId(1)).unwrap();

    let out = PeepholeOptimization::for_level(3)
        .run(b.build(), &mut PropertySet::new())
        .unwrap();

    assert_eq!(out.count_ops().get("cx"), Some(&2));
}

#[test]
fn test_full_entanglement_on_linear_device() {
    // Every pair coupled, as in a fully entangled ansatz block.
    let mut b = Circuit::builder("full", 4, 4);
    for i in 0..4 {
        b.ry(0.1 * f64::from(i + 1), QubitId(i)).unwrap();
    }
    for i in 0..4 {
        for j in (i + 1)..4 {
            b.cx(QubitId(i), QubitId(j)).unwrap();
        }
    }
    b.measure_all();
    let circuit = b.build();

    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(3)
        .with_target(Some(CouplingMap::linear(7)), BasisGates::heron())
        .build();
    let out = pm.run(circuit.clone(), &mut props).unwrap();

    assert_eq!(out.num_qubits(), 7);
    assert!(is_in_basis(&out, &BasisGates::heron()));
    assert_eq!(measured_clbits(&out), measured_clbits(&circuit));
    let map = props.coupling_map.as_ref().unwrap();
    for inst in out.instructions().iter().filter(|i| i.qubits.len() == 2) {
        assert!(map.is_connected(inst.qubits[0].0, inst.qubits[1].0));
    }
}

#[derive(Debug, Clone)]
enum Op {
    Ry(u32, f64),
    Rz(u32, f64),
    Cx(u32, u32),
}

fn op_strategy(n: u32) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..n, 0.0..std::f64::consts::TAU).prop_map(|(q, t)| Op::Ry(q, t)),
        (0..n, 0.0..std::f64::consts::TAU).prop_map(|(q, t)| Op::Rz(q, t)),
        (0..n, 0..n)
            .prop_filter("distinct operands", |(a, b)| a != b)
            .prop_map(|(a, b)| Op::Cx(a, b)),
    ]
}

fn build(ops: &[Op], n: u32) -> Circuit {
    let mut b = Circuit::builder("random", n, n);
    for op in ops {
        match *op {
            Op::Ry(q, t) => b.ry(t, QubitId(q)).unwrap(),
            Op::Rz(q, t) => b.rz(t, QubitId(q)).unwrap(),
            Op::Cx(a, c) => b.cx(QubitId(a), QubitId(c)).unwrap(),
        };
    }
    b.measure_all();
    b.build()
}

proptest! {
    #[test]
    fn prop_transpile_preserves_measurements(ops in prop::collection::vec(op_strategy(4), 0..40)) {
        let circuit = build(&ops, 4);
        for basis in [BasisGates::ibm(), BasisGates::heron()] {
            let (pm, mut props) = PassManagerBuilder::new()
                .with_optimization_level(3)
                .with_target(Some(CouplingMap::linear(5)), basis.clone())
                .build();
            let out = pm.run(circuit.clone(), &mut props).unwrap();

            prop_assert!(is_in_basis(&out, &basis));
            prop_assert_eq!(measured_clbits(&out), measured_clbits(&circuit));
            prop_assert_eq!(out.count_ops().get("measure").copied(), Some(4));
        }
    }
}
