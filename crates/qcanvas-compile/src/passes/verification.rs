//! Verification that compilation preserved measurement semantics.

use tracing::debug;

use qcanvas_ir::{Circuit, ClbitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Sorted classical bits written by the circuit's measurements.
pub fn measured_clbits(circuit: &Circuit) -> Vec<ClbitId> {
    let mut bits: Vec<ClbitId> = circuit
        .instructions()
        .iter()
        .filter(|i| i.is_measure())
        .flat_map(|i| i.clbits.iter().copied())
        .collect();
    bits.sort_unstable();
    bits
}

/// Analysis pass run last: checks that no gate acts on a qubit after that
/// qubit was measured, and that the same classical bits are measured as in
/// the input circuit (recorded in [`PropertySet::measured_clbits`]).
pub struct MeasurementVerification;

impl Pass for MeasurementVerification {
    fn name(&self) -> &'static str {
        "MeasurementVerification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let mut measured = vec![false; circuit.num_qubits()];
        for inst in circuit.instructions() {
            if inst.is_measure() {
                for q in &inst.qubits {
                    measured[q.index()] = true;
                }
            } else if let Some(gate) = inst.as_gate() {
                if let Some(q) = inst.qubits.iter().find(|q| measured[q.index()]) {
                    return Err(CompileError::GateAfterMeasurement {
                        gate: gate.name().to_string(),
                        qubit: *q,
                    });
                }
            }
        }

        let found = measured_clbits(&circuit);
        if let Some(expected) = &properties.measured_clbits {
            if *expected != found {
                return Err(CompileError::MeasurementMismatch {
                    expected: expected.len(),
                    found: found.len(),
                });
            }
        }

        debug!("MeasurementVerification passed, {} measured bits", found.len());
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcanvas_ir::QubitId;

    #[test]
    fn test_accepts_terminal_measurements() {
        let mut props = PropertySet::new();
        let bell = Circuit::bell().unwrap();
        props.measured_clbits = Some(measured_clbits(&bell));
        assert!(MeasurementVerification.run(bell, &mut props).is_ok());
    }

    #[test]
    fn test_rejects_gate_after_measurement() {
        let mut b = Circuit::builder("bad", 1, 1);
        b.measure_all();
        b.x(QubitId(0)).unwrap();
        let err = MeasurementVerification
            .run(b.build(), &mut PropertySet::new())
            .unwrap_err();
        assert!(matches!(err, CompileError::GateAfterMeasurement { .. }));
    }

    #[test]
    fn test_rejects_dropped_measurement() {
        let mut props = PropertySet::new();
        props.measured_clbits = Some(vec![ClbitId(0), ClbitId(1)]);
        let mut b = Circuit::builder("partial", 2, 2);
        b.measure(QubitId(0), ClbitId(0)).unwrap();
        let err = MeasurementVerification.run(b.build(), &mut props).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MeasurementMismatch {
                expected: 2,
                found: 1
            }
        ));
    }
}
