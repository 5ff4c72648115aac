//! Basis translation: rewrite gates into the target's native set.

use qcanvas_ir::{Circuit, Instruction, InstructionKind, ParameterExpression, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};

/// Translates gates outside the basis into sequences of basis gates.
///
/// Decompositions hold up to global phase:
///
/// | Gate | Replacement (time order) |
/// |------|--------------------------|
/// | `ry(θ)` | `sx; rz(θ+π); sx; rz(π)` |
/// | `rx(θ)` | `rz(π/2); sx; rz(θ+π); sx; rz(π/2)` |
/// | `h` | `rz(π/2); sx; rz(π/2)` |
/// | `x` | `sx; sx` |
/// | `cx(c,t)` | `h(t); cz(c,t); h(t)` |
/// | `cz(c,t)` | `h(t); cx(c,t); h(t)` |
///
/// Replacements are themselves translated, so `cx` on a Heron target ends
/// up as `rz`/`sx`/`cz`.
pub struct BasisTranslation;

/// Rewrites nest at most this deep before a gate is declared unsupported.
const MAX_REWRITE_DEPTH: usize = 4;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;

        let mut translated = Vec::with_capacity(circuit.instructions().len());
        for inst in circuit.instructions() {
            translate_into(inst, basis, 0, &mut translated)?;
        }
        Ok(circuit.with_instructions(translated)?)
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

fn translate_into(
    inst: &Instruction,
    basis: &BasisGates,
    depth: usize,
    out: &mut Vec<Instruction>,
) -> CompileResult<()> {
    let Some(gate) = inst.as_gate() else {
        out.push(inst.clone());
        return Ok(());
    };
    if basis.contains(gate.name()) {
        out.push(inst.clone());
        return Ok(());
    }

    let unsupported = || CompileError::UnsupportedGate {
        gate: gate.name().to_string(),
        basis: basis.gates().join(", "),
    };
    if depth >= MAX_REWRITE_DEPTH {
        return Err(unsupported());
    }

    let replacement = decompose(gate, &inst.qubits, basis).ok_or_else(unsupported)?;
    for r in &replacement {
        translate_into(r, basis, depth + 1, out)?;
    }
    Ok(())
}

fn decompose(gate: &StandardGate, qubits: &[QubitId], basis: &BasisGates) -> Option<Vec<Instruction>> {
    let one = |g: StandardGate| Instruction::single_qubit_gate(g, qubits[0]);
    let rz = |theta: ParameterExpression| one(StandardGate::Rz(theta));
    let half_pi = || ParameterExpression::constant(std::f64::consts::FRAC_PI_2);

    let seq = match gate {
        StandardGate::Ry(theta) => vec![
            one(StandardGate::SX),
            rz((theta.clone() + ParameterExpression::pi()).simplify()),
            one(StandardGate::SX),
            rz(ParameterExpression::pi()),
        ],
        StandardGate::Rx(theta) => vec![
            rz(half_pi()),
            one(StandardGate::SX),
            rz((theta.clone() + ParameterExpression::pi()).simplify()),
            one(StandardGate::SX),
            rz(half_pi()),
        ],
        StandardGate::H => vec![rz(half_pi()), one(StandardGate::SX), rz(half_pi())],
        StandardGate::X => vec![one(StandardGate::SX), one(StandardGate::SX)],
        StandardGate::SX if basis.contains("rx") => vec![one(StandardGate::Rx(half_pi()))],
        StandardGate::CX if basis.contains("cz") => {
            let (c, t) = (qubits[0], qubits[1]);
            vec![
                Instruction::single_qubit_gate(StandardGate::H, t),
                Instruction::two_qubit_gate(StandardGate::CZ, c, t),
                Instruction::single_qubit_gate(StandardGate::H, t),
            ]
        }
        StandardGate::CZ if basis.contains("cx") => {
            let (c, t) = (qubits[0], qubits[1]);
            vec![
                Instruction::single_qubit_gate(StandardGate::H, t),
                Instruction::two_qubit_gate(StandardGate::CX, c, t),
                Instruction::single_qubit_gate(StandardGate::H, t),
            ]
        }
        _ => return None,
    };
    Some(seq)
}

/// Whether every gate in the circuit belongs to `basis`.
pub fn is_in_basis(circuit: &Circuit, basis: &BasisGates) -> bool {
    circuit.instructions().iter().all(|inst| match &inst.kind {
        InstructionKind::Gate(g) => basis.contains(g.name()),
        InstructionKind::Measure => true,
        InstructionKind::Barrier => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(circuit: Circuit, basis: BasisGates) -> CompileResult<Circuit> {
        let mut props = PropertySet::new().with_target(None, basis);
        BasisTranslation.run(circuit, &mut props)
    }

    #[test]
    fn test_ry_to_ibm() {
        let mut b = Circuit::builder("ry", 1, 0);
        b.ry(0.3, QubitId(0)).unwrap();
        let out = translate(b.build(), BasisGates::ibm()).unwrap();

        let names: Vec<_> = out.instructions().iter().map(Instruction::name).collect();
        assert_eq!(names, vec!["sx", "rz", "sx", "rz"]);
        let angle = out.instructions()[1].as_gate().unwrap().parameter().unwrap();
        assert!((angle.as_f64().unwrap() - (0.3 + std::f64::consts::PI)).abs() < 1e-12);
    }

    #[test]
    fn test_cx_to_heron() {
        let out = translate(Circuit::bell().unwrap(), BasisGates::heron()).unwrap();
        assert!(is_in_basis(&out, &BasisGates::heron()));
        assert_eq!(out.count_ops().get("cz"), Some(&1));
        assert_eq!(out.count_ops().get("measure"), Some(&2));
    }

    #[test]
    fn test_universal_is_noop() {
        let bell = Circuit::bell().unwrap();
        let out = translate(bell.clone(), BasisGates::universal()).unwrap();
        assert_eq!(out, bell);
    }

    #[test]
    fn test_unsupported_gate() {
        let basis = BasisGates::new(["cx", "measure"]);
        let err = translate(Circuit::bell().unwrap(), basis).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedGate { .. }));
    }
}
