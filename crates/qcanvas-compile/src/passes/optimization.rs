//! Peephole optimization: merge rotations and cancel inverse pairs.

use std::f64::consts::TAU;

use tracing::debug;

use qcanvas_ir::{Circuit, Instruction, InstructionKind, ParameterExpression, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Angles this close to a multiple of 2π are treated as identity.
const ANGLE_EPSILON: f64 = 1e-10;

/// Local rewrites on adjacent operations sharing a wire.
///
/// - Consecutive rotations about the same axis on one qubit are summed;
///   a rotation whose sum is a multiple of 2π is removed.
/// - Adjacent self-inverse gates on identical operands (`x`, `h`, `cx`,
///   `cz`) cancel.
///
/// Measurements and barriers block both rewrites, so nothing crosses a
/// measurement.
#[derive(Debug, Clone)]
pub struct PeepholeOptimization {
    merge_rotations: bool,
    cancel_inverses: bool,
    max_iterations: usize,
}

impl PeepholeOptimization {
    /// Settings for an optimization level (0-3).
    pub fn for_level(level: u8) -> Self {
        Self {
            merge_rotations: level >= 1,
            cancel_inverses: level >= 2,
            max_iterations: if level >= 3 { 8 } else { 1 },
        }
    }

    fn sweep(&self, instructions: &[Instruction], num_qubits: usize) -> Vec<Instruction> {
        let mut out: Vec<Option<Instruction>> = Vec::with_capacity(instructions.len());
        // Indices into `out` of live instructions touching each wire, oldest first.
        let mut wires: Vec<Vec<usize>> = vec![Vec::new(); num_qubits];

        for inst in instructions {
            let last = last_shared(&wires, inst);

            if let (Some(j), Some(gate)) = (last, inst.as_gate()) {
                let prev = out[j].as_ref().and_then(Instruction::as_gate);
                if let Some(merged) = prev
                    .filter(|_| self.merge_rotations)
                    .and_then(|p| merge_rotation(p, gate))
                {
                    if is_identity_rotation(&merged) {
                        out[j] = None;
                        wires[inst.qubits[0].index()].pop();
                    } else if let Some(slot) = out[j].as_mut() {
                        slot.kind = InstructionKind::Gate(merged);
                    }
                    continue;
                }
                if self.cancel_inverses && out[j].as_ref().is_some_and(|p| cancels(p, inst)) {
                    out[j] = None;
                    for q in &inst.qubits {
                        wires[q.index()].pop();
                    }
                    continue;
                }
            }

            let idx = out.len();
            for q in &inst.qubits {
                wires[q.index()].push(idx);
            }
            out.push(Some(inst.clone()));
        }

        out.into_iter().flatten().collect()
    }
}

impl Default for PeepholeOptimization {
    fn default() -> Self {
        Self::for_level(3)
    }
}

/// Index of the instruction that is the most recent op on *every* wire of
/// `inst`, if one exists.
fn last_shared(wires: &[Vec<usize>], inst: &Instruction) -> Option<usize> {
    let mut tops = inst.qubits.iter().map(|q| wires[q.index()].last().copied());
    let first = tops.next()??;
    tops.all(|t| t == Some(first)).then_some(first)
}

fn merge_rotation(prev: &StandardGate, next: &StandardGate) -> Option<StandardGate> {
    let sum = |a: &ParameterExpression, b: &ParameterExpression| (a.clone() + b.clone()).simplify();
    match (prev, next) {
        (StandardGate::Rz(a), StandardGate::Rz(b)) => Some(StandardGate::Rz(sum(a, b))),
        (StandardGate::Ry(a), StandardGate::Ry(b)) => Some(StandardGate::Ry(sum(a, b))),
        (StandardGate::Rx(a), StandardGate::Rx(b)) => Some(StandardGate::Rx(sum(a, b))),
        _ => None,
    }
}

fn is_identity_rotation(gate: &StandardGate) -> bool {
    gate.parameter()
        .and_then(ParameterExpression::as_f64)
        .is_some_and(|v| {
            let r = v.rem_euclid(TAU);
            r < ANGLE_EPSILON || TAU - r < ANGLE_EPSILON
        })
}

fn cancels(prev: &Instruction, next: &Instruction) -> bool {
    match (prev.as_gate(), next.as_gate()) {
        (Some(StandardGate::X), Some(StandardGate::X))
        | (Some(StandardGate::H), Some(StandardGate::H))
        | (Some(StandardGate::CZ), Some(StandardGate::CZ)) => true,
        // CX operand order matters; CZ is symmetric.
        (Some(StandardGate::CX), Some(StandardGate::CX)) => prev.qubits == next.qubits,
        _ => false,
    }
}

impl Pass for PeepholeOptimization {
    fn name(&self) -> &'static str {
        "PeepholeOptimization"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: Circuit, _properties: &mut PropertySet) -> CompileResult<Circuit> {
        let before = circuit.instructions().len();
        let mut current = circuit.instructions().to_vec();
        for _ in 0..self.max_iterations {
            let next = self.sweep(&current, circuit.num_qubits());
            let done = next.len() == current.len();
            current = next;
            if done {
                break;
            }
        }
        debug!(
            "PeepholeOptimization: {before} -> {} instructions",
            current.len()
        );
        Ok(circuit.with_instructions(current)?)
    }

    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        self.merge_rotations || self.cancel_inverses
    }
}
