//! Routing: make every two-qubit gate act on coupled device qubits.

use tracing::debug;

use qcanvas_ir::{Circuit, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Greedy SWAP insertion along shortest paths.
///
/// Rewrites the circuit onto physical qubits: the output is as wide as the
/// device, operands are physical indices, and classical bits are untouched so
/// measurement results still land in the logical qubit's bit. Each SWAP is
/// emitted as three CX gates; the layout is updated as qubits move.
pub struct BasicRouting;

impl Pass for BasicRouting {
    fn name(&self) -> &'static str {
        "BasicRouting"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let (Some(coupling_map), Some(layout)) =
            (properties.coupling_map.as_ref(), properties.layout.as_mut())
        else {
            return Err(CompileError::MissingLayout);
        };

        let physical = |layout: &crate::property::Layout, q: QubitId| {
            layout.get_physical(q).map(QubitId).ok_or(CompileError::MissingLayout)
        };

        let mut routed = Vec::with_capacity(circuit.instructions().len());
        let mut swaps = 0usize;

        for inst in circuit.instructions() {
            if let (InstructionKind::Gate(_), [a, b]) = (&inst.kind, inst.qubits.as_slice()) {
                let pa = physical(layout, *a)?.0;
                let pb = physical(layout, *b)?.0;
                if !coupling_map.is_connected(pa, pb) {
                    let path = coupling_map
                        .shortest_path(pa, pb)
                        .ok_or(CompileError::Unroutable { from: pa, to: pb })?;
                    // Walk `a` toward `b`, stopping one hop short.
                    for hop in path.windows(2).take(path.len().saturating_sub(2)) {
                        let (p, q) = (QubitId(hop[0]), QubitId(hop[1]));
                        routed.push(Instruction::two_qubit_gate(StandardGate::CX, p, q));
                        routed.push(Instruction::two_qubit_gate(StandardGate::CX, q, p));
                        routed.push(Instruction::two_qubit_gate(StandardGate::CX, p, q));
                        layout.swap_physical(hop[0], hop[1]);
                        swaps += 1;
                    }
                }
            }

            let qubits = inst
                .qubits
                .iter()
                .map(|q| physical(layout, *q))
                .collect::<CompileResult<Vec<_>>>()?;
            routed.push(Instruction {
                kind: inst.kind.clone(),
                qubits,
                clbits: inst.clbits.clone(),
            });
        }

        debug!("BasicRouting inserted {swaps} swaps");
        Ok(Circuit::from_instructions(
            circuit.name(),
            coupling_map.num_qubits(),
            circuit.num_clbits() as u32,
            routed,
        )?)
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some()
    }
}
