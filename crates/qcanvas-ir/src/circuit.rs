//! Circuit builder and the immutable circuit it produces.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Circuits are immutable once built: binding angles or transpiling produces a
/// new `Circuit`. Use [`CircuitBuilder`] to construct one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
    /// Angles bound into this circuit from a template.
    #[serde(default)]
    bound_parameters: usize,
}

impl Circuit {
    /// Start building a circuit with the given register widths.
    pub fn builder(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> CircuitBuilder {
        CircuitBuilder::with_size(name, num_qubits, num_clbits)
    }

    /// Create a circuit from an instruction list, validating every operand.
    pub fn from_instructions(
        name: impl Into<String>,
        num_qubits: u32,
        num_clbits: u32,
        instructions: Vec<Instruction>,
    ) -> IrResult<Self> {
        let mut builder = CircuitBuilder::with_size(name, num_qubits, num_clbits);
        for inst in instructions {
            builder.push(inst)?;
        }
        Ok(builder.build())
    }

    /// Replace the instruction list, keeping name and register widths.
    ///
    /// The count of bound parameters carries over.
    pub fn with_instructions(&self, instructions: Vec<Instruction>) -> IrResult<Self> {
        let mut circuit =
            Self::from_instructions(self.name.clone(), self.num_qubits, self.num_clbits, instructions)?;
        circuit.bound_parameters = self.bound_parameters;
        Ok(circuit)
    }

    /// The same circuit under a different name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name of the circuit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of gate instructions (measurements and barriers excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.as_gate().is_some()).count()
    }

    /// Occurrences of each operation, keyed by name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut ops = BTreeMap::new();
        for inst in &self.instructions {
            *ops.entry(inst.name()).or_insert(0) += 1;
        }
        ops
    }

    /// Circuit depth: the longest chain of operations sharing a wire.
    ///
    /// Barriers do not add depth.
    pub fn depth(&self) -> usize {
        let mut qubit_depth = vec![0usize; self.num_qubits()];
        let mut clbit_depth = vec![0usize; self.num_clbits()];
        for inst in &self.instructions {
            if inst.is_barrier() {
                continue;
            }
            let start = inst
                .qubits
                .iter()
                .map(|q| qubit_depth[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_depth[c.index()]))
                .max()
                .unwrap_or(0);
            for q in &inst.qubits {
                qubit_depth[q.index()] = start + 1;
            }
            for c in &inst.clbits {
                clbit_depth[c.index()] = start + 1;
            }
        }
        qubit_depth.into_iter().chain(clbit_depth).max().unwrap_or(0)
    }

    /// Free parameter names, in order of first appearance.
    pub fn parameters(&self) -> Vec<String> {
        let mut names = Vec::new();
        for gate in self.instructions.iter().filter_map(Instruction::as_gate) {
            if let Some(p) = gate.parameter() {
                p.collect_symbols(&mut names);
            }
        }
        names
    }

    /// Number of parameters the circuit declares, bound or free.
    ///
    /// Binding a template does not change this count.
    pub fn num_parameters(&self) -> usize {
        self.bound_parameters + self.num_free_parameters()
    }

    /// Number of parameters still unbound.
    pub fn num_free_parameters(&self) -> usize {
        self.parameters().len()
    }

    /// Number of parameters that have been bound to values.
    pub fn num_bound_parameters(&self) -> usize {
        self.bound_parameters
    }

    /// Whether every gate angle is a concrete value.
    pub fn is_bound(&self) -> bool {
        self.instructions
            .iter()
            .filter_map(Instruction::as_gate)
            .all(|g| !g.is_symbolic())
    }

    /// Bind `values` to the free parameters in order of first appearance.
    ///
    /// Returns a new, fully bound circuit. The number of values must equal
    /// [`Circuit::num_free_parameters`].
    pub fn bind_parameters(&self, values: &[f64]) -> IrResult<Self> {
        let names = self.parameters();
        if names.len() != values.len() {
            return Err(IrError::ParameterCountMismatch {
                expected: names.len(),
                actual: values.len(),
            });
        }
        let map: FxHashMap<String, f64> = names.into_iter().zip(values.iter().copied()).collect();

        let instructions = self
            .instructions
            .iter()
            .map(|inst| match &inst.kind {
                InstructionKind::Gate(g) => Instruction {
                    kind: InstructionKind::Gate(g.bind(&map)),
                    qubits: inst.qubits.clone(),
                    clbits: inst.clbits.clone(),
                },
                _ => inst.clone(),
            })
            .collect();

        Ok(Self {
            name: self.name.clone(),
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions,
            bound_parameters: self.bound_parameters + values.len(),
        })
    }

    /// Create a Bell state circuit with measurement.
    pub fn bell() -> IrResult<Self> {
        let mut b = Self::builder("bell", 2, 2);
        b.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?.measure_all();
        Ok(b.build())
    }

    /// Create an n-qubit GHZ state circuit with measurement.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut b = Self::builder(format!("ghz_{n}"), n, n);
        if n > 0 {
            b.h(QubitId(0))?;
            for i in 0..n - 1 {
                b.cx(QubitId(i), QubitId(i + 1))?;
            }
        }
        b.measure_all();
        Ok(b.build())
    }
}

/// Mutable builder for [`Circuit`].
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl CircuitBuilder {
    /// Create a builder with the given register widths.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn push(&mut self, inst: Instruction) -> IrResult<&mut Self> {
        self.validate(&inst)?;
        self.instructions.push(inst);
        Ok(self)
    }

    fn validate(&self, inst: &Instruction) -> IrResult<()> {
        let gate_name = inst.as_gate().map(|g| g.name().to_string());

        if let Some(gate) = inst.as_gate() {
            let got = inst.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        for (i, q) in inst.qubits.iter().enumerate() {
            if q.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    num_qubits: self.num_qubits,
                    gate_name,
                });
            }
            if inst.qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name,
                });
            }
        }

        if inst.is_measure() && inst.qubits.len() != inst.clbits.len() {
            return Err(IrError::MeasureWidthMismatch {
                qubits: inst.qubits.len(),
                clbits: inst.clbits.len(),
            });
        }
        for c in &inst.clbits {
            if c.0 >= self.num_clbits {
                return Err(IrError::ClbitOutOfRange {
                    clbit: *c,
                    num_clbits: self.num_clbits,
                });
            }
        }
        Ok(())
    }

    fn gate(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits.iter().copied()))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, &[qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::SX, &[qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rx(theta.into()), &[qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta.into()), &[qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        qubit: QubitId,
    ) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta.into()), &[qubit])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, &[control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, &[control, target])
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    /// Measure qubit `i` into classical bit `i` for every qubit.
    ///
    /// Widens the classical register if it is narrower than the quantum one.
    pub fn measure_all(&mut self) -> &mut Self {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        for i in 0..self.num_qubits {
            self.instructions
                .push(Instruction::measure(QubitId(i), ClbitId(i)));
        }
        self
    }

    /// Insert a barrier across all qubits.
    pub fn barrier_all(&mut self) -> &mut Self {
        self.instructions
            .push(Instruction::barrier((0..self.num_qubits).map(QubitId)));
        self
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Finish construction.
    pub fn build(self) -> Circuit {
        Circuit {
            name: self.name,
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: self.instructions,
            bound_parameters: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3);
        assert_eq!(circuit.count_ops().get("measure"), Some(&2));
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.gate_count(), 5);
        assert_eq!(circuit.depth(), 6);
    }

    #[test]
    fn test_rejects_out_of_range_qubit() {
        let mut b = Circuit::builder("bad", 2, 0);
        let err = b.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { num_qubits: 2, .. }));
    }

    #[test]
    fn test_rejects_duplicate_qubit() {
        let mut b = Circuit::builder("bad", 2, 0);
        let err = b.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
    }

    #[test]
    fn test_measure_all_widens_clbits() {
        let mut b = Circuit::builder("m", 3, 0);
        b.measure_all();
        let c = b.build();
        assert_eq!(c.num_clbits(), 3);
        assert_eq!(c.instructions().len(), 3);
    }

    #[test]
    fn test_bind_parameters() {
        let mut b = Circuit::builder("template", 1, 1);
        b.ry(ParameterExpression::symbol("a"), QubitId(0))
            .unwrap()
            .rz(ParameterExpression::symbol("b"), QubitId(0))
            .unwrap();
        let template = b.build();
        assert_eq!(template.parameters(), vec!["a".to_string(), "b".to_string()]);
        assert!(!template.is_bound());

        let bound = template.bind_parameters(&[0.1, 0.2]).unwrap();
        assert!(bound.is_bound());
        assert_eq!(bound.num_free_parameters(), 0);
        assert_eq!(bound.num_bound_parameters(), 2);
        assert_eq!(bound.num_parameters(), template.num_parameters());
        let angles: Vec<f64> = bound
            .instructions()
            .iter()
            .filter_map(|i| i.as_gate()?.parameter()?.as_f64())
            .collect();
        assert_eq!(angles, vec![0.1, 0.2]);
    }

    #[test]
    fn test_bind_wrong_length() {
        let mut b = Circuit::builder("template", 1, 1);
        b.ry(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        let err = b.build().bind_parameters(&[]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ParameterCountMismatch {
                expected: 1,
                actual: 0
            }
        ));
    }
}
