//! QASM3 emitter for serializing circuits.

use std::f64::consts::PI;

use qcanvas_ir::{Circuit, ClbitId, Instruction, InstructionKind, ParameterExpression, QubitId};

use crate::error::{EmitError, EmitResult};

/// Emit a bound circuit as OpenQASM 3.0 source.
///
/// Registers are declared as `qubit[n] q;` and `bit[n] c;`, and the standard
/// gate library is included so hardware services accept `rz`, `sx`, `cx`, etc.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    let mut emitter = Emitter::default();
    emitter.emit_circuit(circuit)?;
    Ok(emitter.output)
}

#[derive(Default)]
struct Emitter {
    output: String,
}

impl Emitter {
    fn emit_circuit(&mut self, circuit: &Circuit) -> EmitResult<()> {
        self.writeln("OPENQASM 3.0;");
        self.writeln("include \"stdgates.inc\";");

        let num_qubits = circuit.num_qubits();
        if num_qubits > 0 {
            self.writeln(&format!("qubit[{num_qubits}] q;"));
        }
        let num_clbits = circuit.num_clbits();
        if num_clbits > 0 {
            self.writeln(&format!("bit[{num_clbits}] c;"));
        }

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction)?;
        }
        Ok(())
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = emit_qubits(&instruction.qubits);
                match gate.parameter() {
                    Some(p) => {
                        let angle = emit_param(p)?;
                        self.writeln(&format!("{}({angle}) {qubits};", gate.name()));
                    }
                    None => self.writeln(&format!("{} {qubits};", gate.name())),
                }
            }
            InstructionKind::Measure => {
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    self.writeln(&format!("{} = measure {};", emit_clbit(*c), emit_qubit(*q)));
                }
            }
            InstructionKind::Barrier => {
                let qubits = emit_qubits(&instruction.qubits);
                if qubits.is_empty() {
                    self.writeln("barrier;");
                } else {
                    self.writeln(&format!("barrier {qubits};"));
                }
            }
        }
        Ok(())
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_param(param: &ParameterExpression) -> EmitResult<String> {
    let value = param.as_f64().ok_or_else(|| {
        let mut names = Vec::new();
        param.collect_symbols(&mut names);
        EmitError::UnboundParameter(names.join(", "))
    })?;

    // Common fractions of pi are spelled symbolically.
    let text = if (value - PI).abs() < 1e-12 {
        "pi".to_string()
    } else if (value + PI).abs() < 1e-12 {
        "-pi".to_string()
    } else if (value - PI / 2.0).abs() < 1e-12 {
        "pi/2".to_string()
    } else if (value + PI / 2.0).abs() < 1e-12 {
        "-pi/2".to_string()
    } else {
        format!("{value:.12}")
    };
    Ok(text)
}

fn emit_qubit(q: QubitId) -> String {
    format!("q[{}]", q.0)
}

fn emit_clbit(c: ClbitId) -> String {
    format!("c[{}]", c.0)
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    qubits
        .iter()
        .map(|q| emit_qubit(*q))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_bell_state() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit(&circuit).unwrap();

        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n"));
        assert!(qasm.contains("qubit[2] q;"));
        assert!(qasm.contains("bit[2] c;"));
        assert!(qasm.contains("h q[0];"));
        assert!(qasm.contains("cx q[0], q[1];"));
        assert!(qasm.contains("c[1] = measure q[1];"));
    }

    #[test]
    fn test_emit_parameterized() {
        let mut b = Circuit::builder("rot", 1, 1);
        b.rz(PI / 2.0, QubitId(0)).unwrap();
        b.ry(0.25, QubitId(0)).unwrap();
        let qasm = emit(&b.build()).unwrap();

        assert!(qasm.contains("rz(pi/2) q[0];"));
        assert!(qasm.contains("ry(0.250000000000) q[0];"));
    }

    #[test]
    fn test_rejects_unbound() {
        let mut b = Circuit::builder("template", 1, 0);
        b.rx(ParameterExpression::symbol("θ[0]"), QubitId(0)).unwrap();
        let err = emit(&b.build()).unwrap_err();
        assert!(matches!(err, EmitError::UnboundParameter(name) if name == "θ[0]"));
    }
}
