//! Statevector simulation engine.
//!
//! Amplitude index bit `i` holds the state of qubit `i`.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use qcanvas_hal::{HalError, HalResult};
use qcanvas_ir::{Instruction, InstructionKind, StandardGate};

/// A statevector representing a quantum state.
pub(crate) struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub(crate) fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Apply an instruction to the statevector.
    ///
    /// Measurements and barriers leave the state untouched; sampling happens
    /// once the whole circuit has been applied.
    pub(crate) fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        let InstructionKind::Gate(gate) = &instruction.kind else {
            return Ok(());
        };
        let q: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        match gate {
            StandardGate::X => self.apply_x(q[0]),
            StandardGate::H => self.apply_h(q[0]),
            StandardGate::SX => self.apply_sx(q[0]),
            StandardGate::Rx(theta) | StandardGate::Ry(theta) | StandardGate::Rz(theta) => {
                let t = theta.as_f64().ok_or_else(|| {
                    HalError::InvalidCircuit(format!("unbound angle {theta} on {}", gate.name()))
                })?;
                match gate {
                    StandardGate::Rx(_) => self.apply_rx(q[0], t),
                    StandardGate::Ry(_) => self.apply_ry(q[0], t),
                    _ => self.apply_rz(q[0], t),
                }
            }
            StandardGate::CX => self.apply_cx(q[0], q[1]),
            StandardGate::CZ => self.apply_cz(q[0], q[1]),
        }
        Ok(())
    }

    /// Apply a 2x2 unitary `[[m00, m01], [m10, m11]]` to one qubit.
    fn apply_matrix(&mut self, qubit: usize, m: [[Complex64; 2]; 2]) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        self.apply_matrix(qubit, [[h, h], [h, -h]]);
    }

    fn apply_sx(&mut self, qubit: usize) {
        let p = Complex64::new(0.5, 0.5);
        let m = Complex64::new(0.5, -0.5);
        self.apply_matrix(qubit, [[p, m], [m, p]]);
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        self.apply_matrix(qubit, [[c, s], [s, c]]);
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        self.apply_matrix(qubit, [[c, -s], [s, c]]);
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    /// Cumulative outcome distribution, for inverse-transform sampling.
    pub(crate) fn cumulative_probabilities(&self) -> Vec<f64> {
        let mut total = 0.0;
        self.amplitudes
            .iter()
            .map(|amp| {
                total += amp.norm_sqr();
                total
            })
            .collect()
    }

    /// Index of the basis state selected by a uniform draw `r` in `[0, 1)`.
    ///
    /// `r` is scaled by the accumulated total, which drifts from 1 after
    /// many gates.
    pub(crate) fn outcome_for(cumulative: &[f64], r: f64) -> usize {
        let total = cumulative.last().copied().unwrap_or(1.0);
        let idx = cumulative.partition_point(|&c| c <= r * total);
        idx.min(cumulative.len().saturating_sub(1))
    }
}

/// Qubit-to-clbit wiring of a circuit's measurements.
pub(crate) struct MeasureMap {
    /// `(qubit, clbit)` pairs.
    pairs: Vec<(usize, usize)>,
    num_clbits: usize,
}

impl MeasureMap {
    pub(crate) fn from_instructions(instructions: &[Instruction], num_clbits: usize) -> Self {
        let pairs = instructions
            .iter()
            .filter(|inst| inst.is_measure())
            .flat_map(|inst| {
                inst.qubits
                    .iter()
                    .zip(&inst.clbits)
                    .map(|(q, c)| (q.index(), c.index()))
            })
            .collect();
        Self { pairs, num_clbits }
    }

    /// Render a basis state as a classical bitstring, clbit 0 rightmost.
    pub(crate) fn bitstring(&self, outcome: usize) -> String {
        let mut bits = vec![b'0'; self.num_clbits];
        for &(qubit, clbit) in &self.pairs {
            if (outcome >> qubit) & 1 == 1 {
                bits[self.num_clbits - 1 - clbit] = b'1';
            }
        }
        bits.into_iter().map(char::from).collect()
    }
}
