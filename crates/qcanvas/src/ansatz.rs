//! The canvas ansatz: an EfficientSU2-style circuit with full entanglement.
//!
//! For `n` qubits and `D` layers the circuit is
//!
//! ```text
//! [RY(θ) RZ(θ) on every qubit] ─ CX(i,j) for all i<j ─ ... (D times) ... ─ [RY RZ] ─ measure
//! ```
//!
//! Rotation block `b` (0..=D) uses angles `b*2n .. b*2n + n` for its RY gates
//! and the next `n` for its RZ gates, qubit-major within each half.

use qcanvas_ir::{Circuit, ParameterExpression, QubitId};

use crate::config::CanvasConfig;
use crate::error::{CanvasError, CanvasResult};

/// A symbolic template for one configuration, bound once per name.
#[derive(Debug, Clone)]
pub struct Ansatz {
    config: CanvasConfig,
    template: Circuit,
}

impl Ansatz {
    /// Build the symbolic template for `config`.
    pub fn new(config: &CanvasConfig) -> CanvasResult<Self> {
        config.validate()?;
        let n = config.num_qubits;
        let mut builder = Circuit::builder("canvas_ansatz", n, n);
        let mut index = 0usize;
        let mut next_angle = || {
            let symbol = ParameterExpression::symbol(format!("θ[{index}]"));
            index += 1;
            symbol
        };

        for block in 0..=config.layers {
            for q in 0..n {
                builder.ry(next_angle(), QubitId(q))?;
            }
            for q in 0..n {
                builder.rz(next_angle(), QubitId(q))?;
            }
            if block < config.layers {
                for i in 0..n {
                    for j in (i + 1)..n {
                        builder.cx(QubitId(i), QubitId(j))?;
                    }
                }
            }
        }
        builder.measure_all();

        Ok(Self {
            config: *config,
            template: builder.build(),
        })
    }

    /// Configuration the template was built for.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// The unbound template.
    pub fn template(&self) -> &Circuit {
        &self.template
    }

    /// Free parameters in the template.
    pub fn num_parameters(&self) -> usize {
        self.template.num_parameters()
    }

    /// Bind `params` into a new circuit named `name`.
    pub fn bind(&self, params: &[f64], name: impl Into<String>) -> CanvasResult<Circuit> {
        let expected = self.config.num_parameters();
        if params.len() != expected {
            return Err(CanvasError::ParameterCountMismatch {
                expected,
                actual: params.len(),
            });
        }
        Ok(self.template.bind_parameters(params)?.with_name(name))
    }
}

/// Build a bound circuit for `config` from `params`.
pub fn build_circuit(params: &[f64], config: &CanvasConfig) -> CanvasResult<Circuit> {
    Ansatz::new(config)?.bind(params, "canvas")
}

/// Name given to the circuit for a seed.
pub fn circuit_name(seed: u32) -> String {
    format!("canvas_{seed}")
}
