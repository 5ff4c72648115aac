//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qcanvas_ir::Circuit;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    BasicRouting, BasisTranslation, MeasurementVerification, PeepholeOptimization, TrivialLayout,
    measured_clbits,
};
use crate::property::{BasisGates, CouplingMap, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes, returning the compiled circuit.
    ///
    /// The measured classical bits of the input are recorded before the first
    /// pass so verification can compare against them.
    #[instrument(skip_all, fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );
        if properties.measured_clbits.is_none() {
            properties.measured_clbits = Some(measured_clbits(&circuit));
        }

        let mut circuit = circuit;
        for pass in &self.passes {
            if pass.should_run(&circuit, properties) {
                debug!("Running pass: {}", pass.name());
                circuit = pass.run(circuit, properties)?;
                debug!(
                    "Pass {} completed, ops: {}",
                    pass.name(),
                    circuit.instructions().len()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            circuit.depth(),
            circuit.instructions().len()
        );
        Ok(circuit)
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    optimization_level: u8,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            properties: PropertySet::new(),
        }
    }

    /// Set the optimization level.
    ///
    /// - Level 0: layout, routing and basis translation only
    /// - Level 1: + rotation merging
    /// - Level 2: + inverse-pair cancellation
    /// - Level 3: + repeat until no further reduction
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    /// Set the target properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set the target coupling map and basis gates.
    #[must_use]
    pub fn with_target(mut self, coupling_map: Option<CouplingMap>, basis_gates: BasisGates) -> Self {
        self.properties.coupling_map = coupling_map;
        self.properties.basis_gates = Some(basis_gates);
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        if self.properties.coupling_map.is_some() {
            pm.add_pass(TrivialLayout);
            pm.add_pass(BasicRouting);
        }
        if self.properties.basis_gates.is_some() {
            pm.add_pass(BasisTranslation);
        }
        if self.optimization_level >= 1 {
            pm.add_pass(PeepholeOptimization::for_level(self.optimization_level));
        }
        // Always last, so any optimization bug surfaces as an error.
        pm.add_pass(MeasurementVerification);

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile one circuit for a target in a single call.
pub fn transpile(
    circuit: Circuit,
    optimization_level: u8,
    target: &PropertySet,
) -> CompileResult<Circuit> {
    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(optimization_level)
        .with_properties(PropertySet {
            layout: None,
            measured_clbits: None,
            ..target.clone()
        })
        .build();
    pm.run(circuit, &mut props)
}
