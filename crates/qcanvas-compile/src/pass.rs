//! Pass trait and types for compilation passes.

use qcanvas_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the circuit and records facts in the `PropertySet`.
    Analysis,
    /// Produces a rewritten circuit.
    Transformation,
}

/// A compilation pass.
///
/// Circuits are immutable, so a pass takes ownership of its input and returns
/// the circuit the next pass should see. Analysis passes return their input
/// unchanged.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass.
    fn run(&self, circuit: Circuit, properties: &mut PropertySet) -> CompileResult<Circuit>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl Pass for Identity {
        fn name(&self) -> &'static str {
            "identity"
        }

        fn kind(&self) -> PassKind {
            PassKind::Analysis
        }

        fn run(&self, circuit: Circuit, _properties: &mut PropertySet) -> CompileResult<Circuit> {
            Ok(circuit)
        }
    }

    #[test]
    fn test_pass_kind() {
        let pass = Identity;
        assert_eq!(pass.kind(), PassKind::Analysis);
        assert_eq!(pass.name(), "identity");
        assert!(pass.should_run(&Circuit::bell().unwrap(), &PropertySet::new()));
    }
}
