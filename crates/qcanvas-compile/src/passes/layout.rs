//! Layout: choose which device qubit hosts each circuit qubit.

use qcanvas_ir::Circuit;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

/// Maps logical qubit i to physical qubit i.
///
/// Runs only when the target has a coupling map and no layout has been set.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    #[allow(clippy::cast_possible_truncation)]
    fn run(&self, circuit: Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingLayout)?;

        let num_logical = circuit.num_qubits();
        if num_logical > coupling_map.num_qubits() as usize {
            return Err(CompileError::CircuitTooLarge {
                required: num_logical,
                available: coupling_map.num_qubits(),
            });
        }

        properties.layout = Some(Layout::trivial(num_logical as u32));
        Ok(circuit)
    }

    fn should_run(&self, _circuit: &Circuit, properties: &PropertySet) -> bool {
        properties.layout.is_none() && properties.coupling_map.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{BasisGates, CouplingMap};
    use qcanvas_ir::QubitId;

    #[test]
    fn test_trivial_layout() {
        let mut props =
            PropertySet::new().with_target(Some(CouplingMap::linear(5)), BasisGates::ibm());
        let circuit = Circuit::ghz(3).unwrap();

        TrivialLayout.run(circuit, &mut props).unwrap();

        let layout = props.layout.as_ref().unwrap();
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.get_physical(QubitId(2)), Some(2));
    }

    #[test]
    fn test_trivial_layout_too_large() {
        let mut props =
            PropertySet::new().with_target(Some(CouplingMap::linear(2)), BasisGates::ibm());
        let result = TrivialLayout.run(Circuit::ghz(3).unwrap(), &mut props);
        assert!(matches!(result, Err(CompileError::CircuitTooLarge { required: 3, .. })));
    }
}
