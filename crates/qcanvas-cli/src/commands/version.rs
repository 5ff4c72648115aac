//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - name to quantum fingerprint",
        style("Quantum Canvas").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcanvas-ir       Circuit intermediate representation");
    println!("  qcanvas-compile  Transpilation passes");
    println!("  qcanvas-qasm3    OpenQASM 3.0 emitter");
    println!("  qcanvas-hal      Backend abstraction and result validation");
    println!("  qcanvas          Seed, ansatz and batch pipeline");
    println!("  qcanvas-cli      Command-line interface");
    println!();
    println!("Backends:");
    println!("  local            Statevector simulator");
    println!("  cloud            IBM Quantum (IBM_API_KEY + IBM_SERVICE_CRN, or IBM_QUANTUM_TOKEN)");
    println!();
    println!("License:    {}", style("Apache-2.0").dim());
}
