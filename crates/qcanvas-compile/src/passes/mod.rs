//! Built-in compilation passes.

mod layout;
mod optimization;
mod routing;
mod translation;
mod verification;

pub use layout::TrivialLayout;
pub use optimization::PeepholeOptimization;
pub use routing::BasicRouting;
pub use translation::{BasisTranslation, is_in_basis};
pub use verification::{MeasurementVerification, measured_clbits};
