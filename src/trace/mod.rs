pub mod executor;
pub mod public;
pub mod tracer;

pub use executor::*;
pub use public::*;
pub use tracer::*;
