pub mod geo;
pub mod resolve;
pub mod routable;

pub use geo::*;
pub use resolve::*;
pub use routable::*;
