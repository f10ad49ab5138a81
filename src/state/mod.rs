pub mod hop;
pub mod path;
pub mod session;

pub use hop::*;
pub use path::*;
pub use session::*;
