pub mod csv;
pub mod json;
pub mod report;
pub mod theme;

pub use csv::*;
pub use json::*;
pub use report::*;
pub use theme::*;
