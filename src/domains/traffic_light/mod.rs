pub mod aggregate;
pub mod cycle;

pub use aggregate::*;
pub use cycle::*;
