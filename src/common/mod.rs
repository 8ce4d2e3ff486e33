pub mod error;
pub mod event;
pub mod aggregate;

pub use error::*;
pub use event::*;
pub use aggregate::*;
