pub mod bootstrap;
pub mod runtime;
pub mod tour_service;

pub use bootstrap::*;
pub use runtime::*;
pub use tour_service::*;
