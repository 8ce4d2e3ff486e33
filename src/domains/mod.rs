pub mod checkpoint;
pub mod logger;
pub mod route;
pub mod tour;
pub mod traffic_light;

pub use checkpoint::*;
pub use logger::*;
pub use route::*;
pub use tour::*;
pub use traffic_light::*;
