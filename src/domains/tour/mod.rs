pub mod actors;
pub mod aggregate;
pub mod commands;
pub mod events;
pub mod ports;
pub mod progress;
pub mod projections;
pub mod simulator;

pub use actors::*;
pub use aggregate::*;
pub use commands::*;
pub use events::*;
pub use ports::*;
pub use progress::*;
pub use projections::*;
pub use simulator::*;
