pub mod stdin_controls;

pub use stdin_controls::*;
