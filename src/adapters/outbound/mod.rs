pub mod console_dashboard;
pub mod jsonl_event_sink;
pub mod logging;
pub mod narration;
pub mod route_data;

pub use console_dashboard::*;
pub use jsonl_event_sink::*;
pub use logging::*;
pub use narration::*;
pub use route_data::*;
