use super::aggregate::Speed;
use serde::{Deserialize, Serialize};

/// User input accepted by a running tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourCommand {
    Start,
    Stop,
    Previous,
    Reset,
    SetSpeed(Speed),
    SetNarration(bool),
}

impl TourCommand {
    pub fn name(&self) -> &'static str {
        match self {
            TourCommand::Start => "start",
            TourCommand::Stop => "stop",
            TourCommand::Previous => "previous",
            TourCommand::Reset => "reset",
            TourCommand::SetSpeed(_) => "set_speed",
            TourCommand::SetNarration(_) => "set_narration",
        }
    }
}
