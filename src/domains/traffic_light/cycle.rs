use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightState {
    Green,
    Amber,
    Red,
}

impl LightState {
    /// Vehicles may only pass on green.
    pub fn stops_traffic(self) -> bool {
        !matches!(self, LightState::Green)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LightState::Green => "green",
            LightState::Amber => "amber",
            LightState::Red => "red",
        }
    }
}

/// Phase durations in whole seconds (ticks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightCycle {
    pub green: u32,
    pub amber: u32,
    pub red: u32,
}

impl LightCycle {
    pub fn total(&self) -> u64 {
        u64::from(self.green) + u64::from(self.amber) + u64::from(self.red)
    }

    pub fn state_at(&self, offset: u32, elapsed_ticks: u64) -> LightState {
        light_state(self, offset, elapsed_ticks)
    }
}

/// Color of a light after `elapsed_ticks` seconds.
///
/// The cycle must have a non-zero total; configuration loading guarantees it.
pub fn light_state(cycle: &LightCycle, offset: u32, elapsed_ticks: u64) -> LightState {
    let total = cycle.total();
    let t = elapsed_ticks.wrapping_add(u64::from(offset)) % total;
    if t < u64::from(cycle.green) {
        LightState::Green
    } else if t < u64::from(cycle.green) + u64::from(cycle.amber) {
        LightState::Amber
    } else {
        LightState::Red
    }
}
