use super::cycle::{LightCycle, LightState};
use crate::common::{DomainError, DomainResult};
use crate::domains::route::GeoPoint;
use serde::{Deserialize, Serialize};

/// Configured traffic light as read from the tour file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficLightSpec {
    pub coords: GeoPoint,
    pub name: String,
    pub cycle: LightCycle,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficLight {
    pub coords: GeoPoint,
    pub name: String,
    pub cycle: LightCycle,
    pub offset: u32,
    state: LightState,
}

impl TrafficLight {
    pub fn state(&self) -> LightState {
        self.state
    }
}

/// A light whose color differs from the previous tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightChange {
    pub light_index: usize,
    pub name: String,
    pub state: LightState,
}

/// Owns every configured light and the shared tick counter.
///
/// States are recomputed from the tick counter on each tick; the stored
/// state is only a cache of the last evaluation.
#[derive(Debug, Clone, Default)]
pub struct TrafficLightSimulator {
    lights: Vec<TrafficLight>,
    elapsed_ticks: u64,
}

impl TrafficLightSimulator {
    pub fn new(specs: Vec<TrafficLightSpec>) -> DomainResult<Self> {
        let lights = specs
            .into_iter()
            .map(|spec| {
                if spec.cycle.total() == 0 {
                    return Err(DomainError::invalid_config(format!(
                        "traffic light `{}` has a zero-length cycle",
                        spec.name
                    )));
                }
                Ok(TrafficLight {
                    state: spec.cycle.state_at(spec.offset, 0),
                    coords: spec.coords,
                    name: spec.name,
                    cycle: spec.cycle,
                    offset: spec.offset,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self { lights, elapsed_ticks: 0 })
    }

    pub fn lights(&self) -> &[TrafficLight] {
        &self.lights
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// Advance one second and report the lights that changed color.
    pub fn tick(&mut self) -> Vec<LightChange> {
        self.elapsed_ticks += 1;
        let ticks = self.elapsed_ticks;

        let mut changes = Vec::new();
        for (light_index, light) in self.lights.iter_mut().enumerate() {
            let state = light.cycle.state_at(light.offset, ticks);
            if state != light.state {
                light.state = state;
                changes.push(LightChange { light_index, name: light.name.clone(), state });
            }
        }
        changes
    }

    /// First light in configured order within `radius` degrees of `position`.
    pub fn light_near(&self, position: &GeoPoint, radius: f64) -> Option<(usize, &TrafficLight)> {
        self.lights
            .iter()
            .enumerate()
            .find(|(_, light)| light.coords.is_within(position, radius))
    }
}
