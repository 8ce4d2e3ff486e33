use crate::domains::route::GeoPoint;
use serde::{Deserialize, Serialize};

/// Landmarks count as reached within this many degrees on both axes.
pub const LANDMARK_PROXIMITY_DEG: f64 = 0.0008;

pub const DEFAULT_AUDIO_BASE_PATH: &str = "audio/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSpec {
    pub coords: GeoPoint,
    pub name: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub audio_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    pub coords: GeoPoint,
    pub name: String,
    pub remark: String,
    pub audio_id: Option<String>,
    visited: bool,
}

impl Landmark {
    pub fn visited(&self) -> bool {
        self.visited
    }
}

impl From<LandmarkSpec> for Landmark {
    fn from(spec: LandmarkSpec) -> Self {
        Self {
            coords: spec.coords,
            name: spec.name,
            remark: spec.remark,
            audio_id: spec.audio_id,
            visited: false,
        }
    }
}

/// Result of reaching a landmark for the first time in a traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkVisit {
    pub landmark_index: usize,
    pub name: String,
    pub remark: String,
    /// Audio file to play, present only when narration is enabled and the landmark has audio.
    pub narration: Option<String>,
    pub next_landmark: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckpointTracker {
    landmarks: Vec<Landmark>,
    audio_base_path: String,
    narration_enabled: bool,
}

impl CheckpointTracker {
    pub fn new(landmarks: Vec<LandmarkSpec>, audio_base_path: impl Into<String>, narration_enabled: bool) -> Self {
        Self {
            landmarks: landmarks.into_iter().map(Landmark::from).collect(),
            audio_base_path: audio_base_path.into(),
            narration_enabled,
        }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn first_landmark_name(&self) -> Option<String> {
        self.landmarks.first().map(|l| l.name.clone())
    }

    pub fn visited_count(&self) -> usize {
        self.landmarks.iter().filter(|l| l.visited).count()
    }

    pub fn narration_enabled(&self) -> bool {
        self.narration_enabled
    }

    pub fn set_narration_enabled(&mut self, enabled: bool) {
        self.narration_enabled = enabled;
    }

    pub fn narration_source(&self, audio_id: &str) -> String {
        format!("{}{}.mp3", self.audio_base_path, audio_id)
    }

    /// Mark the first unvisited landmark near `position` as visited.
    ///
    /// Matching is first-in-sequence, not nearest.
    pub fn visit_at(&mut self, position: &GeoPoint) -> Option<LandmarkVisit> {
        let landmark_index = self
            .landmarks
            .iter()
            .position(|l| !l.visited && l.coords.is_within(position, LANDMARK_PROXIMITY_DEG))?;

        self.landmarks[landmark_index].visited = true;
        let landmark = &self.landmarks[landmark_index];

        let narration = match (&landmark.audio_id, self.narration_enabled) {
            (Some(audio_id), true) => Some(self.narration_source(audio_id)),
            _ => None,
        };

        Some(LandmarkVisit {
            landmark_index,
            name: landmark.name.clone(),
            remark: landmark.remark.clone(),
            narration,
            next_landmark: self.landmarks.get(landmark_index + 1).map(|l| l.name.clone()),
        })
    }

    pub fn clear_visits(&mut self) {
        for landmark in &mut self.landmarks {
            landmark.visited = false;
        }
    }
}
