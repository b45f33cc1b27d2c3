use std::collections::HashMap;
use tracing::debug;

use crate::bbox::{BBox, Ltrb};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossingState {
    /// Seen at least once, line not crossed yet
    Tracked { last_bottom: f32 },
    /// Arrival already fired; terminal for the rest of the run
    Recorded,
}

/// Fires once per track when the bottom edge of its box moves from above
/// the horizontal line `line_y` to on-or-below it.
#[derive(Debug)]
pub struct CrossingDetector {
    line_y: f32,
    states: HashMap<u32, CrossingState>,
}

impl CrossingDetector {
    pub fn new(line_y: f32) -> Self {
        Self {
            line_y,
            states: HashMap::new(),
        }
    }

    #[inline]
    pub fn line_y(&self) -> f32 {
        self.line_y
    }

    /// Returns the crossing timestamp when the track has just arrived.
    pub fn check_crossing(&mut self, track_id: u32, bbox: &BBox<Ltrb>, timestamp: f64) -> Option<f64> {
        let bottom = bbox.bottom();

        match self.states.get_mut(&track_id) {
            None => {
                self.states
                    .insert(track_id, CrossingState::Tracked { last_bottom: bottom });
                None
            }

            Some(CrossingState::Recorded) => None,

            Some(CrossingState::Tracked { last_bottom }) => {
                if *last_bottom < self.line_y && self.line_y <= bottom {
                    debug!(
                        track_id,
                        from = *last_bottom,
                        to = bottom,
                        line_y = self.line_y,
                        "line crossed"
                    );

                    self.states.insert(track_id, CrossingState::Recorded);
                    Some(timestamp)
                } else {
                    *last_bottom = bottom;
                    None
                }
            }
        }
    }

    #[inline]
    pub fn state(&self, track_id: u32) -> Option<CrossingState> {
        self.states.get(&track_id).copied()
    }

    pub fn remove(&mut self, track_id: u32) -> Option<CrossingState> {
        self.states.remove(&track_id)
    }

    /// Full restart, e.g. before a new video
    pub fn reset(&mut self) {
        self.states.clear();
    }
}
