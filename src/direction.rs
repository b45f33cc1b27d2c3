use std::collections::HashMap;
use std::fmt;

use crate::bbox::{BBox, Ltrb};

/// Travel direction by camera convention: rightward motion is eastbound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    EB,
    WB,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::EB => "EB",
            Direction::WB => "WB",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct DirectionClassifier {
    frame_width: f32,
    last_x: HashMap<u32, f32>,
}

impl DirectionClassifier {
    pub fn new(frame_width: f32) -> Self {
        Self {
            frame_width,
            last_x: HashMap::new(),
        }
    }

    /// Side of the frame the track's center is on. A center remembered from
    /// an earlier classification of the same track takes precedence, and the
    /// direction then follows the motion since that call.
    pub fn classify(&mut self, track_id: u32, bbox: &BBox<Ltrb>) -> Direction {
        let center_x = bbox.center_x();

        let moving_right = match self.last_x.insert(track_id, center_x) {
            Some(prev_x) => center_x > prev_x,
            None => center_x > self.frame_width / 2.0,
        };

        if moving_right {
            Direction::EB
        } else {
            Direction::WB
        }
    }

    pub fn remove(&mut self, track_id: u32) -> Option<f32> {
        self.last_x.remove(&track_id)
    }

    pub fn reset(&mut self) {
        self.last_x.clear();
    }
}
