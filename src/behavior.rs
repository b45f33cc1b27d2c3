use std::fmt;

use crate::history::HistoryStore;

pub const POSER_MIN_DWELL_SECS: f64 = 8.0;
pub const POSER_MAX_VARIANCE: f64 = 100.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Behavior {
    Crosser,
    Poser,
}

impl Behavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Crosser => "Crosser",
            Behavior::Poser => "Poser",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tells a pedestrian posing for photos apart from one walking across.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorClassifier {
    pub min_dwell_secs: f64,
    pub max_variance: f64,
}

impl Default for BehaviorClassifier {
    fn default() -> Self {
        Self::new(POSER_MIN_DWELL_SECS, POSER_MAX_VARIANCE)
    }
}

impl BehaviorClassifier {
    pub fn new(min_dwell_secs: f64, max_variance: f64) -> Self {
        Self {
            min_dwell_secs,
            max_variance,
        }
    }

    /// Poser only when the pedestrian has dwelled strictly longer than the
    /// dwell window AND barely moved horizontally. Both bounds are strict.
    #[inline]
    pub fn from_stats(&self, duration: f64, variance: f64) -> Behavior {
        if duration > self.min_dwell_secs && variance < self.max_variance {
            Behavior::Poser
        } else {
            Behavior::Crosser
        }
    }

    /// Unknown tracks fall back to `Crosser`.
    pub fn classify(&self, history: &HistoryStore, track_id: u32, now: f64) -> Behavior {
        match history.duration(track_id, now) {
            Some(duration) => self.from_stats(duration, history.movement_variance(track_id)),
            None => Behavior::Crosser,
        }
    }
}
