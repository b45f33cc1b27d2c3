use nalgebra as na;
use std::collections::HashMap;

use crate::arrival::round_tenth;

#[derive(Debug, Clone)]
pub struct PedestrianHistory {
    pub start_time: f64,
    // horizontal centers, in arrival order
    pub positions: Vec<f32>,
}

impl PedestrianHistory {
    fn new(start_time: f64, center_x: f32) -> Self {
        Self {
            start_time,
            positions: vec![center_x],
        }
    }

    #[inline]
    pub fn duration(&self, now: f64) -> f64 {
        now - self.start_time
    }

    /// Population variance of the recorded centers, zero below two samples.
    pub fn movement_variance(&self) -> f64 {
        if self.positions.len() < 2 {
            return 0.0;
        }

        na::DVector::from_iterator(
            self.positions.len(),
            self.positions.iter().map(|&x| x as f64),
        )
        .variance()
    }
}

/// Per-track accumulator of pedestrian positions.
#[derive(Debug, Default)]
pub struct HistoryStore {
    tracks: HashMap<u32, PedestrianHistory>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, track_id: u32, center_x: f32, timestamp: f64) {
        self.tracks
            .entry(track_id)
            .and_modify(|h| h.positions.push(center_x))
            .or_insert_with(|| PedestrianHistory::new(timestamp, center_x));
    }

    #[inline]
    pub fn get(&self, track_id: u32) -> Option<&PedestrianHistory> {
        self.tracks.get(&track_id)
    }

    #[inline]
    pub fn duration(&self, track_id: u32, now: f64) -> Option<f64> {
        self.get(track_id).map(|h| h.duration(now))
    }

    #[inline]
    pub fn movement_variance(&self, track_id: u32) -> f64 {
        self.get(track_id)
            .map(PedestrianHistory::movement_variance)
            .unwrap_or(0.0)
    }

    /// How long the pedestrian has occupied the crossing so far, to one decimal.
    pub fn service_time(&self, track_id: u32, now: f64) -> Option<f64> {
        self.duration(track_id, now).map(round_tenth)
    }

    pub fn remove(&mut self, track_id: u32) -> Option<PedestrianHistory> {
        self.tracks.remove(&track_id)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
