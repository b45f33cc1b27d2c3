use crate::track::Track;
use serde_derive::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawFrame")]
pub struct Frame {
    pub dims: (u32, u32),
    pub tracks: Vec<Track>,
    pub timestamp: f64, // in seconds since stream start
    // tracks dropped while parsing, the rest of the frame is kept
    pub malformed_tracks: usize,
}

impl Frame {
    pub fn new(dims: (u32, u32), timestamp: f64, tracks: Vec<Track>) -> Self {
        Self {
            dims,
            tracks,
            timestamp,
            malformed_tracks: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[derive(Deserialize)]
struct RawFrame {
    dims: (u32, u32),
    #[serde(default)]
    tracks: Vec<serde_json::Value>,
    timestamp: f64,
}

impl From<RawFrame> for Frame {
    fn from(raw: RawFrame) -> Self {
        let mut frame = Frame::new(raw.dims, raw.timestamp, Vec::with_capacity(raw.tracks.len()));

        for value in raw.tracks {
            match serde_json::from_value::<Track>(value) {
                Ok(track) => frame.tracks.push(track),
                Err(err) => {
                    frame.malformed_tracks += 1;
                    warn!(timestamp = frame.timestamp, "dropping malformed track: {}", err);
                }
            }
        }

        frame
    }
}
