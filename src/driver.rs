use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tracing::{info, warn};

use crate::error::Error;
use crate::{ArrivalCounter, ArrivalRecord, Counting, Frame};

const PROGRESS_EVERY_FRAMES: u64 = 100;

/// Anything that hands over tracker output one frame at a time.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Result<Frame, Error>>;
}

/// Tracker dump with one JSON frame per line.
pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;

        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Option<Result<Frame, Error>> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(serde_json::from_str(&line).map_err(|source| Error::MalformedFrame {
                line: self.line_no,
                source,
            }));
        }
    }
}

/// In-memory frames, mostly useful for replays and tests.
pub struct MemorySource {
    frames: std::vec::IntoIter<Frame>,
}

impl From<Vec<Frame>> for MemorySource {
    fn from(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl FrameSource for MemorySource {
    #[inline]
    fn next_frame(&mut self) -> Option<Result<Frame, Error>> {
        self.frames.next().map(Ok)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: u64,
    pub malformed_lines: u64,
    // tracks dropped from otherwise readable frames
    pub malformed_tracks: u64,
    pub unconfirmed: u64,
    pub low_confidence: u64,
    pub arrivals: usize,
}

/// Pulls frames from a source, keeps confirmed tracks above the confidence
/// threshold and hands them to the counter, one frame at a time.
pub struct FrameLoop {
    src: String,
    progress_every: u64,
}

impl FrameLoop {
    pub fn new<S: ToString>(src: S) -> Self {
        Self {
            src: src.to_string(),
            progress_every: PROGRESS_EVERY_FRAMES,
        }
    }

    pub fn with_progress_every(mut self, frames: u64) -> Self {
        self.progress_every = frames.max(1);
        self
    }

    #[inline]
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Runs until the source is exhausted. Malformed lines are skipped, a
    /// malformed track only drops itself. Any other source error ends the run.
    pub fn run<S, F>(
        &self,
        counter: &mut ArrivalCounter,
        source: &mut S,
        mut on_arrival: F,
    ) -> Result<LoopStats, Error>
    where
        S: FrameSource,
        F: FnMut(&ArrivalRecord),
    {
        let min_confidence = counter.config().min_confidence;
        let mut stats = LoopStats::default();

        while let Some(next) = source.next_frame() {
            let mut frame = match next {
                Ok(frame) => frame,
                Err(err @ Error::MalformedFrame { .. }) => {
                    stats.malformed_lines += 1;
                    warn!("skipping frame: {}", err);
                    continue;
                }
                Err(err) => return Err(err),
            };

            stats.frames += 1;
            stats.malformed_tracks += frame.malformed_tracks as u64;

            frame.tracks.retain(|t| {
                if !t.confirmed {
                    stats.unconfirmed += 1;
                    false
                } else if t.confidence < min_confidence {
                    stats.low_confidence += 1;
                    false
                } else {
                    true
                }
            });

            let arrived = counter.update(std::slice::from_ref(&frame), &self.src)?;

            if arrived > 0 {
                if let Some(scene) = counter.scene(&self.src) {
                    let records = scene.arrivals();
                    records[records.len() - arrived..].iter().for_each(&mut on_arrival);
                }
            }

            stats.arrivals += arrived;

            if stats.frames % self.progress_every == 0 {
                info!(
                    src = %self.src,
                    frames = stats.frames,
                    arrivals = stats.arrivals,
                    "progress"
                );
            }
        }

        Ok(stats)
    }
}
