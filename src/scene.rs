use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::arrival::{ArrivalLog, ArrivalRecord, EntityCategory, ServiceTime, SubType};
use crate::behavior::BehaviorClassifier;
use crate::class::{class_name, ObjectClass};
use crate::config::SceneConfig;
use crate::crossing::CrossingDetector;
use crate::direction::DirectionClassifier;
use crate::error::Error;
use crate::history::HistoryStore;
use crate::{Frame, Track};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub frames: u64,
    pub observations: u64,
    // malformed track updates
    pub skipped: u64,
    // tracks of classes that are not counted
    pub ignored: u64,
    pub evicted: u64,
}

/// Owns every piece of per-track state of one run (one video or segment)
/// and turns confirmed track updates into arrivals.
#[derive(Debug)]
pub struct Scene {
    history: HistoryStore,
    crossing: CrossingDetector,
    direction: DirectionClassifier,
    behavior: BehaviorClassifier,
    last_arrival: HashMap<EntityCategory, f64>,
    last_seen: HashMap<u32, f64>,
    max_idle_secs: Option<f64>,
    log: ArrivalLog,
    stats: SceneStats,
}

impl Scene {
    pub fn new(config: &SceneConfig, dims: (u32, u32)) -> Self {
        let (fw, fh) = dims;

        Self {
            history: HistoryStore::new(),
            crossing: CrossingDetector::new(config.line_y_for(fh)),
            direction: DirectionClassifier::new(fw as f32),
            behavior: config.behavior_classifier(),
            last_arrival: HashMap::new(),
            last_seen: HashMap::new(),
            max_idle_secs: config.max_idle_secs,
            log: ArrivalLog::new(),
            stats: SceneStats::default(),
        }
    }

    /// Processes every track of the frame in the order given. Returns the
    /// number of arrivals appended.
    pub fn update(&mut self, frame: &Frame) -> usize {
        self.stats.frames += 1;
        self.evict_idle(frame.timestamp);

        let before = self.log.len();

        for track in frame.iter() {
            if let Err(err) = self.observe(track, frame.timestamp) {
                self.stats.skipped += 1;
                warn!(track_id = track.track_id, "skipping track update: {}", err);
            }
        }

        self.log.len() - before
    }

    /// Single track update. A malformed box is rejected before any state is touched.
    pub fn observe(&mut self, track: &Track, timestamp: f64) -> Result<Option<&ArrivalRecord>, Error> {
        let track_id = track.track_id;

        let Some(class) = track.object_class() else {
            self.stats.ignored += 1;
            debug!(track_id, class = class_name(track.class), "class is not counted");
            return Ok(None);
        };

        if !track.bbox.is_valid() {
            return Err(Error::InvalidBBox {
                track_id,
                bbox: track.bbox.into(),
            });
        }

        self.stats.observations += 1;
        self.touch(track_id, timestamp);

        if class == ObjectClass::Person {
            self.history.record(track_id, track.bbox.center_x(), timestamp);
        }

        let Some(arrived_at) = self.crossing.check_crossing(track_id, &track.bbox, timestamp) else {
            return Ok(None);
        };

        let sub_type = match class {
            ObjectClass::Vehicle => SubType::Direction(self.direction.classify(track_id, &track.bbox)),
            ObjectClass::Person => {
                SubType::Behavior(self.behavior.classify(&self.history, track_id, arrived_at))
            }
        };

        Ok(Some(self.record_arrival(track_id, sub_type, arrived_at)))
    }

    fn record_arrival(&mut self, track_id: u32, sub_type: SubType, timestamp: f64) -> &ArrivalRecord {
        let entity = sub_type.category();

        let inter_arrival = self
            .last_arrival
            .insert(entity, timestamp)
            .map(|last| timestamp - last)
            .unwrap_or(0.0);

        // service time is only known once the pedestrian leaves
        let record = self
            .log
            .append(sub_type, timestamp, inter_arrival, ServiceTime::NotApplicable);

        info!(
            track_id,
            id = record.sequence_id(),
            entity = entity.as_str(),
            time = record.timestamp(),
            inter_arrival = record.inter_arrival(),
            "arrival"
        );

        record
    }

    fn touch(&mut self, track_id: u32, timestamp: f64) {
        let Some(max_idle) = self.max_idle_secs else {
            return;
        };

        if let Some(last) = self.last_seen.insert(track_id, timestamp) {
            if timestamp - last > max_idle {
                debug!(track_id, gap = timestamp - last, "track id reappeared, starting over");
                self.forget(track_id);
                self.last_seen.insert(track_id, timestamp);
            }
        }
    }

    /// Drops all state of tracks unseen for longer than `max_idle_secs`.
    pub fn evict_idle(&mut self, now: f64) -> usize {
        let Some(max_idle) = self.max_idle_secs else {
            return 0;
        };

        let idle: Vec<u32> = self
            .last_seen
            .iter()
            .filter(|&(_, &last)| now - last > max_idle)
            .map(|(&id, _)| id)
            .collect();

        for &track_id in &idle {
            debug!(track_id, "evicting idle track");
            self.forget(track_id);
        }

        idle.len()
    }

    fn forget(&mut self, track_id: u32) {
        self.history.remove(track_id);
        self.crossing.remove(track_id);
        self.direction.remove(track_id);
        self.last_seen.remove(&track_id);
        self.stats.evicted += 1;
    }

    /// On-demand service time of a pedestrian, not part of the emitted record.
    #[inline]
    pub fn service_time(&self, track_id: u32, now: f64) -> Option<f64> {
        self.history.service_time(track_id, now)
    }

    /// Clears all per-track state and the log, for a fresh run.
    pub fn reset(&mut self) {
        self.history.clear();
        self.crossing.reset();
        self.direction.reset();
        self.last_arrival.clear();
        self.last_seen.clear();
        self.log = ArrivalLog::new();
        self.stats = SceneStats::default();
    }

    #[inline]
    pub fn line_y(&self) -> f32 {
        self.crossing.line_y()
    }

    #[inline]
    pub fn arrivals(&self) -> &[ArrivalRecord] {
        self.log.records()
    }

    #[inline]
    pub fn log(&self) -> &ArrivalLog {
        &self.log
    }

    #[inline]
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    #[inline]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[inline]
    pub fn crossing(&self) -> &CrossingDetector {
        &self.crossing
    }
}
