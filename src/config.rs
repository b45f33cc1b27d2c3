use serde_derive::Deserialize;
use std::path::Path;

use crate::behavior::{BehaviorClassifier, POSER_MAX_VARIANCE, POSER_MIN_DWELL_SECS};
use crate::error::Error;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Pixel row of the arrival line, half of the frame height when unset
    pub line_y: Option<f32>,
    pub min_dwell_secs: f64,
    pub max_poser_variance: f64,
    /// Forget tracks unseen for longer than this many seconds. Never when unset.
    pub max_idle_secs: Option<f64>,
    /// Tracks below this detector confidence are dropped before counting
    pub min_confidence: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            line_y: None,
            min_dwell_secs: POSER_MIN_DWELL_SECS,
            max_poser_variance: POSER_MAX_VARIANCE,
            max_idle_secs: None,
            min_confidence: 0.0,
        }
    }
}

impl SceneConfig {
    pub fn new(line_y: f32) -> Self {
        Self {
            line_y: Some(line_y),
            ..Default::default()
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        let config: SceneConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if let Some(line_y) = self.line_y {
            if !line_y.is_finite() || line_y < 0.0 {
                return Err(Error::InvalidConfig(format!("line_y must be >= 0, got {}", line_y)));
            }
        }

        if let Some(idle) = self.max_idle_secs {
            if !idle.is_finite() || idle <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "max_idle_secs must be > 0, got {}",
                    idle
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(Error::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }

        if !self.min_dwell_secs.is_finite() || !self.max_poser_variance.is_finite() {
            return Err(Error::InvalidConfig("behavior thresholds must be finite".into()));
        }

        Ok(())
    }

    /// Arrival line for a frame of the given height
    #[inline]
    pub fn line_y_for(&self, frame_height: u32) -> f32 {
        self.line_y.unwrap_or((frame_height / 2) as f32)
    }

    #[inline]
    pub fn behavior_classifier(&self) -> BehaviorClassifier {
        BehaviorClassifier::new(self.min_dwell_secs, self.max_poser_variance)
    }
}
