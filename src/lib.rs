pub mod arrival;
pub mod bbox;
pub mod behavior;
pub mod class;
pub mod config;
pub mod crossing;
pub mod direction;
pub mod driver;
pub mod error;
pub mod frame;
pub mod history;
pub mod scene;

mod track;

pub use arrival::{ArrivalRecord, EntityCategory, ServiceTime, SubType};
pub use config::SceneConfig;
pub use frame::Frame;
pub use scene::Scene;
pub use track::Track;

use error::Error;
use std::collections::HashMap;
use std::rc::Rc;

pub trait Counting {
    /// Feeds frames of one source, in stream order. Returns the number of new arrivals.
    fn update(&mut self, frames: &[Frame], src: &str) -> Result<usize, Error>;
    fn arrivals(&self, src: &str) -> Rc<[ArrivalRecord]>;
}

/// Counts arrivals for any number of sources (videos or segments), each with
/// its own independent [`Scene`].
pub struct ArrivalCounter {
    config: SceneConfig,
    scenes: HashMap<String, Scene>,
}

impl ArrivalCounter {
    pub fn new(config: SceneConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            scenes: HashMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn scene(&self, src: &str) -> Option<&Scene> {
        self.scenes.get(src)
    }

    pub fn remove(&mut self, src: &str) -> Option<Scene> {
        self.scenes.remove(src)
    }
}

impl Default for ArrivalCounter {
    fn default() -> Self {
        Self {
            config: SceneConfig::default(),
            scenes: HashMap::new(),
        }
    }
}

impl crate::Counting for ArrivalCounter {
    fn update(&mut self, frames: &[Frame], src: &str) -> Result<usize, Error> {
        let mut arrived = 0;

        for frame in frames {
            let config = &self.config;
            let scene = self
                .scenes
                .entry(src.to_string())
                .or_insert_with(|| Scene::new(config, frame.dims));

            arrived += scene.update(frame);
        }

        Ok(arrived)
    }

    #[inline]
    fn arrivals(&self, src: &str) -> Rc<[ArrivalRecord]> {
        if let Some(scene) = self.scenes.get(src) {
            return scene.arrivals().into();
        }

        Rc::new([])
    }
}
