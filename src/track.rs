use crate::bbox::{BBox, Ltrb, Ltwh};
use crate::class::ObjectClass;
use serde_derive::Deserialize;

/// One confirmed tracker output as seen in a single frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTrack")]
pub struct Track {
    pub track_id: u32,
    // upstream detector class id
    pub class: i32,
    pub confidence: f32,
    pub confirmed: bool,
    pub bbox: BBox<Ltrb>,
}

impl Track {
    pub fn new(track_id: u32, class: i32, bbox: BBox<Ltrb>) -> Self {
        Self {
            track_id,
            class,
            confidence: 1.0,
            confirmed: true,
            bbox,
        }
    }

    #[inline]
    pub fn object_class(&self) -> Option<ObjectClass> {
        ObjectClass::from_class_id(self.class)
    }
}

#[derive(Deserialize)]
struct RawTrack {
    id: u32,
    #[serde(rename = "c")]
    class: i32,
    #[serde(rename = "p", default = "default_confidence")]
    confidence: f32,
    #[serde(default = "default_confirmed")]
    confirmed: bool,
    ltrb: Option<[f32; 4]>,
    ltwh: Option<[f32; 4]>,
}

fn default_confidence() -> f32 {
    1.0
}

fn default_confirmed() -> bool {
    true
}

impl TryFrom<RawTrack> for Track {
    type Error = String;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        let bbox = match (raw.ltrb, raw.ltwh) {
            (Some(ltrb), None) => BBox::<Ltrb>::assigned(&ltrb),
            (None, Some(ltwh)) => BBox::<Ltwh>::assigned(&ltwh).as_ltrb(),
            (Some(_), Some(_)) => {
                return Err(format!("track {}: both `ltrb` and `ltwh` given", raw.id))
            }
            (None, None) => return Err(format!("track {}: missing bounding box", raw.id)),
        };

        Ok(Self {
            track_id: raw.id,
            class: raw.class,
            confidence: raw.confidence,
            confirmed: raw.confirmed,
            bbox,
        })
    }
}
