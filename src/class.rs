use std::fmt;

pub const NAMES: [&str; 8] = [
    "person",
    "bicycle",
    "car",
    "motorbike",
    "aeroplane",
    "bus",
    "train",
    "truck",
];

/// Upstream (COCO) class ids that are counted as vehicles
pub const VEHICLE_CLASS_IDS: [i32; 4] = [2, 3, 5, 7];
pub const PERSON_CLASS_ID: i32 = 0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Person,
    Vehicle,
}

impl ObjectClass {
    /// Maps an upstream detector class id onto the classes the counter cares about.
    /// Anything else (bicycles, trains, ...) maps to `None`.
    pub fn from_class_id(class: i32) -> Option<Self> {
        match class {
            PERSON_CLASS_ID => Some(ObjectClass::Person),
            c if VEHICLE_CLASS_IDS.contains(&c) => Some(ObjectClass::Vehicle),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Person => "Person",
            ObjectClass::Vehicle => "Vehicle",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[inline]
pub fn class_name(class: i32) -> &'static str {
    usize::try_from(class)
        .ok()
        .and_then(|idx| NAMES.get(idx))
        .copied()
        .unwrap_or("unknown")
}
