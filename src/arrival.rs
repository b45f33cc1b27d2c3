use serde::Serializer;
use serde_derive::Serialize;
use std::fmt;

use crate::behavior::Behavior;
use crate::direction::Direction;

/// Rounds seconds to one decimal place, the resolution of the exported log.
///
/// Rounds the exact binary value, so `0.15` (stored as `0.1499...`) becomes
/// `0.1`. Scaling by ten first would round it up.
pub fn round_tenth(secs: f64) -> f64 {
    format!("{:.1}", secs).parse().unwrap_or(secs)
}

#[derive(Serialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityCategory {
    #[serde(rename = "EB Vehicles")]
    EbVehicles,
    #[serde(rename = "WB Vehicles")]
    WbVehicles,
    Crossers,
    Posers,
}

impl EntityCategory {
    pub const ALL: [EntityCategory; 4] = [
        EntityCategory::EbVehicles,
        EntityCategory::WbVehicles,
        EntityCategory::Crossers,
        EntityCategory::Posers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::EbVehicles => "EB Vehicles",
            EntityCategory::WbVehicles => "WB Vehicles",
            EntityCategory::Crossers => "Crossers",
            EntityCategory::Posers => "Posers",
        }
    }
}

impl From<Direction> for EntityCategory {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::EB => EntityCategory::EbVehicles,
            Direction::WB => EntityCategory::WbVehicles,
        }
    }
}

impl From<Behavior> for EntityCategory {
    fn from(behavior: Behavior) -> Self {
        match behavior {
            Behavior::Crosser => EntityCategory::Crossers,
            Behavior::Poser => EntityCategory::Posers,
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction for vehicles, behavior for pedestrians.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubType {
    Direction(Direction),
    Behavior(Behavior),
}

impl SubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubType::Direction(dir) => dir.as_str(),
            SubType::Behavior(behavior) => behavior.as_str(),
        }
    }

    #[inline]
    pub fn category(&self) -> EntityCategory {
        match *self {
            SubType::Direction(dir) => dir.into(),
            SubType::Behavior(behavior) => behavior.into(),
        }
    }
}

impl serde::Serialize for SubType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ServiceTime {
    NotApplicable,
    Seconds(f64),
}

pub const NOT_APPLICABLE_MARKER: &str = "-";

impl serde::Serialize for ServiceTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ServiceTime::NotApplicable => serializer.serialize_str(NOT_APPLICABLE_MARKER),
            ServiceTime::Seconds(secs) => serializer.serialize_f64(*secs),
        }
    }
}

impl fmt::Display for ServiceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTime::NotApplicable => f.write_str(NOT_APPLICABLE_MARKER),
            ServiceTime::Seconds(secs) => write!(f, "{:.1}", secs),
        }
    }
}

/// One arrival. Immutable once appended to an [`ArrivalLog`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ArrivalRecord {
    #[serde(rename = "ID")]
    sequence_id: usize,
    #[serde(rename = "Time (s)")]
    timestamp: f64,
    #[serde(rename = "Entity")]
    entity: EntityCategory,
    #[serde(rename = "Type/Dir")]
    sub_type: SubType,
    #[serde(rename = "Inter-Arrival (s)")]
    inter_arrival: f64,
    #[serde(rename = "Service Time (s)")]
    service_time: ServiceTime,
}

impl ArrivalRecord {
    #[inline]
    pub fn sequence_id(&self) -> usize {
        self.sequence_id
    }

    #[inline]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    #[inline]
    pub fn entity(&self) -> EntityCategory {
        self.entity
    }

    #[inline]
    pub fn sub_type(&self) -> SubType {
        self.sub_type
    }

    #[inline]
    pub fn inter_arrival(&self) -> f64 {
        self.inter_arrival
    }

    #[inline]
    pub fn service_time(&self) -> ServiceTime {
        self.service_time
    }
}

impl fmt::Display for ArrivalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} t={:.1}s {} ({}) inter-arrival={:.1}s service={}",
            self.sequence_id,
            self.timestamp,
            self.entity,
            self.sub_type,
            self.inter_arrival,
            self.service_time
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub entity: EntityCategory,
    pub count: usize,
    pub percentage: f64,
}

/// Append-only log of arrivals; sequence ids are `1..=len` in append order.
#[derive(Debug, Default, Clone)]
pub struct ArrivalLog {
    records: Vec<ArrivalRecord>,
}

impl ArrivalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record; `timestamp` and `inter_arrival` are rounded to one decimal here.
    pub fn append(
        &mut self,
        sub_type: SubType,
        timestamp: f64,
        inter_arrival: f64,
        service_time: ServiceTime,
    ) -> &ArrivalRecord {
        let record = ArrivalRecord {
            sequence_id: self.records.len() + 1,
            timestamp: round_tenth(timestamp),
            entity: sub_type.category(),
            sub_type,
            inter_arrival: round_tenth(inter_arrival),
            service_time,
        };

        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    #[inline]
    pub fn records(&self) -> &[ArrivalRecord] {
        &self.records
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &ArrivalRecord> {
        self.records.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, entity: EntityCategory) -> usize {
        self.records.iter().filter(|r| r.entity == entity).count()
    }

    /// Per-entity counts, most frequent first. Entities without arrivals are left out.
    pub fn summary(&self) -> Vec<EntitySummary> {
        let total = self.records.len();

        let mut summary: Vec<_> = EntityCategory::ALL
            .iter()
            .map(|&entity| (entity, self.count(entity)))
            .filter(|&(_, count)| count > 0)
            .map(|(entity, count)| EntitySummary {
                entity,
                count,
                percentage: count as f64 * 100.0 / total as f64,
            })
            .collect();

        summary.sort_by(|a, b| b.count.cmp(&a.count).then(a.entity.cmp(&b.entity)));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ids_are_contiguous() {
        let mut log = ArrivalLog::new();
        log.append(SubType::Direction(Direction::EB), 1.0, 0.0, ServiceTime::NotApplicable);
        log.append(SubType::Behavior(Behavior::Poser), 2.0, 0.0, ServiceTime::NotApplicable);
        log.append(SubType::Direction(Direction::EB), 3.0, 2.0, ServiceTime::NotApplicable);

        let ids: Vec<_> = log.iter().map(ArrivalRecord::sequence_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(log.records()[1].entity(), EntityCategory::Posers);
    }

    #[test]
    fn rounds_the_stored_binary_value() {
        assert_eq!(round_tenth(0.15), 0.1);
        assert_eq!(round_tenth(1.15), 1.1);
        assert_eq!(round_tenth(0.45), 0.5);
        assert_eq!(round_tenth(2.36), 2.4);
        assert_eq!(round_tenth(-0.15), -0.1);
        assert_eq!(round_tenth(9.0), 9.0);
    }

    #[test]
    fn append_rounds_to_tenths() {
        let mut log = ArrivalLog::new();
        let record = log.append(
            SubType::Behavior(Behavior::Crosser),
            12.345,
            3.26,
            ServiceTime::NotApplicable,
        );

        assert_eq!(record.timestamp(), 12.3);
        assert_eq!(record.inter_arrival(), 3.3);

        let record = log.append(SubType::Behavior(Behavior::Crosser), 0.15, 0.15, ServiceTime::NotApplicable);
        assert_eq!(record.timestamp(), 0.1);
        assert_eq!(record.inter_arrival(), 0.1);
    }

    #[test]
    fn serializes_with_export_column_names() {
        let mut log = ArrivalLog::new();
        log.append(SubType::Direction(Direction::WB), 4.0, 0.0, ServiceTime::NotApplicable);
        log.append(SubType::Behavior(Behavior::Crosser), 5.5, 0.0, ServiceTime::Seconds(2.5));

        let json = serde_json::to_value(log.records()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                {
                    "ID": 1,
                    "Time (s)": 4.0,
                    "Entity": "WB Vehicles",
                    "Type/Dir": "WB",
                    "Inter-Arrival (s)": 0.0,
                    "Service Time (s)": "-"
                },
                {
                    "ID": 2,
                    "Time (s)": 5.5,
                    "Entity": "Crossers",
                    "Type/Dir": "Crosser",
                    "Inter-Arrival (s)": 0.0,
                    "Service Time (s)": 2.5
                }
            ])
        );
    }

    #[test]
    fn field_order_matches_export_layout() {
        let mut log = ArrivalLog::new();
        log.append(SubType::Direction(Direction::EB), 1.0, 0.0, ServiceTime::NotApplicable);

        let line = serde_json::to_string(&log.records()[0]).unwrap();
        assert_eq!(
            line,
            r#"{"ID":1,"Time (s)":1.0,"Entity":"EB Vehicles","Type/Dir":"EB","Inter-Arrival (s)":0.0,"Service Time (s)":"-"}"#
        );
    }

    #[test]
    fn summary_counts_and_percentages() {
        let mut log = ArrivalLog::new();
        assert!(log.summary().is_empty());

        for t in 0..3 {
            log.append(SubType::Direction(Direction::EB), t as f64, 0.0, ServiceTime::NotApplicable);
        }
        log.append(SubType::Behavior(Behavior::Crosser), 4.0, 0.0, ServiceTime::NotApplicable);

        let summary = log.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].entity, EntityCategory::EbVehicles);
        assert_eq!(summary[0].count, 3);
        assert!((summary[0].percentage - 75.0).abs() < 1e-9);
        assert_eq!(summary[1].entity, EntityCategory::Crossers);
        assert!((summary[1].percentage - 25.0).abs() < 1e-9);
    }
}
