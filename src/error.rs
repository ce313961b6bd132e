use std::fmt;
use thiserror::Error;

/// Identifies the record a build error refers to, by position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordRef {
    Bot { bot: usize },
    Poi { bot: usize, poi: usize },
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Bot { bot } => write!(f, "bot #{bot}"),
            RecordRef::Poi { bot, poi } => write!(f, "poi #{poi} of bot #{bot}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateField {
    Latitude,
    Longitude,
}

impl CoordinateField {
    /// Largest absolute value in decimal degrees
    pub const fn limit(self) -> f64 {
        match self {
            CoordinateField::Latitude => 90.0,
            CoordinateField::Longitude => 180.0,
        }
    }
}

impl fmt::Display for CoordinateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateField::Latitude => write!(f, "latitude"),
            CoordinateField::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum Reason {
    Missing,
    NotNumeric(String),
    OutOfRange(f64),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Missing => write!(f, "missing"),
            Reason::NotNumeric(text) => write!(f, "not numeric ({text:?})"),
            Reason::OutOfRange(value) => write!(f, "out of range ({value})"),
        }
    }
}

/// A bot or POI whose coordinates cannot be turned into an annotation.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize)]
#[error("malformed {record}: {field} is {reason}")]
pub struct MalformedRecordError {
    pub record: RecordRef,
    pub field: CoordinateField,
    pub reason: Reason,
}

/// Non-fatal conditions reported alongside a successful build.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildWarning {
    /// No bot produced an annotation; the map will be empty.
    EmptyDataset,
}
