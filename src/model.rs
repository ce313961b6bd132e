use crate::error::{CoordinateField, Reason};
use crate::regex_patterns::RE_NUMERIC_TEXT;
use crate::tags::PoiTags;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default search radius around a bot, in metres
pub const DEFAULT_RADIUS: f64 = 1000.0;

/// A coordinate as the loader found it: a JSON number or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// Returns the value in decimal degrees if it is a finite number.
    pub fn value(&self) -> Result<f64, Reason> {
        match self {
            Coordinate::Number(value) if value.is_finite() => Ok(*value),
            Coordinate::Number(value) => Err(Reason::NotNumeric(value.to_string())),
            Coordinate::Text(text) => {
                if !RE_NUMERIC_TEXT.is_match(text) {
                    return Err(Reason::NotNumeric(text.clone()));
                }
                match text.trim().parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(Reason::NotNumeric(text.clone())),
                }
            }
        }
    }
}

/// A latitude or longitude that is present, numeric, finite and inside
/// ±90 / ±180 degrees.
pub fn validated(value: Option<&Coordinate>, field: CoordinateField) -> Result<f64, Reason> {
    let value = value.ok_or(Reason::Missing)?.value()?;
    if value.abs() > field.limit() {
        return Err(Reason::OutOfRange(value));
    }
    Ok(value)
}

/// Whether a bot has been at a POI or may go there next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitType {
    Maybe,
    Visited,
}

impl FromStr for VisitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maybe" | "potential" => Ok(VisitType::Maybe),
            "visited" => Ok(VisitType::Visited),
            other => Err(format!("Unknown visit type: {other}")),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Number(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Poi {
    /// OpenStreetMap node id, when known
    pub id: Option<i64>,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    pub tags: PoiTags,
    pub visit: Option<VisitType>,
}

impl Poi {
    pub fn new(latitude: impl Into<Coordinate>, longitude: impl Into<Coordinate>) -> Self {
        Self {
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: PoiTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_visit(mut self, visit: VisitType) -> Self {
        self.visit = Some(visit);
        self
    }

    pub fn is_candidate(&self) -> bool {
        self.visit == Some(VisitType::Maybe)
    }

    /// Both coordinates, if both are valid.
    pub fn position(&self) -> Option<(f64, f64)> {
        position_of(self.latitude.as_ref(), self.longitude.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bot {
    pub name: String,
    pub latitude: Option<Coordinate>,
    pub longitude: Option<Coordinate>,
    /// Search radius for nearby POIs, in metres
    pub radius: Option<f64>,
    /// `None` and an empty list both mean the bot has no POIs
    pub pois: Option<Vec<Poi>>,
}

impl Bot {
    pub fn new(
        name: &str,
        latitude: impl Into<Coordinate>,
        longitude: impl Into<Coordinate>,
    ) -> Self {
        Self {
            name: name.to_string(),
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
            ..Default::default()
        }
    }

    pub fn with_pois(mut self, pois: Vec<Poi>) -> Self {
        self.pois = Some(pois);
        self
    }

    pub fn pois(&self) -> &[Poi] {
        self.pois.as_deref().unwrap_or_default()
    }

    pub fn radius(&self) -> f64 {
        self.radius.unwrap_or(DEFAULT_RADIUS)
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        position_of(self.latitude.as_ref(), self.longitude.as_ref())
    }
}

fn position_of(lat: Option<&Coordinate>, lon: Option<&Coordinate>) -> Option<(f64, f64)> {
    let lat = validated(lat, CoordinateField::Latitude).ok()?;
    let lon = validated(lon, CoordinateField::Longitude).ok()?;
    Some((lat, lon))
}
