//! Reads bot datasets from JSON and normalizes them into [`Bot`] records.
//!
//! Three layouts are accepted:
//! - a list of bots with lowercase keys (`name`, `lat`, `lon`, `pois`)
//! - a list of bots with capitalised keys (`Name`, `Lat`, `Lon`, `Pois`)
//! - an object keyed by bot name, with POIs keyed by id and their tags
//!   flattened into the POI object
use crate::model::{Bot, Coordinate, Poi};
use crate::tags::PoiTags;
use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::warn;

const NAME_KEYS: &[&str] = &["name", "Name"];
const LATITUDE_KEYS: &[&str] = &["lat", "latitude", "Lat", "Latitude"];
const LONGITUDE_KEYS: &[&str] = &["lon", "longitude", "lng", "Lon", "Longitude"];
const RADIUS_KEYS: &[&str] = &["radius", "Radius"];
const POIS_KEYS: &[&str] = &["pois", "Pois", "POIs"];
const ID_KEYS: &[&str] = &["id", "ID", "osmid"];
const TAGS_KEYS: &[&str] = &["tags", "Tags"];
const VISIT_KEYS: &[&str] = &["VisitType", "visittype", "visitype"];
/// Keys on a POI object that are never tags
const POI_RESERVED_KEYS: &[&str] = &[
    "id", "ID", "osmid", "bsid", "botid", "lat", "latitude", "Lat", "Latitude", "lon",
    "longitude", "lng", "Lon", "Longitude", "tags", "Tags", "type", "VisitType", "visittype",
    "visitype",
];

pub async fn load(path: &Path) -> Result<Vec<Bot>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Could not read dataset {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid dataset {}", path.display()))
}

pub fn parse(text: &str) -> Result<Vec<Bot>> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value)
}

/// Entries that are not objects become records without coordinates, so the
/// builder reports them one by one instead of the whole dataset failing.
pub fn from_value(value: &Value) -> Result<Vec<Bot>> {
    match value {
        Value::Null => Ok(vec![]),
        Value::Array(bots) => Ok(bots
            .iter()
            .enumerate()
            .map(|(i, bot)| bot_from_value(&format!("#{i}"), None, bot))
            .collect()),
        Value::Object(bots) => Ok(bots
            .iter()
            .map(|(name, bot)| bot_from_value(name, Some(name.as_str()), bot))
            .collect()),
        _ => Err(anyhow!("Expected a list or an object of bots")),
    }
}

fn bot_from_value(label: &str, key_name: Option<&str>, value: &Value) -> Bot {
    let Some(object) = value.as_object() else {
        warn!("bot {label} is not an object");
        return Bot {
            name: key_name.unwrap_or_default().to_string(),
            ..Default::default()
        };
    };
    let name = match first(object, NAME_KEYS) {
        Some(Value::String(name)) => name.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => key_name.unwrap_or_default().to_string(),
    };
    let radius = first(object, RADIUS_KEYS).and_then(|v| coordinate(v)?.value().ok());
    let pois = match first(object, POIS_KEYS) {
        None | Some(Value::Null) => None,
        Some(Value::Array(pois)) => Some(pois.iter().map(|poi| poi_from_value(None, poi)).collect()),
        Some(Value::Object(pois)) => Some(
            pois.iter()
                .map(|(key, poi)| poi_from_value(Some(key), poi))
                .collect(),
        ),
        Some(other) => {
            // Kept as one entry without coordinates so it shows up as poi #0
            warn!("bot {label}: pois must be a list or an object, got {other}");
            Some(vec![Poi::default()])
        }
    };
    Bot {
        name,
        latitude: first(object, LATITUDE_KEYS).and_then(coordinate),
        longitude: first(object, LONGITUDE_KEYS).and_then(coordinate),
        radius,
        pois,
    }
}

fn poi_from_value(key: Option<&str>, value: &Value) -> Poi {
    let Some(object) = value.as_object() else {
        warn!("poi {value} is not an object");
        return Poi::default();
    };

    let id = first(object, ID_KEYS)
        .and_then(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .or_else(|| key.and_then(|k| k.trim().parse().ok()));

    let mut raw_tags = Map::new();
    if let Some(Value::Object(tags)) = first(object, TAGS_KEYS) {
        raw_tags.extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    for (k, v) in object {
        if !POI_RESERVED_KEYS.contains(&k.as_str()) && !raw_tags.contains_key(k) {
            raw_tags.insert(k.clone(), v.clone());
        }
    }

    Poi {
        id,
        latitude: first(object, LATITUDE_KEYS).and_then(coordinate),
        longitude: first(object, LONGITUDE_KEYS).and_then(coordinate),
        tags: PoiTags::from_raw(&raw_tags),
        visit: first(object, VISIT_KEYS)
            .and_then(Value::as_str)
            .and_then(|v| v.parse().ok()),
    }
}

fn first<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

/// `null` counts as missing; anything that is not a number is kept as text
/// so the builder can report it.
fn coordinate(value: &Value) -> Option<Coordinate> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(Coordinate::Number),
        Value::String(s) => Some(Coordinate::Text(s.clone())),
        other => Some(Coordinate::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Category;
    use crate::builder::AnnotationBuilder;
    use crate::error::{Reason, RecordRef};
    use crate::model::VisitType;
    use crate::tags::TagField;

    #[test]
    fn test_lowercase_list() {
        let bots = parse(
            r#"[{"name": "Bot1", "lat": 1.0, "lon": 2.0,
                 "pois": [{"lat": 1.1, "lon": 2.1, "tags": {"amenity": "cafe"}}]}]"#,
        )
        .unwrap();
        assert_eq!(bots.len(), 1);
        assert_eq!(bots[0].name, "Bot1");
        assert_eq!(bots[0].position(), Some((1.0, 2.0)));
        assert_eq!(bots[0].pois()[0].tags.get(TagField::Amenity), Some("cafe"));
    }

    #[test]
    fn test_capitalised_list() {
        let bots = parse(
            r#"[{"ID": 3, "Name": "Traveller", "Lat": 52.5, "Lon": 13.4, "Radius": 500,
                 "Pois": [{"id": 42, "lat": 52.51, "lon": 13.41, "VisitType": "maybe",
                           "tags": {"amenity": "restaurant", "Name_en": "Last Instance",
                                    "Addr_street": "Waisenstraße"}}]}]"#,
        )
        .unwrap();
        let bot = &bots[0];
        assert_eq!(bot.name, "Traveller");
        assert_eq!(bot.radius, Some(500.0));
        let poi = &bot.pois()[0];
        assert_eq!(poi.id, Some(42));
        assert_eq!(poi.tags.name_en.as_deref(), Some("Last Instance"));
        assert_eq!(poi.tags.addr_street.as_deref(), Some("Waisenstraße"));
        assert!(poi.tags.other.is_empty());
    }

    #[test]
    fn test_keyed_object_with_flattened_tags() {
        let bots = parse(
            r#"{"zeta": {"lat": 1, "lon": 1, "pois": {"77": {"lat": 1.1, "lon": 1.2,
                    "amenity": "pub", "name:en": "The Crown"}}},
                "alpha": {"lat": 2, "lon": 2, "pois": null}}"#,
        )
        .unwrap();
        let names: Vec<&str> = bots.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        let poi = &bots[0].pois()[0];
        assert_eq!(poi.id, Some(77));
        assert_eq!(poi.tags.amenity.as_deref(), Some("pub"));
        assert_eq!(poi.tags.name_en.as_deref(), Some("The Crown"));
        assert_eq!(bots[1].pois, None);
    }

    #[test]
    fn test_missing_and_text_coordinates() {
        let bots = parse(r#"[{"name": "a", "lat": null, "lon": "13.4"}]"#).unwrap();
        assert_eq!(bots[0].latitude, None);
        assert_eq!(bots[0].longitude, Some(Coordinate::Text("13.4".to_string())));
    }

    #[test]
    fn test_empty() {
        assert!(parse("[]").unwrap().is_empty());
        assert!(parse("{}").unwrap().is_empty());
        assert!(parse("null").unwrap().is_empty());
    }

    #[test]
    fn test_visit_type() {
        let bots = parse(
            r#"[{"name": "a", "lat": 1, "lon": 1, "pois": [
                {"lat": 1.1, "lon": 1.1, "VisitType": "maybe"},
                {"lat": 1.2, "lon": 1.2, "visittype": "visited"},
                {"lat": 1.3, "lon": 1.3, "VisitType": "someday"}]}]"#,
        )
        .unwrap();
        let visits: Vec<_> = bots[0].pois().iter().map(|p| p.visit).collect();
        assert_eq!(
            visits,
            vec![Some(VisitType::Maybe), Some(VisitType::Visited), None]
        );
        assert!(bots[0].pois()[0].tags.other.is_empty());
    }

    #[test]
    fn test_invalid_document() {
        assert!(parse("\"bots\"").is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn test_bad_entries_stay_local() {
        let bots = parse(
            r#"[{"name": "a", "lat": 1, "lon": 1, "pois": [5, {"lat": 1.1, "lon": 1.1}]},
                {"name": "b", "lat": 2, "lon": 2, "pois": 5},
                7,
                {"name": "c", "lat": 3, "lon": 3}]"#,
        )
        .unwrap();
        assert_eq!(bots.len(), 4);
        assert_eq!(bots[0].pois().len(), 2);
        assert_eq!(bots[0].pois()[0], Poi::default());
        assert_eq!(bots[1].pois(), &[Poi::default()]);
        assert_eq!(bots[2].position(), None);
        assert_eq!(bots[3].position(), Some((3.0, 3.0)));

        let report = AnnotationBuilder::default().build(&bots).unwrap();
        assert_eq!(report.count(Category::Bot), 3);
        assert_eq!(report.count(Category::Poi), 1);
        let records: Vec<RecordRef> = report.errors.iter().map(|e| e.record).collect();
        assert_eq!(
            records,
            vec![
                RecordRef::Poi { bot: 0, poi: 0 },
                RecordRef::Poi { bot: 1, poi: 0 },
                RecordRef::Bot { bot: 2 },
            ]
        );
        assert!(report.errors.iter().all(|e| e.reason == Reason::Missing));
    }

    #[test]
    fn test_keyed_bot_not_an_object() {
        let bots = parse(r#"{"ghost": "here", "real": {"lat": 1, "lon": 1}}"#).unwrap();
        assert_eq!(bots[0].name, "ghost");
        assert_eq!(bots[0].position(), None);
        assert_eq!(bots[1].position(), Some((1.0, 1.0)));
    }
}
