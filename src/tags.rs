use crate::regex_patterns::{RE_LEGACY_ADDRESS, RE_LEGACY_NAME_LANGUAGE};
use serde::Serialize;
use serde_json::{Map, Value};

/// The POI tags the map knows how to display, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Amenity,
    Name,
    NameEn,
    Description,
    AddrHousenumber,
    AddrStreet,
    OpeningHours,
    Phone,
    Cuisine,
    InternetAccess,
    Wheelchair,
    Smoking,
}

impl TagField {
    pub const ALL: [TagField; 12] = [
        TagField::Amenity,
        TagField::Name,
        TagField::NameEn,
        TagField::Description,
        TagField::AddrHousenumber,
        TagField::AddrStreet,
        TagField::OpeningHours,
        TagField::Phone,
        TagField::Cuisine,
        TagField::InternetAccess,
        TagField::Wheelchair,
        TagField::Smoking,
    ];

    /// OpenStreetMap key
    pub const fn key(self) -> &'static str {
        match self {
            TagField::Amenity => "amenity",
            TagField::Name => "name",
            TagField::NameEn => "name:en",
            TagField::Description => "description",
            TagField::AddrHousenumber => "addr:housenumber",
            TagField::AddrStreet => "addr:street",
            TagField::OpeningHours => "opening_hours",
            TagField::Phone => "phone",
            TagField::Cuisine => "cuisine",
            TagField::InternetAccess => "internet_access",
            TagField::Wheelchair => "wheelchair",
            TagField::Smoking => "smoking",
        }
    }

    /// Human readable caption used in popups
    pub const fn caption(self) -> &'static str {
        match self {
            TagField::Amenity => "Amenity",
            TagField::Name => "Name",
            TagField::NameEn => "Name (en)",
            TagField::Description => "Description",
            TagField::AddrHousenumber => "House number",
            TagField::AddrStreet => "Street",
            TagField::OpeningHours => "Opening hours",
            TagField::Phone => "Phone",
            TagField::Cuisine => "Cuisine",
            TagField::InternetAccess => "Internet",
            TagField::Wheelchair => "Wheelchair",
            TagField::Smoking => "Smoking",
        }
    }

    /// Maps any observed spelling of a tag name onto a known field.
    pub fn from_key(raw: &str) -> Option<Self> {
        let key = canonical_key(raw);
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Lowercases a tag name and rewrites legacy spellings to the OSM form.
///
/// Unknown keys are only lowercased, so `payment:bitcoin` stays as it is.
pub fn canonical_key(raw: &str) -> String {
    let key = raw.trim().to_ascii_lowercase();
    if let Some(captures) = RE_LEGACY_ADDRESS.captures(&key) {
        return format!("addr:{}", &captures[1]);
    }
    if let Some(captures) = RE_LEGACY_NAME_LANGUAGE.captures(&key) {
        return format!("name:{}", &captures[1]);
    }
    key
}

/// Canonical typed POI tags. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoiTags {
    pub amenity: Option<String>,
    pub name: Option<String>,
    pub name_en: Option<String>,
    pub description: Option<String>,
    pub addr_housenumber: Option<String>,
    pub addr_street: Option<String>,
    pub opening_hours: Option<String>,
    pub phone: Option<String>,
    pub cuisine: Option<String>,
    pub internet_access: Option<String>,
    pub wheelchair: Option<String>,
    pub smoking: Option<String>,
    /// Tags with no display slot, keyed by canonical name, in input order
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
}

impl PoiTags {
    /// Builds the typed tags from a loosely keyed JSON object.
    ///
    /// Strings are taken as is, numbers and booleans are stringified, `null`
    /// and blank strings count as absent. When two spellings of the same tag
    /// are present the first non-blank one wins.
    pub fn from_raw(raw: &Map<String, Value>) -> Self {
        let mut tags = PoiTags::default();
        for (key, value) in raw {
            let Some(text) = Self::value_text(value) else {
                continue;
            };
            match TagField::from_key(key) {
                Some(field) => {
                    let slot = tags.slot_mut(field);
                    if slot.is_none() {
                        *slot = Some(text);
                    }
                }
                None => {
                    tags.other
                        .entry(canonical_key(key))
                        .or_insert(Value::String(text));
                }
            }
        }
        tags
    }

    fn value_text(value: &Value) -> Option<String> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn get(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Amenity => self.amenity.as_deref(),
            TagField::Name => self.name.as_deref(),
            TagField::NameEn => self.name_en.as_deref(),
            TagField::Description => self.description.as_deref(),
            TagField::AddrHousenumber => self.addr_housenumber.as_deref(),
            TagField::AddrStreet => self.addr_street.as_deref(),
            TagField::OpeningHours => self.opening_hours.as_deref(),
            TagField::Phone => self.phone.as_deref(),
            TagField::Cuisine => self.cuisine.as_deref(),
            TagField::InternetAccess => self.internet_access.as_deref(),
            TagField::Wheelchair => self.wheelchair.as_deref(),
            TagField::Smoking => self.smoking.as_deref(),
        }
    }

    fn slot_mut(&mut self, field: TagField) -> &mut Option<String> {
        match field {
            TagField::Amenity => &mut self.amenity,
            TagField::Name => &mut self.name,
            TagField::NameEn => &mut self.name_en,
            TagField::Description => &mut self.description,
            TagField::AddrHousenumber => &mut self.addr_housenumber,
            TagField::AddrStreet => &mut self.addr_street,
            TagField::OpeningHours => &mut self.opening_hours,
            TagField::Phone => &mut self.phone,
            TagField::Cuisine => &mut self.cuisine,
            TagField::InternetAccess => &mut self.internet_access,
            TagField::Wheelchair => &mut self.wheelchair,
            TagField::Smoking => &mut self.smoking,
        }
    }

    pub fn set(&mut self, field: TagField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }
}
