use crate::tags::{PoiTags, TagField};
use std::fmt::Write;

/// Popup text for a bot marker
pub fn bot_label(name: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "<h3>{}</h3><p>I'm here!</p><p>{}</p>",
        html_escape::encode_text(name),
        position_line(latitude, longitude)
    )
}

/// Popup text for a POI marker.
///
/// Every displayable tag gets a line, in `TagField::ALL` order, so a missing
/// tag shows up as an empty value and never shifts the other lines. House
/// number and street share one "Address" line.
pub fn poi_label(tags: &PoiTags, latitude: f64, longitude: f64) -> String {
    let mut html = String::new();
    for field in TagField::ALL {
        let (caption, value) = match field {
            TagField::AddrHousenumber => ("Address", address(tags)),
            TagField::AddrStreet => continue,
            _ => (
                field.caption(),
                html_escape::encode_text(tags.get(field).unwrap_or_default()).to_string(),
            ),
        };
        let element = if field == TagField::Name { "h3" } else { "p" };
        // Writing into a String cannot fail
        let _ = write!(html, "<{element}>{caption}: {value}</{element}>");
    }
    let _ = write!(html, "<p>{}</p>", position_line(latitude, longitude));
    html
}

fn address(tags: &PoiTags) -> String {
    [tags.addr_housenumber.as_deref(), tags.addr_street.as_deref()]
        .into_iter()
        .flatten()
        .map(|part| html_escape::encode_text(part).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn position_line(latitude: f64, longitude: f64) -> String {
    format!("{latitude}, {longitude}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_label() {
        let label = bot_label("Bot1", 1.0, 2.5);
        assert_eq!(label, "<h3>Bot1</h3><p>I'm here!</p><p>1, 2.5</p>");
    }

    #[test]
    fn test_bot_label_escapes_name() {
        let label = bot_label("<b>Evil & Co</b>", 0.0, 0.0);
        assert!(label.contains("&lt;b&gt;Evil &amp; Co&lt;/b&gt;"));
        assert!(!label.contains("<b>"));
    }

    #[test]
    fn test_poi_label_amenity() {
        let mut tags = PoiTags::default();
        tags.set(TagField::Amenity, "cafe");
        let label = poi_label(&tags, 1.1, 2.1);
        assert!(label.starts_with("<p>Amenity: cafe</p>"));
        assert!(label.ends_with("<p>1.1, 2.1</p>"));
    }

    #[test]
    fn test_poi_label_missing_tags_keep_their_lines() {
        let label = poi_label(&PoiTags::default(), 0.0, 0.0);
        assert_eq!(
            label,
            "<p>Amenity: </p><h3>Name: </h3><p>Name (en): </p><p>Description: </p>\
             <p>Address: </p><p>Opening hours: </p><p>Phone: </p><p>Cuisine: </p>\
             <p>Internet: </p><p>Wheelchair: </p><p>Smoking: </p><p>0, 0</p>"
        );
    }

    #[test]
    fn test_poi_label_field_order_is_fixed() {
        let mut tags = PoiTags::default();
        tags.set(TagField::Smoking, "no");
        tags.set(TagField::Amenity, "restaurant");
        tags.set(TagField::Cuisine, "thai");
        let label = poi_label(&tags, 0.0, 0.0);
        let amenity = label.find("Amenity: restaurant").unwrap();
        let cuisine = label.find("Cuisine: thai").unwrap();
        let smoking = label.find("Smoking: no").unwrap();
        assert!(amenity < cuisine && cuisine < smoking);
    }

    #[test]
    fn test_poi_label_address() {
        let mut tags = PoiTags::default();
        tags.set(TagField::AddrHousenumber, "14");
        tags.set(TagField::AddrStreet, "Waisenstraße");
        assert!(poi_label(&tags, 0.0, 0.0).contains("<p>Address: 14 Waisenstraße</p>"));

        let mut tags = PoiTags::default();
        tags.set(TagField::AddrStreet, "Waisenstraße");
        assert!(poi_label(&tags, 0.0, 0.0).contains("<p>Address: Waisenstraße</p>"));
    }

    #[test]
    fn test_poi_label_escapes_values() {
        let mut tags = PoiTags::default();
        tags.set(TagField::Description, "<script>alert(1)</script>");
        let label = poi_label(&tags, 0.0, 0.0);
        assert!(!label.contains("<script>"));
        assert!(label.contains("&lt;script&gt;"));
    }
}
