use crate::annotation::{Annotation, Category};
use std::fmt::Write;

/// Zoom used when there is nothing to fit, mirroring a whole-world view
pub const WORLD_ZOOM: u8 = 2;

/// The calls the map widget has to support. Projection, tiles, gestures and
/// popups are the widget's business.
pub trait MapRenderer {
    type Handle;

    fn place_marker(
        &mut self,
        latitude: f64,
        longitude: f64,
        category: Category,
        label: &str,
    ) -> Self::Handle;

    fn center_and_zoom(&mut self, latitude: f64, longitude: f64, zoom: u8);

    fn fit_to_all_markers(&mut self);
}

/// Initial viewport after the markers are placed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum View {
    #[default]
    FitAll,
    Center {
        latitude: f64,
        longitude: f64,
        zoom: u8,
    },
}

/// Places every annotation in order, then sets the view.
pub fn render_annotations<R: MapRenderer>(
    renderer: &mut R,
    annotations: &[Annotation],
    view: View,
) -> Vec<R::Handle> {
    let handles = annotations
        .iter()
        .map(|a| renderer.place_marker(a.latitude, a.longitude, a.category, &a.label))
        .collect();

    match view {
        View::Center {
            latitude,
            longitude,
            zoom,
        } => renderer.center_and_zoom(latitude, longitude, zoom),
        View::FitAll if annotations.is_empty() => renderer.center_and_zoom(0.0, 0.0, WORLD_ZOOM),
        View::FitAll => renderer.fit_to_all_markers(),
    }
    handles
}

/// Emits Leaflet JavaScript that draws the markers on an existing map
/// object. Marker variables are named `marker0`, `marker1`, ...
#[derive(Debug, Clone)]
pub struct LeafletScript {
    map_var: String,
    script: String,
    markers: usize,
}

impl LeafletScript {
    pub fn new(map_var: &str) -> Self {
        Self {
            map_var: map_var.to_string(),
            script: String::new(),
            markers: 0,
        }
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn into_script(self) -> String {
        self.script
    }
}

/// Encodes text as a JavaScript string literal that is also safe inside an
/// inline `<script>` element.
pub fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string())
        .to_string()
        .replace("</", "<\\/")
}

impl MapRenderer for LeafletScript {
    type Handle = String;

    fn place_marker(
        &mut self,
        latitude: f64,
        longitude: f64,
        category: Category,
        label: &str,
    ) -> String {
        let style = category.style();
        let handle = format!("marker{}", self.markers);
        self.markers += 1;
        // Writing into a String cannot fail
        let _ = writeln!(
            self.script,
            "var {handle} = L.circle([{latitude:?}, {longitude:?}], {{color: {}, fillColor: {}, fillOpacity: {:?}, weight: {:?}, radius: {:?}}}).addTo({});",
            js_string(style.color),
            js_string(style.fill_color),
            style.fill_opacity,
            style.weight,
            style.radius,
            self.map_var,
        );
        let _ = writeln!(self.script, "{handle}.bindPopup({});", js_string(label));
        handle
    }

    fn center_and_zoom(&mut self, latitude: f64, longitude: f64, zoom: u8) {
        let _ = writeln!(
            self.script,
            "{}.setView([{latitude:?}, {longitude:?}], {zoom});",
            self.map_var
        );
    }

    fn fit_to_all_markers(&mut self) {
        // Leaflet throws on the bounds of an empty group
        if self.markers == 0 {
            self.center_and_zoom(0.0, 0.0, WORLD_ZOOM);
            return;
        }
        let markers = (0..self.markers)
            .map(|i| format!("marker{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            self.script,
            "{}.fitBounds(L.featureGroup([{markers}]).getBounds(), {{maxZoom: 16}});",
            self.map_var
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingRenderer {
        calls: Vec<String>,
    }

    impl MapRenderer for RecordingRenderer {
        type Handle = usize;

        fn place_marker(&mut self, lat: f64, lon: f64, category: Category, label: &str) -> usize {
            self.calls
                .push(format!("marker {lat} {lon} {category:?} {label}"));
            self.calls.len() - 1
        }

        fn center_and_zoom(&mut self, lat: f64, lon: f64, zoom: u8) {
            self.calls.push(format!("center {lat} {lon} {zoom}"));
        }

        fn fit_to_all_markers(&mut self) {
            self.calls.push("fit".to_string());
        }
    }

    fn annotation(lat: f64, category: Category, label: &str) -> Annotation {
        Annotation {
            latitude: lat,
            longitude: 0.5,
            category,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_render_fit_all() {
        let mut renderer = RecordingRenderer::default();
        let annotations = vec![
            annotation(1.0, Category::Bot, "b"),
            annotation(2.0, Category::Poi, "p"),
        ];
        let handles = render_annotations(&mut renderer, &annotations, View::FitAll);
        assert_eq!(handles, vec![0, 1]);
        assert_eq!(
            renderer.calls,
            vec!["marker 1 0.5 Bot b", "marker 2 0.5 Poi p", "fit"]
        );
    }

    #[test]
    fn test_render_center() {
        let mut renderer = RecordingRenderer::default();
        let view = View::Center {
            latitude: 52.0,
            longitude: 13.0,
            zoom: 13,
        };
        render_annotations(&mut renderer, &[annotation(1.0, Category::Bot, "b")], view);
        assert_eq!(renderer.calls.last().unwrap(), "center 52 13 13");
    }

    #[test]
    fn test_render_empty_shows_world() {
        let mut renderer = RecordingRenderer::default();
        let handles = render_annotations(&mut renderer, &[], View::FitAll);
        assert!(handles.is_empty());
        assert_eq!(renderer.calls, vec!["center 0 0 2"]);
    }

    #[test]
    fn test_leaflet_script() {
        let mut leaflet = LeafletScript::new("mymap");
        let annotations = vec![
            annotation(1.0, Category::Bot, "<h3>Bot1</h3>"),
            annotation(2.0, Category::Poi, "say \"hi\""),
        ];
        let handles = render_annotations(&mut leaflet, &annotations, View::FitAll);
        assert_eq!(handles, vec!["marker0", "marker1"]);
        let script = leaflet.into_script();
        assert!(script.contains("var marker0 = L.circle([1.0, 0.5], {color: \"green\""));
        assert!(script.contains("fillColor: \"#f03\""));
        assert!(script.contains(".addTo(mymap);"));
        assert!(script.contains(r#"marker0.bindPopup("<h3>Bot1<\/h3>");"#));
        assert!(script.contains(r#"marker1.bindPopup("say \"hi\"");"#));
        assert!(script.ends_with(
            "mymap.fitBounds(L.featureGroup([marker0, marker1]).getBounds(), {maxZoom: 16});\n"
        ));
    }

    #[test]
    fn test_leaflet_fit_without_markers() {
        let mut leaflet = LeafletScript::new("map");
        leaflet.fit_to_all_markers();
        assert_eq!(leaflet.script(), "map.setView([0.0, 0.0], 2);\n");
    }

    #[test]
    fn test_leaflet_set_view() {
        let mut leaflet = LeafletScript::new("map");
        leaflet.center_and_zoom(52.5, 13.25, 13);
        assert_eq!(leaflet.script(), "map.setView([52.5, 13.25], 13);\n");
    }
}
