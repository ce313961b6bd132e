use crate::builder::BuildReport;
use crate::render::{LeafletScript, View, js_string, render_annotations};
use aho_corasick::AhoCorasick;
use anyhow::Result;

const MAP_VAR: &str = "mymap";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en"><head>
<title>{title}</title>
<meta http-equiv="content-type" content="text/html; charset=utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
html, body { height: 100%; margin: 0; }
#map { height: 90%; }
#skipped { font-family: sans-serif; font-size: small; padding: 0 1em; }
</style>
</head>
<body>
<div id="map"></div>
<div id="skipped">{errors}</div>
<script type="text/javascript">
var mymap = L.map('map');
L.tileLayer({tile_url}, {
    attribution: {attribution},
    maxZoom: {max_zoom}
}).addTo(mymap);
{script}</script>
</body>
</html>
"#;

/// Tile layer settings for the generated page
#[derive(Debug, Clone, PartialEq)]
pub struct TileConfig {
    pub url: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: r#"Map data &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#.to_string(),
            max_zoom: 18,
        }
    }
}

pub struct MapPage;

impl MapPage {
    /// Renders a complete HTML page showing the annotations of `report`.
    pub fn render(
        report: &BuildReport,
        view: View,
        tiles: &TileConfig,
        title: &str,
    ) -> Result<String> {
        let mut leaflet = LeafletScript::new(MAP_VAR);
        render_annotations(&mut leaflet, &report.annotations, view);

        let replacements = [
            ("{title}", html_escape::encode_text(title).to_string()),
            ("{tile_url}", js_string(&tiles.url)),
            ("{attribution}", js_string(&tiles.attribution)),
            ("{max_zoom}", tiles.max_zoom.to_string()),
            ("{errors}", Self::error_list(report)),
            ("{script}", leaflet.into_script()),
        ];
        let (patterns, values): (Vec<_>, Vec<_>) = replacements.into_iter().unzip();

        // One pass, so placeholders inside inserted values are left alone
        let ac = AhoCorasick::new(patterns)?;
        Ok(ac.replace_all(PAGE_TEMPLATE, &values))
    }

    fn error_list(report: &BuildReport) -> String {
        if report.errors.is_empty() {
            return String::new();
        }
        let items: String = report
            .errors
            .iter()
            .map(|err| format!("<li>{}</li>", html_escape::encode_text(&err.to_string())))
            .collect();
        format!(
            "<p>Skipped {} record(s):</p><ul>{items}</ul>",
            report.errors.len()
        )
    }
}
