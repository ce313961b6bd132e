use crate::builder::FailurePolicy;
use crate::overpass::DEFAULT_INTERPRETER_URL;
use crate::page::TileConfig;
use crate::render::View;
use std::{env, path::PathBuf};
use tracing::warn;

/// Server settings, read from `BOTMAP_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub address: [u8; 4],
    pub port: u16,
    pub dataset: PathBuf,
    pub policy: FailurePolicy,
    pub view: View,
    pub tiles: TileConfig,
    pub overpass: Option<OverpassConfig>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverpassConfig {
    pub url: String,
    pub key: String,
    pub value: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: [0, 0, 0, 0],
            port: 8000,
            dataset: PathBuf::from("data/bots.json"),
            policy: FailurePolicy::default(),
            view: View::default(),
            tiles: TileConfig::default(),
            overpass: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Unparsable values fall
    /// back to the default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(address) = Self::parsed(&lookup, "BOTMAP_ADDRESS", |s| {
            s.parse::<std::net::Ipv4Addr>().ok().map(|ip| ip.octets())
        }) {
            config.address = address;
        }
        if let Some(port) = Self::parsed(&lookup, "BOTMAP_PORT", |s| s.parse::<u16>().ok()) {
            config.port = port;
        }
        if let Some(dataset) = lookup("BOTMAP_DATASET").filter(|s| !s.trim().is_empty()) {
            config.dataset = PathBuf::from(dataset);
        }
        if let Some(policy) = Self::parsed(&lookup, "BOTMAP_POLICY", |s| {
            s.parse::<FailurePolicy>().ok()
        }) {
            config.policy = policy;
        }
        if let Some(view) = Self::parsed(&lookup, "BOTMAP_CENTER", Self::parse_center) {
            config.view = view;
        }
        if let Some(url) = lookup("BOTMAP_TILE_URL") {
            config.tiles.url = url;
        }
        if let Some(attribution) = lookup("BOTMAP_ATTRIBUTION") {
            config.tiles.attribution = attribution;
        }
        if let Some(max_zoom) =
            Self::parsed(&lookup, "BOTMAP_MAX_ZOOM", |s| s.parse::<u8>().ok())
        {
            config.tiles.max_zoom = max_zoom;
        }
        if lookup("BOTMAP_OVERPASS").as_deref().map(str::trim) == Some("1") {
            config.overpass = Some(OverpassConfig {
                url: lookup("BOTMAP_OVERPASS_URL")
                    .unwrap_or_else(|| DEFAULT_INTERPRETER_URL.to_string()),
                key: lookup("BOTMAP_POI_KEY").unwrap_or_else(|| "amenity".to_string()),
                value: lookup("BOTMAP_POI_VALUE").unwrap_or_else(|| "restaurant".to_string()),
            });
        }
        config
    }

    fn parsed<T>(
        lookup: &impl Fn(&str) -> Option<String>,
        key: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = lookup(key)?;
        let value = parse(raw.trim());
        if value.is_none() {
            warn!("Ignoring invalid {key}={raw:?}");
        }
        value
    }

    /// `lat,lon,zoom`, e.g. `52.52,13.405,13`
    fn parse_center(s: &str) -> Option<View> {
        let mut parts = s.split(',').map(str::trim);
        let latitude = parts.next()?.parse().ok()?;
        let longitude = parts.next()?.parse().ok()?;
        let zoom = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(View::Center {
            latitude,
            longitude,
            zoom,
        })
    }
}
