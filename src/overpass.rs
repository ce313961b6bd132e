use crate::model::{Bot, Coordinate, Poi, VisitType};
use crate::tags::PoiTags;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, info};

const HTTP_USER_AGENT: &str = "botmap/0.1";
pub const DEFAULT_INTERPRETER_URL: &str = "https://overpass-api.de/api/interpreter";
const EARTH_RADIUS_KM: f64 = 6371.0;
const CACHE_DURATION: u64 = 10 * 60;

#[derive(Debug, Clone, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Clone, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: Map<String, Value>,
}

impl From<OverpassElement> for Poi {
    fn from(element: OverpassElement) -> Self {
        Poi {
            id: Some(element.id),
            latitude: element.lat.map(Coordinate::Number),
            longitude: element.lon.map(Coordinate::Number),
            tags: PoiTags::from_raw(&element.tags),
            visit: None,
        }
    }
}

/// Builds one Overpass QL query covering the surroundings of every bot.
///
/// Bots without valid coordinates are left out, so one broken record cannot
/// make the whole query invalid.
pub fn overpass_query(bots: &[Bot], key: &str, value: &str) -> String {
    let filter = format!("[\"{}\"=\"{}\"]", quote(key), quote(value));
    let points: String = bots
        .iter()
        .filter_map(|bot| {
            let (lat, lon) = bot.position()?;
            Some(format!(
                "node(around:{:.0},{lat:.6},{lon:.6}){filter};",
                bot.radius()
            ))
        })
        .collect();
    format!("[out:json];({points});out;")
}

fn quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Great-circle distance in metres
pub fn haversine(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let delta_lat = (lat_b - lat_a).to_radians();
    let delta_lon = (lon_b - lon_a).to_radians();
    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * 1000.0
}

/// Appends every POI that lies strictly inside a bot's radius to that bot.
///
/// Added POIs become travel candidates. A POI can belong to several bots.
/// POIs the bot already has (same OSM id) are not added again. Returns the
/// number of POIs added.
pub fn assign_nearby(bots: &mut [Bot], pois: &[Poi]) -> usize {
    let mut added = 0;
    for bot in bots.iter_mut() {
        let Some((bot_lat, bot_lon)) = bot.position() else {
            continue;
        };
        let radius = bot.radius();
        let list = bot.pois.get_or_insert_with(Vec::new);
        for poi in pois {
            let Some((lat, lon)) = poi.position() else {
                continue;
            };
            if haversine(bot_lat, bot_lon, lat, lon) >= radius {
                continue;
            }
            if poi.id.is_some() && list.iter().any(|p| p.id == poi.id) {
                continue;
            }
            list.push(poi.clone().with_visit(VisitType::Maybe));
            added += 1;
        }
    }
    added
}

#[derive(Debug, Clone)]
struct CachedPois {
    pois: Vec<Poi>,
    expires: Option<Instant>,
}

/// Overpass API client. Responses are cached per query, and clones share
/// the cache.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    url: String,
    cache: Arc<RwLock<HashMap<String, CachedPois>>>,
}

impl OverpassClient {
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(HTTP_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            cache: Arc::default(),
        })
    }

    pub async fn fetch(&self, query: &str) -> Result<Vec<Poi>> {
        if let Some(cached) = self.cache.read().await.get(query)
            && let Some(expires) = &cached.expires
            && expires > &Instant::now()
        {
            debug!(query, "overpass cache hit");
            return Ok(cached.pois.clone());
        }
        let pois = self.request(query).await?;
        self.store(query, &pois, Duration::from_secs(CACHE_DURATION)).await;
        Ok(pois)
    }

    async fn store(&self, query: &str, pois: &[Poi], ttl: Duration) {
        self.cache.write().await.insert(
            query.to_string(),
            CachedPois {
                pois: pois.to_vec(),
                expires: Some(Instant::now() + ttl),
            },
        );
    }

    async fn request(&self, query: &str) -> Result<Vec<Poi>> {
        debug!(query, "querying overpass");
        let response = self
            .client
            .post(&self.url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(format!("data={}", urlencoding::encode(query)))
            .send()
            .await?
            .error_for_status()?;
        let parsed: OverpassResponse = response.json().await?;
        Ok(parsed.elements.into_iter().map(Poi::from).collect())
    }

    /// Fetches POIs around all bots and attaches them to the bots.
    pub async fn enrich(&self, bots: &mut [Bot], key: &str, value: &str) -> Result<usize> {
        if bots.iter().all(|bot| bot.position().is_none()) {
            return Ok(0);
        }
        let pois = self.fetch(&overpass_query(bots, key, value)).await?;
        let added = assign_nearby(bots, &pois);
        info!(fetched = pois.len(), added, "overpass enrichment done");
        Ok(added)
    }
}
