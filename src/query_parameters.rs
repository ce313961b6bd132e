use crate::builder::FailurePolicy;
use crate::render::View;
use serde::Deserialize;

/// The (optional) URL parameters of the map page and annotation endpoints.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryParameters {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub zoom: Option<u8>,
    pub policy: Option<String>,
    pub title: Option<String>,
}

impl QueryParameters {
    /// Center on `lat`/`lon` if both are given, otherwise keep the default.
    /// The zoom defaults to 13, a city-level view.
    pub fn view(&self, default: View) -> View {
        match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => View::Center {
                latitude,
                longitude,
                zoom: self.zoom.unwrap_or(13),
            },
            _ => default,
        }
    }

    /// Failure policy override; unknown values are ignored
    pub fn policy(&self, default: FailurePolicy) -> FailurePolicy {
        self.policy
            .as_deref()
            .and_then(|p| p.parse::<FailurePolicy>().ok())
            .unwrap_or(default)
    }

    /// Sanitizes the page title
    pub fn title(&self) -> Option<String> {
        let title = self.title.as_ref()?;
        if title.trim().is_empty() {
            None
        } else {
            Some(title.trim().to_string())
        }
    }
}
