use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Bot,
    Poi,
}

/// Circle marker appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub weight: f64,
    /// Radius in metres
    pub radius: f64,
}

static BOT_STYLE: MarkerStyle = MarkerStyle {
    color: "green",
    fill_color: "green",
    fill_opacity: 0.2,
    weight: 0.6,
    radius: 10.0,
};

static POI_STYLE: MarkerStyle = MarkerStyle {
    color: "red",
    fill_color: "#f03",
    fill_opacity: 0.2,
    weight: 0.6,
    radius: 10.0,
};

impl Category {
    pub fn style(self) -> &'static MarkerStyle {
        match self {
            Category::Bot => &BOT_STYLE,
            Category::Poi => &POI_STYLE,
        }
    }
}

/// A marker ready for display. Built fresh on every run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    pub label: String,
}
