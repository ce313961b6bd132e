use crate::{
    builder::{AnnotationBuilder, BuildReport, FailurePolicy},
    config::Config,
    dataset,
    overpass::OverpassClient,
    page::MapPage,
    query_parameters::QueryParameters,
    travel::{clock_choice, travel_step},
};
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

const DEFAULT_TITLE: &str = "Travel bots";

#[derive(Debug, Clone)]
struct AppState {
    config: Arc<Config>,
    overpass: Option<OverpassClient>,
}

impl AppState {
    fn new(config: Config) -> Result<Self> {
        let overpass = config
            .overpass
            .as_ref()
            .map(|o| OverpassClient::new(&o.url))
            .transpose()?;
        Ok(Self {
            config: Arc::new(config),
            overpass,
        })
    }

    /// Reads the dataset from disk, optionally adds POIs from Overpass, and
    /// builds the annotations. With `travel`, every bot first takes one
    /// travel step; nothing is written back.
    async fn build_report(&self, policy: FailurePolicy, travel: bool) -> Result<BuildReport> {
        let mut bots = dataset::load(&self.config.dataset).await?;
        if let (Some(client), Some(settings)) = (&self.overpass, &self.config.overpass) {
            // A failing Overpass server should not take the map down
            if let Err(err) = client.enrich(&mut bots, &settings.key, &settings.value).await {
                tracing::warn!("Overpass enrichment failed: {err:#}");
            }
        }
        if travel {
            let moved = bots
                .iter_mut()
                .filter_map(|bot| travel_step(bot, clock_choice))
                .count();
            tracing::debug!(moved, "travel step done");
        }
        let report = AnnotationBuilder::new(policy).build(&bots)?;
        tracing::debug!(
            annotations = report.annotations.len(),
            skipped = report.errors.len(),
            "built annotations"
        );
        Ok(report)
    }
}

fn internal_error(err: anyhow::Error) -> StatusCode {
    tracing::error!("{err:#}");
    StatusCode::INTERNAL_SERVER_ERROR
}

#[axum::debug_handler]
async fn map_page(
    State(state): State<AppState>,
    params: Query<QueryParameters>,
) -> Result<Html<String>, StatusCode> {
    render_page(&state, params.0, false).await
}

#[axum::debug_handler]
async fn travel_page(
    State(state): State<AppState>,
    params: Query<QueryParameters>,
) -> Result<Html<String>, StatusCode> {
    render_page(&state, params.0, true).await
}

async fn render_page(
    state: &AppState,
    query: QueryParameters,
    travel: bool,
) -> Result<Html<String>, StatusCode> {
    let report = state
        .build_report(query.policy(state.config.policy), travel)
        .await
        .map_err(internal_error)?;
    let title = query.title().unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let html = MapPage::render(
        &report,
        query.view(state.config.view),
        &state.config.tiles,
        &title,
    )
    .map_err(internal_error)?;
    Ok(Html(html))
}

#[axum::debug_handler]
async fn annotations_json(
    State(state): State<AppState>,
    params: Query<QueryParameters>,
) -> Result<Json<BuildReport>, StatusCode> {
    let report = state
        .build_report(params.0.policy(state.config.policy), false)
        .await
        .map_err(internal_error)?;
    Ok(Json(report))
}

#[axum::debug_handler]
async fn health() -> &'static str {
    "ok"
}

pub async fn run_server(config: Config) -> Result<()> {
    let address = config.address;
    let port = config.port;
    tracing::info!(dataset = %config.dataset.display(), policy = ?config.policy, "loading bots");
    let state = AppState::new(config)?;

    let app = Router::new()
        .route("/", get(map_page))
        .route("/travel", get(travel_page))
        .route("/annotations.json", get(annotations_json))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state);

    let ip_addr = std::net::Ipv4Addr::from(address);
    tracing::info!("Starting server on http://{ip_addr}:{port}");

    let addr = SocketAddr::from((address, port));
    tracing::debug!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
