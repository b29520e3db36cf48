use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::controller::{
    AddPropertyRequest, ChartRequest, ChartSettings, ControlState, Controller, Download,
};
use crate::error::DashboardError;
use crate::figures::ChartKind;
use crate::graph::{GraphOptions, create_graph};
use crate::loader;
use crate::property::PropertyKind;
use crate::store::PropertyStore;

const INDEX_TEMPLATE: &str = include_str!("./static/index.hbs");

/// State shared by every request handler
pub struct AppState {
    pub store: PropertyStore,
    pub config: Config,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new(store: PropertyStore, config: Config) -> Result<Self, DashboardError> {
        let mut templates = Handlebars::new();
        templates.set_strict_mode(true);
        templates
            .register_template_string("index", INDEX_TEMPLATE)
            .map_err(|e| DashboardError::Template(e.to_string()))?;
        Ok(AppState {
            store,
            config,
            templates,
        })
    }

    fn controller(&self, kind: PropertyKind) -> Controller<'_> {
        Controller::new(&self.store, kind, ChartSettings::from(&self.config))
    }
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match self {
            DashboardError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("Request failed: {}", self);
        (
            status,
            Json(StatusResponse {
                status: "error".to_string(),
                message: Some(self.to_string()),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for DashboardError {
    fn from(rejection: JsonRejection) -> Self {
        DashboardError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for DashboardError {
    fn from(rejection: PathRejection) -> Self {
        DashboardError::InvalidInput(rejection.body_text())
    }
}

/// `Json` extractor answering bad bodies with a JSON error
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(DashboardError))]
struct ApiJson<T>(T);

/// `Path` extractor answering unknown kinds or charts with a JSON error
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(DashboardError))]
struct ApiPath<T>(T);

impl IntoResponse for Download {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.content,
        )
            .into_response()
    }
}

/// Builds the router serving the dashboard page, the JSON API and static files
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(serve_dashboard))
        .route("/health", get(health))
        .route("/api/:kind/options", get(get_options))
        .route("/api/:kind/all_materials", get(get_all_materials))
        .route("/api/:kind/all_authors", get(get_all_authors))
        .route("/api/:kind/figure/:chart", post(post_figure))
        .route("/api/:kind/render/:chart", post(post_render))
        .route("/api/:kind/table", post(post_table))
        .route("/api/:kind/export/data", post(export_data))
        .route("/api/:kind/export/python", post(export_python))
        .route("/api/:kind/export/csv", post(export_csv))
        .route("/api/:kind/export/xlsx", post(export_xlsx))
        .route("/api/:kind/properties", post(add_property))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Loads the dataset and serves the dashboard until the process is stopped
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = match &config.data_dir {
        Some(dir) => loader::load_dir(dir)?,
        None => loader::bundled()?,
    };
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(store, config)?);
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct TabContext {
    kind: &'static str,
    title: String,
    materials: Vec<String>,
    authors: Vec<String>,
    isotopes: Vec<String>,
    year_min: i32,
    year_max: i32,
}

async fn serve_dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, DashboardError> {
    let current_year = chrono::Datelike::year(&chrono::Local::now());
    let tabs: Vec<TabContext> = PropertyKind::ALL
        .iter()
        .map(|&kind| {
            let options = state.controller(kind).options();
            let (year_min, year_max) = options.years.unwrap_or((current_year, current_year));
            TabContext {
                kind: kind.as_str(),
                title: crate::property::capitalize(kind.as_str()),
                materials: options.materials,
                authors: options.authors,
                isotopes: options.isotopes,
                year_min,
                year_max,
            }
        })
        .collect();

    let page = state
        .templates
        .render("index", &serde_json::json!({ "tabs": tabs }))
        .map_err(|e| DashboardError::Template(e.to_string()))?;
    Ok(Html(page))
}

async fn health() -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    })
}

async fn get_options(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.controller(kind).options())
}

async fn get_all_materials(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.controller(kind).all_materials())
}

async fn get_all_authors(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.controller(kind).all_authors())
}

async fn post_figure(
    ApiPath((kind, chart)): ApiPath<(PropertyKind, ChartKind)>,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ChartRequest>,
) -> impl IntoResponse {
    Json(state.controller(kind).chart(chart, &request))
}

async fn post_render(
    ApiPath((kind, chart)): ApiPath<(PropertyKind, ChartKind)>,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ChartRequest>,
) -> Result<Response, DashboardError> {
    let figure = state.controller(kind).chart(chart, &request);
    let svg = create_graph(&figure, &GraphOptions::default())?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

async fn post_table(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
    ApiJson(controls): ApiJson<ControlState>,
) -> impl IntoResponse {
    Json(state.controller(kind).table(&controls))
}

async fn export_data(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
    ApiJson(controls): ApiJson<ControlState>,
) -> Result<Download, DashboardError> {
    state.controller(kind).export_data(&controls)
}

async fn export_python(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
    ApiJson(controls): ApiJson<ControlState>,
) -> Download {
    state.controller(kind).export_code(&controls)
}

async fn export_csv(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
    ApiJson(controls): ApiJson<ControlState>,
) -> Result<Download, DashboardError> {
    state.controller(kind).export_csv(&controls)
}

async fn export_xlsx(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
    ApiJson(controls): ApiJson<ControlState>,
) -> Result<Download, DashboardError> {
    state.controller(kind).export_xlsx(&controls)
}

async fn add_property(
    ApiPath(kind): ApiPath<PropertyKind>,
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<AddPropertyRequest>,
) -> impl IntoResponse {
    Json(
        state
            .controller(kind)
            .add_property(&request.form, &request.material_filter),
    )
}
