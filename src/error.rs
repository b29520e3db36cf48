use thiserror::Error;

/// Errors raised while loading the dataset, rendering charts or building downloads
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A dataset row that parsed but does not describe a usable property
    #[error("invalid property record: {0}")]
    InvalidRecord(String),

    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("failed to render chart: {0}")]
    Render(String),

    #[error("failed to build spreadsheet: {0}")]
    Xlsx(String),

    #[error("failed to render page: {0}")]
    Template(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
