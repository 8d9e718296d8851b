use std::path::PathBuf;
use thiserror::Error;

/// Failures a single panel can hit on its way from file to chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("Failed to load '{}': {reason}", path.display())]
    DataSource { path: PathBuf, reason: String },

    #[error("Column '{column}' not found (available: {})", available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    #[error("Chart rendering failed: {0}")]
    ChartRender(String),
}

impl DashboardError {
    pub fn data_source(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DashboardError::DataSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn chart_render(reason: impl Into<String>) -> Self {
        DashboardError::ChartRender(reason.into())
    }

    /// Short label shown in an error placeholder
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::DataSource { .. } => "DataSourceError",
            DashboardError::ColumnNotFound { .. } => "ColumnNotFoundError",
            DashboardError::ChartRender(_) => "ChartRenderError",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
