use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart container not found for selector `{selector}`")]
    ContainerNotFound { selector: String },

    #[error("unknown chart type `{0}` (expected line, bar, gauge, donut or sparkline)")]
    UnknownChartType(String),

    #[error("chart is not initialized: no root scene has been rendered")]
    NotInitialized,

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidOptions(err.to_string())
    }
}
