use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no weather records to render")]
    NoData,

    #[error("isotherm interpolation needs at least 3 cities, got {0}")]
    InsufficientData(usize),

    #[error("failed to serialize marker data")]
    MarkerData(#[from] serde_json::Error),

    #[error("failed to write artifact '{0}'")]
    ArtifactWrite(PathBuf, #[source] std::io::Error),

    // plotters errors are generic over the backend, so carry the message.
    #[error("failed to draw isotherm plot: {0}")]
    Drawing(String),
}
