//! Error types for the OGC API connector.

use thiserror::Error;

/// Result type alias using ConnectorError.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Primary error type for connector operations.
///
/// "No preferred match" conditions (missing format, missing link) are not
/// errors anywhere in the connector; they resolve through fallbacks.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // === Fetch Errors ===
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("No capabilities loaded: {0}")]
    MissingCapabilities(String),

    // === Model Errors ===
    #[error("Unknown CRS: {0}")]
    UnknownCrs(String),

    #[error("Tile matrix set '{id}' is not quad-tree compatible (level offset {offset})")]
    UnsupportedTileMatrixSet { id: String, offset: i32 },

    #[error("Invalid model options: {0}")]
    InvalidModelOptions(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConnectorError {
    /// True for errors raised while fetching or decoding a remote document.
    ///
    /// Network and parse failures are handled identically by callers: log
    /// and keep whatever state was held before the fetch.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ConnectorError::Network(_) | ConnectorError::Parse(_))
    }

    /// Short machine-readable kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectorError::Network(_) => "network",
            ConnectorError::Parse(_) => "parse",
            ConnectorError::MissingCapabilities(_) => "missing_capabilities",
            ConnectorError::UnknownCrs(_) => "unknown_crs",
            ConnectorError::UnsupportedTileMatrixSet { .. } => "unsupported_tile_matrix_set",
            ConnectorError::InvalidModelOptions(_) => "invalid_model_options",
            ConnectorError::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::Parse(format!("JSON error: {}", err))
    }
}
