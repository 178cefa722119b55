//! Error types for catalog access and pack export

use thiserror::Error;

/// Errors surfaced by the catalog adapters and the export engine.
///
/// A malformed share token is not represented here: the share codec
/// reports it as `None` instead of an error, since a stale or
/// hand-edited link is a recoverable user condition. Per-mod export
/// gaps are reported as [`crate::export::SkippedMod`] entries on the
/// successful output rather than failing the whole export.
#[derive(Error, Debug)]
pub enum WeaveError {
    /// The upstream catalog answered with a non-success HTTP status.
    #[error("upstream catalog at '{url}' returned HTTP {status}")]
    Upstream { status: u16, url: String },

    /// The request failed below the status-code layer (connect, timeout).
    #[error("request to '{url}' failed")]
    HttpTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream body did not match the expected schema.
    #[error("unexpected response shape from '{url}'")]
    ResponseParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request URL could not be assembled.
    #[error("invalid URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Client construction or other setup problem.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// Archive assembly failed. Fatal and propagated as-is.
    #[error("archive assembly failed")]
    Archive {
        #[source]
        source: zip::result::ZipError,
    },

    /// I/O failure while writing the in-memory archive.
    #[error("archive I/O failed")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WeaveError>;

impl WeaveError {
    /// True when the upstream reported 404 for the requested entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeaveError::Upstream { status: 404, .. })
    }

    /// Error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            WeaveError::Upstream { .. } => "upstream",
            WeaveError::HttpTransport { .. } => "http_transport",
            WeaveError::ResponseParse { .. } => "response_parse",
            WeaveError::InvalidUrl { .. } => "invalid_url",
            WeaveError::Configuration { .. } => "configuration",
            WeaveError::Archive { .. } => "archive",
            WeaveError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for WeaveError {
    fn from(error: reqwest::Error) -> Self {
        let url = error
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        WeaveError::HttpTransport { url, source: error }
    }
}

impl From<zip::result::ZipError> for WeaveError {
    fn from(source: zip::result::ZipError) -> Self {
        WeaveError::Archive { source }
    }
}
