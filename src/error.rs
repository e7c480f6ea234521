//! Error type shared by the ArcGIS client and the road lookup.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `ARCGIS_API_KEY` was not set (or was blank)
    #[error("missing credential: set {0} in the environment or a .env file")]
    MissingCredential(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid service url: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error envelope returned by an ArcGIS REST endpoint with a 200 status
    #[error("service error {code}: {message}")]
    Service {
        code: i64,
        message: String,
        details: Vec<String>,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("no road found near ({lat}, {lon})")]
    NoRoadFound { lat: f64, lon: f64 },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::MalformedResponse(e.to_string())
    }
}
