use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid endpoint url: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Missing expected field: {0}")]
    MissingField(&'static str),

    #[error("Metric not found: {0}")]
    NotFound(String),

    #[error("All sources failed (primary: {primary}; secondary: {secondary})")]
    Exhausted {
        primary: Box<FetchError>,
        secondary: Box<FetchError>,
    },
}
