use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntoviewError {
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Response(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    General(String),
}

impl From<String> for OntoviewError {
    fn from(error: String) -> OntoviewError {
        OntoviewError::General(error)
    }
}
