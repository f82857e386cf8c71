use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Server answered {status} for {url}")]
    ServerStatus { url: String, status: u16 },

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
    #[error("The concurrency limiter was closed while a batch was in flight.")]
    RuntimeLimiterClosed,

    #[error("Reqwest Error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Url Error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<tokio::sync::AcquireError> for Error {
    fn from(_value: tokio::sync::AcquireError) -> Self {
        Error::RuntimeLimiterClosed
    }
}
