use thiserror::Error;

#[derive(Debug, Error)]
pub enum LunchMoneyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body still reports an error
    #[error("Lunch Money rejected the request: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, LunchMoneyError>;
