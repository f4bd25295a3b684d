use thiserror::Error;

#[derive(Error, Debug)]
pub enum CiteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Render failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, CiteError>;
