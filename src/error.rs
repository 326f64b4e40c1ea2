#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("unknown course: {0}")]
    UnknownCourse(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
