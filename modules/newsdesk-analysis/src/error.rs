use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("lexicon error: {0}")]
    Lexicon(String),

    #[error("article {0} not found")]
    ArticleNotFound(i64),

    #[error("article {0} has no content to analyze")]
    NoContent(i64),

    #[error(transparent)]
    Store(#[from] newsdesk_store::StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
