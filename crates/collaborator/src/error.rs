use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollaboratorError>;

#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("DOSSIER_API_KEY is not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("collaborator returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("collaborator returned an empty response")]
    EmptyResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
