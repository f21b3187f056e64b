use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PagesError>;

#[derive(Error, Debug)]
pub enum PagesError {
    #[error("pages root {path} is not a readable directory: {source}")]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
