use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssemblyError>;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("grouping response is not valid JSON: {message}")]
    Grouping {
        message: String,
        /// Bounded excerpt of the raw response, kept so the reason for
        /// the failure survives in logs and error output.
        excerpt: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
