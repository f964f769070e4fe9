use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicklerError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TicklerError {
    /// Short error code string for logs and user-facing replies.
    pub fn code(&self) -> &'static str {
        match self {
            TicklerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, TicklerError>;
