use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no participants")]
    NoParticipants,
    #[error("no event type has been rated by the participants")]
    NoCandidates,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::NoParticipants => "no_participants",
            AppError::NoCandidates => "no_candidates",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Unknown(_) => "unknown",
        }
    }
}
