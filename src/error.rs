pub type BattleResult<T> = Result<T, BattleError>;

#[derive(thiserror::Error, Debug)]
pub enum BattleError {
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("sprite unavailable: {0}")]
    SpriteUnavailable(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BattleError {
    pub fn missing_parameter(msg: impl Into<String>) -> Self {
        Self::MissingParameter(msg.into())
    }

    pub fn sprite_unavailable(msg: impl Into<String>) -> Self {
        Self::SpriteUnavailable(msg.into())
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Whether the condition is the caller's fault (maps to HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingParameter(_) | Self::SpriteUnavailable(_))
    }
}
