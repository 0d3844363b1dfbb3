use rota_core::DomainError;

/// Engine-level error type.
///
/// Domain conditions (`not_registered`, `invalid_task`, ...) are expected
/// outcomes a caller renders into a reply; database errors are
/// infrastructure faults that propagate to the enclosing loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// The domain condition, when this is one.
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            EngineError::Domain(domain) => Some(domain),
            EngineError::Database(_) => None,
        }
    }
}
