use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Unsupported file type, a PDF without text, or OCR below threshold.
    #[error("Unreadable file: {0}")]
    UnreadableFile(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Transport failure: {message}")]
    TransportFailure {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Backend rejected request with status {status}: {body}")]
    BackendRejected { status: u16, body: String },

    #[error("Malformed backend response: {0}")]
    MalformedBackendResponse(String),

    /// Valid JSON text that does not match the structure the caller asked for.
    #[error("Structured decode failure: {0}")]
    StructuredDecodeFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn unreadable(msg: impl Into<String>) -> Self {
        Self::UnreadableFile(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::PersistenceFailure(msg.into())
    }

    pub fn invalid_credential(msg: impl Into<String>) -> Self {
        Self::InvalidCredential(msg.into())
    }

    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TransportFailure {
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::BackendRejected {
            status,
            body: body.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedBackendResponse(msg.into())
    }

    pub fn structured_decode(msg: impl Into<String>) -> Self {
        Self::StructuredDecodeFailure(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::UnreadableFile(_))
    }

    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = DomainError::transport("local backend unreachable", io);

        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "refused");
    }

    #[test]
    fn unreadable_and_persistence_are_distinct() {
        let unreadable = DomainError::unreadable("empty pdf");
        let persistence = DomainError::persistence("disk full");

        assert!(unreadable.is_unreadable());
        assert!(!unreadable.is_persistence_failure());
        assert!(persistence.is_persistence_failure());
    }

    #[test]
    fn rejected_formats_status() {
        let err = DomainError::rejected(500, "boom");
        assert_eq!(
            err.to_string(),
            "Backend rejected request with status 500: boom"
        );
    }
}
