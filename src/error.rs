use thiserror::Error;

/// Errors surfaced by the engine and the `presence` binary.
///
/// Each variant carries a process exit code so the binary can stay a thin
/// wrapper around [`crate::app::run`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Rejected at the boundary (CLI flags, fixture contents).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Startup-time configuration check failed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The storage collaborator failed a read.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InvalidInput(_) => 2,
            AppError::Configuration(_) => 3,
            AppError::Storage(_) | AppError::Io(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_class() {
        assert_eq!(AppError::invalid_input("x").exit_code(), 2);
        assert_eq!(AppError::configuration("x").exit_code(), 3);
        assert_eq!(AppError::storage("x").exit_code(), 4);
        assert_eq!(AppError::io("x").exit_code(), 4);
    }

    #[test]
    fn display_keeps_message() {
        let err = AppError::configuration("milestones must be ascending");
        assert_eq!(
            err.to_string(),
            "Configuration error: milestones must be ascending"
        );
    }
}
