use crate::domain::QualityGrade;

/// Every failure the library can report.
///
/// Only `InsufficientData` is ever handled inside the library (the forecast
/// turns it into a per-grade error field). Everything else propagates to the
/// caller, which maps it to an exit code here or to a transport status elsewhere.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("API response does not contain 'datacontent' or it is empty.")]
    MissingData,

    #[error("No valid data found after processing.")]
    NoValidData,

    #[error("Month data for {grade} is not strictly increasing after processing.")]
    DataIntegrity { grade: QualityGrade },

    #[error("Not enough data for {strategy}: need {required} points, got {got}.")]
    InsufficientData {
        strategy: String,
        required: usize,
        got: usize,
    },

    #[error("Numerical failure: {0}")]
    Numerical(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Validation(_) | AppError::Config(_) => 2,
            AppError::Fetch(_) => 3,
            AppError::MissingData
            | AppError::NoValidData
            | AppError::DataIntegrity { .. }
            | AppError::InsufficientData { .. }
            | AppError::Numerical(_) => 4,
            AppError::Io(_) => 5,
        }
    }

    /// True when the caller sent something unusable (a "400" for an HTTP front-end).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_group_by_kind() {
        assert_eq!(AppError::Validation("x".into()).exit_code(), 2);
        assert_eq!(AppError::Fetch("x".into()).exit_code(), 3);
        assert_eq!(AppError::NoValidData.exit_code(), 4);
        assert_eq!(
            AppError::DataIntegrity {
                grade: QualityGrade::Medium
            }
            .exit_code(),
            4
        );
        assert_eq!(AppError::Io("x".into()).exit_code(), 5);
    }

    #[test]
    fn only_validation_is_a_client_error() {
        assert!(AppError::Validation("too early".into()).is_client_error());
        assert!(!AppError::MissingData.is_client_error());
        assert!(!AppError::Fetch("timeout".into()).is_client_error());
    }

    #[test]
    fn integrity_message_names_grade() {
        let msg = AppError::DataIntegrity {
            grade: QualityGrade::LowQuality,
        }
        .to_string();
        assert!(msg.contains("low_quality"), "{msg}");
    }
}
