use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::admin::{AdminError, ExportError};
use crate::workflows::registration::{AttachmentError, MarkerStoreError, SubmissionError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Marker(MarkerStoreError),
    Attachment(AttachmentError),
    Submission(SubmissionError),
    Draft(serde_json::Error),
    Admin(AdminError),
    Export(ExportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Marker(err) => write!(f, "application marker error: {}", err),
            AppError::Attachment(err) => write!(f, "{}", err),
            AppError::Submission(err) => write!(f, "{}", err.user_message()),
            AppError::Draft(err) => write!(f, "invalid draft: {}", err),
            AppError::Admin(err) => write!(f, "{}", err),
            AppError::Export(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Marker(err) => Some(err),
            AppError::Attachment(err) => Some(err),
            AppError::Submission(err) => Some(err),
            AppError::Draft(err) => Some(err),
            AppError::Admin(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MarkerStoreError> for AppError {
    fn from(value: MarkerStoreError) -> Self {
        Self::Marker(value)
    }
}

impl From<AttachmentError> for AppError {
    fn from(value: AttachmentError) -> Self {
        Self::Attachment(value)
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Draft(value)
    }
}

impl From<AdminError> for AppError {
    fn from(value: AdminError) -> Self {
        Self::Admin(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::registration::{RemoteError, SubmissionStep};

    #[test]
    fn submission_errors_display_the_applicant_message() {
        let err = AppError::from(SubmissionError::Remote {
            step: SubmissionStep::CreateStudent,
            source: RemoteError::Server {
                status: 409,
                message: Some("Email already registered".to_string()),
            },
            created: None,
        });
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn admin_errors_display_the_dashboard_message() {
        let err = AppError::from(AdminError::SessionExpired);
        assert_eq!(err.to_string(), "Session expired. Please login again.");
    }
}
