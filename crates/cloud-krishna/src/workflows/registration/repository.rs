use async_trait::async_trait;

use super::domain::{
    CreateStudentRequest, FormFieldBundle, ResumePatch, ResumeUpload, StudentId,
    UploadCredentials, UploadedResume,
};

pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to submit registration. Please try again.";

/// Config service serving the dropdown enumerations.
#[async_trait]
pub trait FormFieldSource: Send + Sync {
    async fn fetch_form_fields(&self) -> Result<FormFieldBundle, RemoteError>;
}

/// Registration backend owning student records.
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    async fn create_student(&self, request: &CreateStudentRequest)
        -> Result<StudentId, RemoteError>;
    async fn upload_credentials(&self) -> Result<UploadCredentials, RemoteError>;
    async fn patch_resume(&self, student: &StudentId, patch: &ResumePatch)
        -> Result<(), RemoteError>;
}

/// Direct-to-storage upload service for resume files.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    async fn upload(&self, upload: &ResumeUpload) -> Result<UploadedResume, RemoteError>;
}

/// Local persistence of the `application-id` re-submission marker.
pub trait ApplicationMarkerStore: Send + Sync {
    fn get(&self) -> Result<Option<StudentId>, MarkerStoreError>;
    fn set(&self, id: &StudentId) -> Result<(), MarkerStoreError>;
    fn clear(&self) -> Result<(), MarkerStoreError>;
}

/// Failure talking to one of the remote collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("server rejected request with status {status}")]
    Server { status: u16, message: Option<String> },
    #[error("request failed before a response arrived: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

impl RemoteError {
    /// Message shown to the applicant: server text, else network notice, else generic failure.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            RemoteError::Server { .. } | RemoteError::Network(_) => {
                NETWORK_ERROR_MESSAGE.to_string()
            }
            RemoteError::MalformedResponse(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Error enumeration for marker persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum MarkerStoreError {
    #[error("marker storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
