//! Student registration workflow: field validation, option loading, the form-state controller
//! and the create → upload → patch submission sequence.

pub mod domain;
pub mod form;
pub mod http;
pub mod options;
pub mod repository;
pub mod status;
pub mod store;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantDraft, CountryCode, CreateStudentRequest, FormFieldBundle, OptionCategory,
    ResumeAttachment, ResumeFile, ResumeFormat, ResumePatch, ResumeUpload, StudentId,
    UploadCredentials, UploadedResume, DEFAULT_COUNTRY_CODE, MAX_RESUME_BYTES, OTHER_OPTION,
};
pub use form::{
    check_resume, Alert, AlertSeverity, AttachmentError, FieldUpdate, FormController, FormPhase,
    PreparedSubmission, SubmitRejection, UpdateOutcome, UpdatePolicy, ValidationError,
};
pub use http::{HttpRegistrationBackend, HttpResumeStorage};
pub use options::{load_options, parse_country_code, OptionSet};
pub use repository::{
    ApplicationMarkerStore, FormFieldSource, MarkerStoreError, RegistrationBackend, RemoteError,
    ResumeStorage,
};
pub use status::{resolve_status, Route, StatusView};
pub use store::{FileMarkerStore, InMemoryMarkerStore, APPLICATION_MARKER_KEY};
pub use submission::{
    RegistrationSubmitter, SubmissionError, SubmissionReceipt, SubmissionStep, UploadSettings,
};
