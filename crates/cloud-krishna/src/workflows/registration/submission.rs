use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

use super::domain::{
    ResumeAttachment, ResumePatch, ResumeUpload, StudentId, UploadCredentials, UploadedResume,
};
use super::form::{FormController, PreparedSubmission, SubmitRejection};
use super::repository::{RegistrationBackend, RemoteError, ResumeStorage};
use super::status::Route;

pub const DEFAULT_RESUME_FOLDER: &str = "cloudkrishna/student_resumes";

/// Remote steps of a submission, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStep {
    CreateStudent,
    UploadCredentials,
    UploadResume,
    PatchResume,
}

impl SubmissionStep {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStep::CreateStudent => "create_student",
            SubmissionStep::UploadCredentials => "upload_credentials",
            SubmissionStep::UploadResume => "upload_resume",
            SubmissionStep::PatchResume => "patch_resume",
        }
    }
}

impl fmt::Display for SubmissionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised by the submission orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Rejected(#[from] SubmitRejection),
    #[error("{step} failed: {source}")]
    Remote {
        step: SubmissionStep,
        source: RemoteError,
        /// Student record already created before the failing step. It is not rolled back.
        created: Option<StudentId>,
    },
}

impl SubmissionError {
    fn remote(step: SubmissionStep, source: RemoteError, created: Option<&StudentId>) -> Self {
        SubmissionError::Remote {
            step,
            source,
            created: created.cloned(),
        }
    }

    /// The single message surfaced to the applicant.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Rejected(rejection) => rejection.to_string(),
            SubmissionError::Remote { source, .. } => source.user_message(),
        }
    }

    /// Student id left behind by a failure after the create step succeeded.
    pub fn partial_student_id(&self) -> Option<&StudentId> {
        match self {
            SubmissionError::Remote { created, .. } => created.as_ref(),
            SubmissionError::Rejected(_) => None,
        }
    }
}

/// Result of a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub student_id: StudentId,
    pub resume: Option<UploadedResume>,
    /// Where the UI should go next.
    pub next: Route,
}

/// Upload settings shared by every submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub folder: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            folder: DEFAULT_RESUME_FOLDER.to_string(),
        }
    }
}

/// Runs create, upload and patch strictly in sequence for a validated form.
pub struct RegistrationSubmitter {
    backend: Arc<dyn RegistrationBackend>,
    storage: Arc<dyn ResumeStorage>,
    settings: UploadSettings,
}

impl RegistrationSubmitter {
    pub fn new(
        backend: Arc<dyn RegistrationBackend>,
        storage: Arc<dyn ResumeStorage>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            backend,
            storage,
            settings,
        }
    }

    /// Validate and submit the form, updating its phase with the outcome.
    pub async fn submit(
        &self,
        form: &mut FormController,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let prepared = form.begin_submission()?;

        match self.run(&prepared).await {
            Ok(receipt) => {
                if let Err(error) = form.complete(&receipt.student_id) {
                    warn!(%error, student_id = %receipt.student_id, "unable to persist application marker");
                }
                info!(student_id = %receipt.student_id, "registration submitted");
                Ok(receipt)
            }
            Err(error) => {
                warn!(%error, partial = ?error.partial_student_id(), "registration failed");
                form.fail(error.user_message());
                Err(error)
            }
        }
    }

    async fn run(
        &self,
        prepared: &PreparedSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let student_id = self
            .backend
            .create_student(&prepared.request)
            .await
            .map_err(|source| SubmissionError::remote(SubmissionStep::CreateStudent, source, None))?;
        info!(%student_id, "student record created");

        let Some(resume) = &prepared.resume else {
            return Ok(SubmissionReceipt {
                student_id,
                resume: None,
                next: Route::Status,
            });
        };

        let credentials = self.backend.upload_credentials().await.map_err(|source| {
            SubmissionError::remote(SubmissionStep::UploadCredentials, source, Some(&student_id))
        })?;

        let upload = build_resume_upload(
            &student_id,
            resume,
            prepared,
            credentials,
            &self.settings,
            Utc::now(),
        );
        let uploaded = self.storage.upload(&upload).await.map_err(|source| {
            SubmissionError::remote(SubmissionStep::UploadResume, source, Some(&student_id))
        })?;
        info!(%student_id, file_id = %uploaded.file_id, "resume uploaded");

        self.backend
            .patch_resume(&student_id, &ResumePatch::from(&uploaded))
            .await
            .map_err(|source| {
                SubmissionError::remote(SubmissionStep::PatchResume, source, Some(&student_id))
            })?;

        Ok(SubmissionReceipt {
            student_id,
            resume: Some(uploaded),
            next: Route::Status,
        })
    }
}

/// Encode a resume as a `data:` URL.
pub fn encode_data_url(resume: &ResumeAttachment) -> String {
    format!(
        "data:{};base64,{}",
        resume.format.mime_type(),
        STANDARD.encode(&resume.bytes)
    )
}

pub(crate) fn build_resume_upload(
    student_id: &StudentId,
    resume: &ResumeAttachment,
    prepared: &PreparedSubmission,
    credentials: UploadCredentials,
    settings: &UploadSettings,
    submitted_at: DateTime<Utc>,
) -> ResumeUpload {
    ResumeUpload {
        file: encode_data_url(resume),
        file_name: format!("{}_{}", student_id, resume.file_name),
        folder: settings.folder.clone(),
        credentials,
        tags: vec![
            "resume".to_string(),
            student_id.to_string(),
            prepared.applicant_name.clone(),
            submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            "student".to_string(),
            prepared.course.to_lowercase(),
        ],
        use_unique_file_name: false,
        overwrite_file: true,
        overwrite_tags: true,
    }
}
