use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::workflows::registration::domain::{
    CreateStudentRequest, FormFieldBundle, ResumeFile, ResumePatch, ResumeUpload, StudentId,
    UploadCredentials, UploadedResume,
};
use crate::workflows::registration::form::{FieldUpdate, FormController};
use crate::workflows::registration::options::OptionSet;
use crate::workflows::registration::repository::{
    ApplicationMarkerStore, FormFieldSource, RegistrationBackend, RemoteError, ResumeStorage,
};
use crate::workflows::registration::store::InMemoryMarkerStore;

pub(super) const STUDENT_ID: &str = "665f1c2e9b1d4a0012ab34cd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    CreateStudent(CreateStudentRequest),
    UploadCredentials,
    Upload(ResumeUpload),
    PatchResume(StudentId, ResumePatch),
}

pub(super) type CallLog = Arc<Mutex<Vec<Call>>>;

pub(super) fn calls(log: &CallLog) -> Vec<Call> {
    log.lock().expect("call log poisoned").clone()
}

fn record(log: &CallLog, call: Call) {
    log.lock().expect("call log poisoned").push(call);
}

pub(super) fn credentials() -> UploadCredentials {
    UploadCredentials {
        token: "c9f1b7e2-token".to_string(),
        expire: 1_735_689_600,
        signature: "0f9c2d7a-signature".to_string(),
    }
}

pub(super) fn uploaded() -> UploadedResume {
    UploadedResume {
        url: "https://ik.imagekit.io/cloudkrishna/student_resumes/resume.pdf".to_string(),
        file_id: "file_6651a2".to_string(),
    }
}

/// Registration backend fake recording every call in order.
pub(super) struct RecordingBackend {
    pub(super) log: CallLog,
    pub(super) create: Result<StudentId, RemoteError>,
    pub(super) credentials: Result<UploadCredentials, RemoteError>,
    pub(super) patch: Result<(), RemoteError>,
}

impl RecordingBackend {
    pub(super) fn succeeding(log: CallLog) -> Self {
        Self {
            log,
            create: Ok(StudentId(STUDENT_ID.to_string())),
            credentials: Ok(credentials()),
            patch: Ok(()),
        }
    }
}

#[async_trait]
impl RegistrationBackend for RecordingBackend {
    async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<StudentId, RemoteError> {
        record(&self.log, Call::CreateStudent(request.clone()));
        self.create.clone()
    }

    async fn upload_credentials(&self) -> Result<UploadCredentials, RemoteError> {
        record(&self.log, Call::UploadCredentials);
        self.credentials.clone()
    }

    async fn patch_resume(
        &self,
        student: &StudentId,
        patch: &ResumePatch,
    ) -> Result<(), RemoteError> {
        record(&self.log, Call::PatchResume(student.clone(), patch.clone()));
        self.patch.clone()
    }
}

pub(super) struct RecordingStorage {
    pub(super) log: CallLog,
    pub(super) result: Result<UploadedResume, RemoteError>,
}

impl RecordingStorage {
    pub(super) fn succeeding(log: CallLog) -> Self {
        Self {
            log,
            result: Ok(uploaded()),
        }
    }
}

#[async_trait]
impl ResumeStorage for RecordingStorage {
    async fn upload(&self, upload: &ResumeUpload) -> Result<UploadedResume, RemoteError> {
        record(&self.log, Call::Upload(upload.clone()));
        self.result.clone()
    }
}

/// Config service fake returning a fixed result.
pub(super) struct StaticFormFields(pub(super) Result<FormFieldBundle, RemoteError>);

#[async_trait]
impl FormFieldSource for StaticFormFields {
    async fn fetch_form_fields(&self) -> Result<FormFieldBundle, RemoteError> {
        self.0.clone()
    }
}

pub(super) fn marker() -> Arc<InMemoryMarkerStore> {
    Arc::new(InMemoryMarkerStore::default())
}

pub(super) fn controller_with(marker: Arc<InMemoryMarkerStore>) -> FormController {
    let marker: Arc<dyn ApplicationMarkerStore> = marker;
    FormController::mount(OptionSet::defaults(), marker).expect("form mounts")
}

pub(super) fn controller() -> FormController {
    controller_with(marker())
}

/// Fill the form with the reference applicant (Asha Rao).
pub(super) fn fill_valid(form: &mut FormController) {
    let updates = [
        FieldUpdate::FullName("Asha Rao".to_string()),
        FieldUpdate::Email("asha@example.com".to_string()),
        FieldUpdate::CountryCode("+91".to_string()),
        FieldUpdate::Phone("9876543210".to_string()),
        FieldUpdate::College("IIT Delhi".to_string()),
        FieldUpdate::Course("B.Tech.".to_string()),
        FieldUpdate::CurrentYear("2nd Year".to_string()),
        FieldUpdate::AgreedToTerms(true),
    ];
    for update in updates {
        let description = format!("{update:?}");
        assert!(form.apply(update).is_applied(), "{description} should apply");
    }
    assert!(form.toggle_interest("Cloud Computing").is_applied());
}

pub(super) fn pdf(size: usize) -> ResumeFile {
    ResumeFile {
        file_name: "asha-rao-resume.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: vec![b'%'; size],
    }
}
