//! Form-state controller for the registration draft.
//!
//! Field mutations arrive as [`FieldUpdate`] commands. Each command carries its own update
//! policy: full name, phone and college free text silently drop values that fail their
//! character-set check, email always writes and only raises an advisory, and dropdown fields
//! accept listed options only.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{
    ApplicantDraft, CreateStudentRequest, OptionCategory, ResumeAttachment, ResumeFile,
    ResumeFormat, StudentId, MAX_RESUME_BYTES, OTHER_OPTION,
};
use super::options::OptionSet;
use super::repository::{ApplicationMarkerStore, MarkerStoreError};
use super::validation::{
    has_name_charset, is_valid_college, is_valid_email, is_valid_full_name, is_valid_phone,
    FULL_NAME_MAX_CHARS, FULL_NAME_MIN_CHARS, PHONE_DIGITS,
};

pub const RESUME_LIMIT_TIP: &str = "Maximum resume file upload limit is 2 MB.";
pub const ALREADY_SUBMITTED_NOTICE: &str = "You already submitted the registration form.";
const COLLEGE_FROM_LIST_WARNING: &str = "Please select your college/university from the list";

/// Submission rules in evaluation order. The first failing rule is the only one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Resume file size must be 2MB or less")]
    ResumeTooLarge,
    #[error("Please enter your full name")]
    FullNameMissing,
    #[error("Full name can only contain alphabets and spaces. No numbers or special characters allowed.")]
    FullNameCharset,
    #[error("Full name must be at least 3 characters")]
    FullNameTooShort,
    #[error("Full name must not exceed 50 characters")]
    FullNameTooLong,
    #[error("Please enter your email address")]
    EmailMissing,
    #[error("Please enter a valid email address (e.g., example@domain.com)")]
    EmailMalformed,
    #[error("Please enter your phone number")]
    PhoneMissing,
    #[error("Phone number can only contain numbers")]
    PhoneCharset,
    #[error("Phone number must be exactly 10 digits")]
    PhoneLength,
    #[error("Please select your college/university")]
    CollegeMissing,
    #[error("Please select your course")]
    CourseMissing,
    #[error("Please select your current year")]
    YearMissing,
    #[error("Please select at least one area of interest")]
    InterestsMissing,
    #[error("Please accept the terms and conditions to proceed")]
    TermsNotAccepted,
}

/// Problems with a picked resume file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttachmentError {
    #[error("Resume file size must be 2MB or less. Please choose a smaller file.")]
    TooLarge { size: u64 },
    #[error("Resume must be a PDF, DOC or DOCX file")]
    UnsupportedType { file_name: String },
}

/// Reasons a submit action never reaches the remote calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejection {
    #[error("You already submitted the registration form.")]
    AlreadySubmitted(StudentId),
    #[error("a registration is already being submitted")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// One field mutation from the form UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FullName(String),
    Email(String),
    CountryCode(String),
    Phone(String),
    /// Pick a listed college.
    College(String),
    /// Free-text college typed after choosing "Other".
    OtherCollege(String),
    Course(String),
    OtherCourse(String),
    CurrentYear(String),
    OtherYear(String),
    AgreedToTerms(bool),
}

/// How a field treats a value that fails its check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Invalid values are dropped without touching the draft.
    RejectOnInvalid,
    /// Values are always written; invalid ones only raise an advisory.
    AcceptAndFlag,
    /// Only values from the loaded option set are written.
    SelectFromOptions,
    /// Any value is written.
    Accept,
}

impl FieldUpdate {
    pub fn policy(&self) -> UpdatePolicy {
        match self {
            FieldUpdate::FullName(_)
            | FieldUpdate::Phone(_)
            | FieldUpdate::OtherCollege(_) => UpdatePolicy::RejectOnInvalid,
            FieldUpdate::Email(_) => UpdatePolicy::AcceptAndFlag,
            FieldUpdate::CountryCode(_)
            | FieldUpdate::College(_)
            | FieldUpdate::Course(_)
            | FieldUpdate::CurrentYear(_) => UpdatePolicy::SelectFromOptions,
            FieldUpdate::AgreedToTerms(_)
            | FieldUpdate::OtherCourse(_)
            | FieldUpdate::OtherYear(_) => UpdatePolicy::Accept,
        }
    }

    fn passes_charset(&self) -> bool {
        match self {
            FieldUpdate::FullName(value) => is_valid_full_name(value),
            FieldUpdate::Phone(value) => is_valid_phone(value),
            FieldUpdate::OtherCollege(value) => is_valid_college(value),
            _ => true,
        }
    }

    /// Dropdown that must offer "Other" before free text is written.
    fn other_category(&self) -> Option<OptionCategory> {
        match self {
            FieldUpdate::OtherCollege(_) => Some(OptionCategory::Colleges),
            FieldUpdate::OtherCourse(_) => Some(OptionCategory::Courses),
            FieldUpdate::OtherYear(_) => Some(OptionCategory::Years),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum UpdateOutcome {
    Applied,
    Rejected,
}

impl UpdateOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, UpdateOutcome::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    Editing,
    Submitting,
    /// A remote step failed; the form is editable again.
    Failed,
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Error,
    Warning,
    Info,
    Success,
}

/// The single alert the form displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
}

impl Alert {
    fn new(severity: AlertSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Validated snapshot handed to the submission orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub request: CreateStudentRequest,
    pub resume: Option<ResumeAttachment>,
    pub applicant_name: String,
    pub course: String,
}

impl PreparedSubmission {
    fn from_draft(draft: &ApplicantDraft) -> Self {
        let request = CreateStudentRequest {
            fullname: draft.full_name.trim().to_string(),
            email: draft.email.trim().to_string(),
            phone_number: format!("{}{}", draft.country_code.trim(), draft.phone.trim()),
            college: draft.college.trim().to_string(),
            course: draft.course.clone(),
            current_year: draft.current_year.clone(),
            area_of_interest: draft.interests.clone(),
        };

        Self {
            applicant_name: request.fullname.clone(),
            course: draft.course.clone(),
            request,
            resume: draft.resume.clone(),
        }
    }
}

/// Check a picked file against the size and type limits.
pub fn check_resume(file: ResumeFile) -> Result<ResumeAttachment, AttachmentError> {
    let size = file.size();
    if size > MAX_RESUME_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }

    let format = ResumeFormat::detect(&file.file_name, file.content_type.as_deref()).ok_or_else(
        || AttachmentError::UnsupportedType {
            file_name: file.file_name.clone(),
        },
    )?;

    Ok(ResumeAttachment {
        file_name: file.file_name,
        format,
        bytes: file.bytes,
    })
}

/// Stateful controller for one registration form session.
pub struct FormController {
    options: OptionSet,
    marker: Arc<dyn ApplicationMarkerStore>,
    draft: ApplicantDraft,
    phase: FormPhase,
    existing_application: Option<StudentId>,
    hard_error: Option<String>,
    email_warning: Option<String>,
    phone_warning: Option<String>,
    college_warning: Option<String>,
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("phase", &self.phase)
            .field("existing_application", &self.existing_application)
            .field("hard_error", &self.hard_error)
            .finish_non_exhaustive()
    }
}

impl FormController {
    /// Open a fresh form, reading the re-submission marker.
    pub fn mount(
        options: OptionSet,
        marker: Arc<dyn ApplicationMarkerStore>,
    ) -> Result<Self, MarkerStoreError> {
        Self::restore(options, marker, ApplicantDraft::default())
    }

    /// Open a form seeded with a previously captured draft.
    pub fn restore(
        options: OptionSet,
        marker: Arc<dyn ApplicationMarkerStore>,
        draft: ApplicantDraft,
    ) -> Result<Self, MarkerStoreError> {
        let existing_application = marker.get()?;
        if let Some(id) = &existing_application {
            info!(application_id = %id, "existing application found; submit disabled");
        }

        Ok(Self {
            options,
            marker,
            draft,
            phase: FormPhase::Editing,
            existing_application,
            hard_error: None,
            email_warning: None,
            phone_warning: None,
            college_warning: None,
        })
    }

    pub fn draft(&self) -> &ApplicantDraft {
        &self.draft
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn existing_application(&self) -> Option<&StudentId> {
        self.existing_application.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.hard_error.as_deref()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.phase != FormPhase::Submitting && self.existing_application.is_none()
    }

    pub fn apply(&mut self, update: FieldUpdate) -> UpdateOutcome {
        if self.phase == FormPhase::Submitting {
            return UpdateOutcome::Rejected;
        }

        let admissible = match update.policy() {
            UpdatePolicy::RejectOnInvalid => update.passes_charset(),
            UpdatePolicy::SelectFromOptions => self.is_selectable(&update),
            UpdatePolicy::AcceptAndFlag | UpdatePolicy::Accept => true,
        };
        if !admissible {
            if matches!(update, FieldUpdate::College(_)) {
                self.college_warning = Some(COLLEGE_FROM_LIST_WARNING.to_string());
            }
            return UpdateOutcome::Rejected;
        }
        if let Some(category) = update.other_category() {
            if !self.allows_other(category) {
                return UpdateOutcome::Rejected;
            }
        }

        match update {
            FieldUpdate::FullName(value) => self.draft.full_name = value,
            FieldUpdate::Email(value) => {
                let trimmed = value.trim();
                self.email_warning = if trimmed.is_empty() || is_valid_email(trimmed) {
                    None
                } else {
                    Some(ValidationError::EmailMalformed.to_string())
                };
                self.draft.email = value;
            }
            FieldUpdate::Phone(value) => {
                self.phone_warning =
                    if value.trim().is_empty() || value.chars().count() == PHONE_DIGITS {
                        None
                    } else {
                        Some(ValidationError::PhoneLength.to_string())
                    };
                self.draft.phone = value;
            }
            FieldUpdate::CountryCode(value) => self.draft.country_code = value,
            FieldUpdate::College(value) | FieldUpdate::OtherCollege(value) => {
                self.draft.college = value;
                self.college_warning = None;
            }
            FieldUpdate::Course(value) | FieldUpdate::OtherCourse(value) => {
                self.draft.course = value;
            }
            FieldUpdate::CurrentYear(value) | FieldUpdate::OtherYear(value) => {
                self.draft.current_year = value;
            }
            FieldUpdate::AgreedToTerms(agreed) => self.draft.agreed_to_terms = agreed,
        }

        UpdateOutcome::Applied
    }

    fn is_selectable(&self, update: &FieldUpdate) -> bool {
        match update {
            FieldUpdate::CountryCode(value) => {
                self.options.contains(OptionCategory::CountryCodes, value)
            }
            FieldUpdate::College(value) => self.is_listed(OptionCategory::Colleges, value),
            FieldUpdate::Course(value) => self.is_listed(OptionCategory::Courses, value),
            FieldUpdate::CurrentYear(value) => self.is_listed(OptionCategory::Years, value),
            _ => true,
        }
    }

    fn is_listed(&self, category: OptionCategory, value: &str) -> bool {
        value.is_empty() || self.options.contains(category, value)
    }

    fn allows_other(&self, category: OptionCategory) -> bool {
        self.options.contains(category, OTHER_OPTION)
    }

    /// Add the interest if absent, remove it otherwise.
    pub fn toggle_interest(&mut self, interest: &str) -> UpdateOutcome {
        if self.phase == FormPhase::Submitting
            || !self.options.contains(OptionCategory::Interests, interest)
        {
            return UpdateOutcome::Rejected;
        }

        if self.draft.interests.iter().any(|item| item == interest) {
            self.draft.interests.retain(|item| item != interest);
        } else {
            self.draft.interests.push(interest.to_string());
        }
        UpdateOutcome::Applied
    }

    pub fn remove_interest(&mut self, interest: &str) {
        if self.phase != FormPhase::Submitting {
            self.draft.interests.retain(|item| item != interest);
        }
    }

    /// Attach a picked resume. A rejected file also clears any previous attachment.
    pub fn attach_resume(&mut self, file: ResumeFile) -> Result<(), AttachmentError> {
        match check_resume(file) {
            Ok(attachment) => {
                debug!(file = %attachment.file_name, size = attachment.size(), "resume attached");
                self.draft.resume = Some(attachment);
                self.hard_error = None;
                Ok(())
            }
            Err(error) => {
                self.draft.resume = None;
                self.hard_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    pub fn remove_resume(&mut self) {
        self.draft.resume = None;
        self.hard_error = None;
    }

    /// Run the full rule sequence, stopping at the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let draft = &self.draft;

        if draft
            .resume
            .as_ref()
            .is_some_and(|resume| resume.size() > MAX_RESUME_BYTES)
        {
            return Err(ValidationError::ResumeTooLarge);
        }

        let name = draft.full_name.trim();
        if name.is_empty() {
            return Err(ValidationError::FullNameMissing);
        }
        if !has_name_charset(&draft.full_name) {
            return Err(ValidationError::FullNameCharset);
        }
        let name_chars = name.chars().count();
        if name_chars < FULL_NAME_MIN_CHARS {
            return Err(ValidationError::FullNameTooShort);
        }
        if name_chars > FULL_NAME_MAX_CHARS {
            return Err(ValidationError::FullNameTooLong);
        }

        let email = draft.email.trim();
        if email.is_empty() {
            return Err(ValidationError::EmailMissing);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::EmailMalformed);
        }

        if draft.phone.trim().is_empty() {
            return Err(ValidationError::PhoneMissing);
        }
        if !is_valid_phone(&draft.phone) {
            return Err(ValidationError::PhoneCharset);
        }
        if draft.phone.chars().count() != PHONE_DIGITS {
            return Err(ValidationError::PhoneLength);
        }

        if draft.college.trim().is_empty() {
            return Err(ValidationError::CollegeMissing);
        }
        if draft.course.is_empty() {
            return Err(ValidationError::CourseMissing);
        }
        if draft.current_year.is_empty() {
            return Err(ValidationError::YearMissing);
        }
        if draft.interests.is_empty() {
            return Err(ValidationError::InterestsMissing);
        }
        if !draft.agreed_to_terms {
            return Err(ValidationError::TermsNotAccepted);
        }

        Ok(())
    }

    /// Move from editing to submitting, or report why the submission cannot start.
    pub fn begin_submission(&mut self) -> Result<PreparedSubmission, SubmitRejection> {
        if self.phase == FormPhase::Submitting {
            return Err(SubmitRejection::InFlight);
        }
        if let Some(id) = &self.existing_application {
            return Err(SubmitRejection::AlreadySubmitted(id.clone()));
        }

        self.hard_error = None;
        if let Err(error) = self.validate() {
            self.phase = FormPhase::Editing;
            self.hard_error = Some(error.to_string());
            return Err(error.into());
        }

        self.phase = FormPhase::Submitting;
        Ok(PreparedSubmission::from_draft(&self.draft))
    }

    /// Record a completed registration: persist the marker and clear the draft.
    ///
    /// The form is locked even when the marker cannot be persisted.
    pub fn complete(&mut self, student: &StudentId) -> Result<(), MarkerStoreError> {
        self.phase = FormPhase::Succeeded;
        self.existing_application = Some(student.clone());
        self.reset_draft();
        self.marker.set(student)
    }

    /// Return to an editable state showing the failure message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.phase = FormPhase::Failed;
        self.hard_error = Some(message.into());
    }

    /// Clear the re-submission marker and start from an empty draft.
    pub fn start_over(&mut self) -> Result<(), MarkerStoreError> {
        self.marker.clear()?;
        info!("application marker cleared; form reset");
        self.existing_application = None;
        self.phase = FormPhase::Editing;
        self.reset_draft();
        Ok(())
    }

    fn reset_draft(&mut self) {
        self.draft = ApplicantDraft::default();
        self.hard_error = None;
        self.email_warning = None;
        self.phone_warning = None;
        self.college_warning = None;
    }

    /// The one alert shown: hard error, then email, phone and college warnings, then a tip.
    pub fn alert(&self) -> Alert {
        if let Some(message) = &self.hard_error {
            return Alert::new(AlertSeverity::Error, message.as_str());
        }

        let warning = self
            .email_warning
            .as_ref()
            .or(self.phone_warning.as_ref())
            .or(self.college_warning.as_ref());
        if let Some(message) = warning {
            return Alert::new(AlertSeverity::Warning, message.as_str());
        }

        match self.existing_application {
            Some(_) => Alert::new(AlertSeverity::Success, ALREADY_SUBMITTED_NOTICE),
            None => Alert::new(AlertSeverity::Info, RESUME_LIMIT_TIP),
        }
    }
}
