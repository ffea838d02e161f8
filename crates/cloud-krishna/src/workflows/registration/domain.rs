use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest resume accepted by the form (2 MiB).
pub const MAX_RESUME_BYTES: u64 = 2 * 1024 * 1024;

/// Country code preselected on a fresh draft.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Sentinel option that unlocks free-text entry for a dropdown.
pub const OTHER_OPTION: &str = "Other";

/// Identifier generated by the registration backend for a created student record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-progress applicant input owned by a single form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantDraft {
    pub full_name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub college: String,
    pub course: String,
    pub current_year: String,
    pub interests: Vec<String>,
    #[serde(skip)]
    pub resume: Option<ResumeAttachment>,
    pub agreed_to_terms: bool,
}

impl Default for ApplicantDraft {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone: String::new(),
            college: String::new(),
            course: String::new(),
            current_year: String::new(),
            interests: Vec::new(),
            resume: None,
            agreed_to_terms: false,
        }
    }
}

/// Document formats the resume picker accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

const PDF_MIME: &str = "application/pdf";
const DOC_MIME: &str = "application/msword";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

impl ResumeFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ResumeFormat::Pdf => PDF_MIME,
            ResumeFormat::Doc => DOC_MIME,
            ResumeFormat::Docx => DOCX_MIME,
        }
    }

    pub fn from_mime(value: &str) -> Option<Self> {
        let parsed: mime::Mime = value.trim().parse().ok()?;
        Self::from_essence(parsed.essence_str())
    }

    fn from_essence(essence: &str) -> Option<Self> {
        match essence.to_ascii_lowercase().as_str() {
            PDF_MIME => Some(ResumeFormat::Pdf),
            DOC_MIME => Some(ResumeFormat::Doc),
            DOCX_MIME => Some(ResumeFormat::Docx),
            _ => None,
        }
    }

    /// Resolve the format from a file name, falling back to the declared content type.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        mime_guess::from_path(file_name)
            .iter()
            .find_map(|guess| Self::from_essence(guess.essence_str()))
            .or_else(|| content_type.and_then(Self::from_mime))
    }
}

/// Raw file handed over by a file picker before any checks run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Resume accepted onto the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub format: ResumeFormat,
    pub bytes: Vec<u8>,
}

impl ResumeAttachment {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Dial code entry shown in the country-code dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCode {
    pub code: String,
    pub country: String,
}

impl CountryCode {
    pub fn new(code: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            country: country.into(),
        }
    }
}

/// Named enumerations served by the config service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionCategory {
    Colleges,
    Courses,
    Years,
    Interests,
    CountryCodes,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 5] = [
        OptionCategory::Colleges,
        OptionCategory::Courses,
        OptionCategory::Years,
        OptionCategory::Interests,
        OptionCategory::CountryCodes,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            OptionCategory::Colleges => "colleges",
            OptionCategory::Courses => "courses",
            OptionCategory::Years => "years",
            OptionCategory::Interests => "interests",
            OptionCategory::CountryCodes => "countryCodes",
        }
    }
}

/// Raw list bundle as returned by the config service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormFieldBundle {
    pub colleges: Vec<String>,
    pub courses: Vec<String>,
    pub years: Vec<String>,
    pub interests: Vec<String>,
    pub country_codes: Vec<String>,
}

/// Payload for the create-student call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub college: String,
    pub course: String,
    pub current_year: String,
    pub area_of_interest: Vec<String>,
}

/// Short-lived signed parameters authorizing a direct upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCredentials {
    pub token: String,
    pub expire: i64,
    pub signature: String,
}

/// Fully prepared upload for the storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    /// `data:<mime>;base64,<payload>` encoded file body.
    pub file: String,
    pub file_name: String,
    pub folder: String,
    pub credentials: UploadCredentials,
    pub tags: Vec<String>,
    pub use_unique_file_name: bool,
    pub overwrite_file: bool,
    pub overwrite_tags: bool,
}

/// Storage reference returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedResume {
    pub url: String,
    pub file_id: String,
}

/// Resume fields patched onto the student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumePatch {
    pub resume_url: String,
    pub resume_public_id: String,
}

impl From<&UploadedResume> for ResumePatch {
    fn from(uploaded: &UploadedResume) -> Self {
        Self {
            resume_url: uploaded.url.clone(),
            resume_public_id: uploaded.file_id.clone(),
        }
    }
}
