//! Student records as the admin dashboard sees them, and validation of admin edits.

use serde::{Deserialize, Deserializer, Serialize};

use crate::workflows::registration::validation::{
    has_name_charset, is_valid_college, is_valid_email, is_valid_phone, PHONE_DIGITS,
};
use crate::workflows::registration::{StudentId, DEFAULT_COUNTRY_CODE};

/// Review state an admin assigns to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// Registered student as returned by `GET /api/students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(rename = "_id")]
    pub id: StudentId,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub college: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub current_year: String,
    #[serde(default, deserialize_with = "list_or_text")]
    pub area_of_interest: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

fn list_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrText {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<ListOrText>::deserialize(deserializer)? {
        Some(ListOrText::List(values)) => values,
        Some(ListOrText::Text(value)) if !value.is_empty() => vec![value],
        _ => Vec::new(),
    })
}

/// Split a stored `phone_number` into dial code and the trailing ten-digit number.
pub fn split_phone_number(full: &str) -> (String, String) {
    let clean = full.trim();
    if clean.is_empty() {
        return (DEFAULT_COUNTRY_CODE.to_string(), String::new());
    }
    if !clean.starts_with('+') {
        return (DEFAULT_COUNTRY_CODE.to_string(), clean.to_string());
    }

    let chars: Vec<char> = clean.chars().collect();
    if chars.len() > PHONE_DIGITS {
        let split = chars.len() - PHONE_DIGITS;
        (
            chars[..split].iter().collect(),
            chars[split..].iter().collect(),
        )
    } else {
        (
            DEFAULT_COUNTRY_CODE.to_string(),
            clean.trim_start_matches('+').to_string(),
        )
    }
}

/// First failing rule of an admin edit. Messages are shown verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("Please enter full name")]
    FullNameRequired,
    #[error("Full name can only contain alphabets and spaces")]
    FullNameCharset,
    #[error("Please enter email address")]
    EmailRequired,
    #[error("Please enter a valid email address (e.g., example@domain.com)")]
    EmailInvalid,
    #[error("Please enter phone number")]
    PhoneRequired,
    #[error("Phone number can only contain numbers")]
    PhoneCharset,
    #[error("Phone number must be exactly 10 digits")]
    PhoneLength,
    #[error("Please enter college name")]
    CollegeRequired,
    #[error("College name can only contain alphabets and spaces")]
    CollegeCharset,
    #[error("Please select course")]
    CourseRequired,
    #[error("Please select current year")]
    YearRequired,
    #[error("Please select at least one area of interest")]
    InterestsRequired,
    #[error("Please select application status")]
    StatusRequired,
}

/// Admin-side edit of a student, seeded from a [`StudentRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudentEdit {
    pub fullname: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub college: String,
    pub course: String,
    pub current_year: String,
    pub area_of_interest: Vec<String>,
    pub status: Option<ApplicationStatus>,
}

impl StudentEdit {
    pub fn from_record(record: &StudentRecord) -> Self {
        let (country_code, phone) = split_phone_number(&record.phone_number);
        let status = match record.status.as_deref() {
            Some("approved") => ApplicationStatus::Approved,
            Some("rejected") => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Pending,
        };
        Self {
            fullname: record.fullname.clone(),
            email: record.email.clone(),
            country_code,
            phone,
            college: record.college.clone(),
            course: record.course.clone(),
            current_year: record.current_year.clone(),
            area_of_interest: record.area_of_interest.clone(),
            status: Some(status),
        }
    }

    /// Check the edit in display order and build the `PUT` body.
    pub fn validate(&self) -> Result<StudentUpdate, EditError> {
        if self.fullname.trim().is_empty() {
            return Err(EditError::FullNameRequired);
        }
        if !has_name_charset(&self.fullname) {
            return Err(EditError::FullNameCharset);
        }
        if self.email.trim().is_empty() {
            return Err(EditError::EmailRequired);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(EditError::EmailInvalid);
        }
        if self.phone.trim().is_empty() {
            return Err(EditError::PhoneRequired);
        }
        if !is_valid_phone(&self.phone) {
            return Err(EditError::PhoneCharset);
        }
        if self.phone.chars().count() != PHONE_DIGITS {
            return Err(EditError::PhoneLength);
        }
        if self.college.trim().is_empty() {
            return Err(EditError::CollegeRequired);
        }
        if !is_valid_college(&self.college) {
            return Err(EditError::CollegeCharset);
        }
        if self.course.trim().is_empty() {
            return Err(EditError::CourseRequired);
        }
        if self.current_year.is_empty() {
            return Err(EditError::YearRequired);
        }
        if self.area_of_interest.is_empty() {
            return Err(EditError::InterestsRequired);
        }
        let status = self.status.ok_or(EditError::StatusRequired)?;

        Ok(StudentUpdate {
            fullname: self.fullname.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: format!("{}{}", self.country_code, self.phone.trim()),
            college: self.college.trim().to_string(),
            course: self.course.clone(),
            current_year: self.current_year.clone(),
            area_of_interest: self.area_of_interest.clone(),
            status,
        })
    }
}

/// Body of `PUT /api/edit/student/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentUpdate {
    pub fullname: String,
    pub email: String,
    pub phone_number: String,
    pub college: String,
    pub course: String,
    pub current_year: String,
    pub area_of_interest: Vec<String>,
    pub status: ApplicationStatus,
}
