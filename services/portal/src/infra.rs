use std::fs;
use std::path::Path;
use std::sync::Arc;

use cloud_krishna::config::AppConfig;
use cloud_krishna::error::AppError;
use cloud_krishna::workflows::registration::{
    ApplicationMarkerStore, AttachmentError, FieldUpdate, FileMarkerStore, FormController,
    HttpRegistrationBackend, HttpResumeStorage, OptionCategory, RegistrationSubmitter,
    ResumeFile, UploadSettings, MAX_RESUME_BYTES, OTHER_OPTION,
};
use serde::Deserialize;
use tracing::warn;

/// Live collaborators wired from configuration.
pub(crate) struct Portal {
    pub(crate) host_server: String,
    pub(crate) backend: Arc<HttpRegistrationBackend>,
    storage: Arc<HttpResumeStorage>,
    marker: Arc<FileMarkerStore>,
    settings: UploadSettings,
}

impl Portal {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        Self {
            host_server: config.api.host_server.clone(),
            backend: Arc::new(HttpRegistrationBackend::new(config.api.host_server.clone())),
            storage: Arc::new(HttpResumeStorage::new(
                config.api.upload_endpoint.clone(),
                config.api.upload_public_key.clone(),
            )),
            marker: Arc::new(FileMarkerStore::new(&config.storage.state_dir)),
            settings: UploadSettings {
                folder: config.api.upload_folder.clone(),
            },
        }
    }

    pub(crate) fn marker(&self) -> Arc<dyn ApplicationMarkerStore> {
        self.marker.clone()
    }

    pub(crate) fn submitter(&self) -> RegistrationSubmitter {
        RegistrationSubmitter::new(
            self.backend.clone(),
            self.storage.clone(),
            self.settings.clone(),
        )
    }
}

/// Applicant answers read from a JSON draft file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub(crate) struct DraftInput {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) country_code: Option<String>,
    pub(crate) phone: String,
    pub(crate) college: String,
    pub(crate) course: String,
    pub(crate) current_year: String,
    pub(crate) interests: Vec<String>,
    pub(crate) agreed_to_terms: bool,
}

impl DraftInput {
    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Feed the answers through the form the same way the UI would, returning the names of
    /// fields whose values were refused.
    pub(crate) fn apply_to(self, form: &mut FormController) -> Vec<&'static str> {
        let mut refused = Vec::new();
        let mut push = |field: &'static str, applied: bool| {
            if !applied {
                warn!(field, "value refused by the form");
                refused.push(field);
            }
        };

        push("fullName", form.apply(FieldUpdate::FullName(self.full_name)).is_applied());
        push("email", form.apply(FieldUpdate::Email(self.email)).is_applied());
        if let Some(code) = self.country_code {
            push("countryCode", form.apply(FieldUpdate::CountryCode(code)).is_applied());
        }
        push("phone", form.apply(FieldUpdate::Phone(self.phone)).is_applied());
        push(
            "college",
            select_or_other(form, OptionCategory::Colleges, self.college),
        );
        push(
            "course",
            select_or_other(form, OptionCategory::Courses, self.course),
        );
        push(
            "currentYear",
            select_or_other(form, OptionCategory::Years, self.current_year),
        );
        for interest in self.interests {
            if !form.draft().interests.contains(&interest) {
                push("interests", form.toggle_interest(&interest).is_applied());
            }
        }
        push(
            "agreedToTerms",
            form.apply(FieldUpdate::AgreedToTerms(self.agreed_to_terms))
                .is_applied(),
        );

        refused
    }
}

/// Pick a listed value, or switch the dropdown to "Other" and type the value as free text.
fn select_or_other(form: &mut FormController, category: OptionCategory, value: String) -> bool {
    if form.options().contains(category, &value) || value.is_empty() {
        return form.apply(listed(category, value)).is_applied();
    }

    if !form.apply(listed(category, OTHER_OPTION.to_string())).is_applied() {
        return false;
    }
    let free_text = match category {
        OptionCategory::Colleges => FieldUpdate::OtherCollege(value),
        OptionCategory::Courses => FieldUpdate::OtherCourse(value),
        _ => FieldUpdate::OtherYear(value),
    };
    form.apply(free_text).is_applied()
}

fn listed(category: OptionCategory, value: String) -> FieldUpdate {
    match category {
        OptionCategory::Colleges => FieldUpdate::College(value),
        OptionCategory::Courses => FieldUpdate::Course(value),
        _ => FieldUpdate::CurrentYear(value),
    }
}

/// Read a resume from disk, refusing files over the size limit before loading them.
pub(crate) fn read_resume(path: &Path) -> Result<ResumeFile, AppError> {
    let size = fs::metadata(path)?.len();
    if size > MAX_RESUME_BYTES {
        return Err(AttachmentError::TooLarge { size }.into());
    }

    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(ResumeFile {
        file_name,
        content_type: None,
        bytes,
    })
}
