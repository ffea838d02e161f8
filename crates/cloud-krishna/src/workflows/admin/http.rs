//! Bearer-authenticated client for the admin endpoints: student records and the dropdown
//! values served to the registration form.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::students::{EditError, StudentRecord, StudentUpdate};
use crate::workflows::registration::http::{
    decode, ensure_success_with, network, trimmed_base, Envelope,
};
use crate::workflows::registration::options::COUNTRY_CODE_SEPARATOR;
use crate::workflows::registration::{OptionCategory, RemoteError, StudentId};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Session expired. Please login again.")]
    SessionExpired,
    #[error("This item already exists")]
    Duplicate,
    #[error("Please enter a value")]
    EmptyInput,
    #[error("Please enter valid values")]
    NoValidValues,
    #[error("Value cannot be empty")]
    EmptyValue,
    #[error("Invalid format! Please use \"Code - Country\" (e.g. +91 - India)")]
    InvalidCountryCode { values: Vec<String> },
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("{0}")]
    Remote(#[from] RemoteError),
}

/// Result of posting one new dropdown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

/// Tally of a comma-separated bulk add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddSummary {
    pub added: usize,
    pub duplicates: usize,
    pub errors: usize,
}

impl AddSummary {
    pub fn is_success(&self) -> bool {
        self.added > 0
    }

    /// e.g. `2 items added successfully, 1 duplicate skipped`.
    pub fn message(&self) -> String {
        fn count(n: usize, singular: &str) -> String {
            if n > 1 {
                format!("{n} {singular}s")
            } else {
                format!("{n} {singular}")
            }
        }

        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} added successfully", count(self.added, "item")));
        }
        if self.duplicates > 0 {
            parts.push(format!("{} skipped", count(self.duplicates, "duplicate")));
        }
        if self.errors > 0 {
            parts.push(count(self.errors, "error"));
        }

        if parts.is_empty() {
            "Operation completed".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Split a comma-separated entry into trimmed, non-empty values.
///
/// Country codes must each read `Code - Country`.
pub fn parse_new_values(category: OptionCategory, raw: &str) -> Result<Vec<String>, AdminError> {
    if raw.trim().is_empty() {
        return Err(AdminError::EmptyInput);
    }

    let values: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err(AdminError::NoValidValues);
    }

    if category == OptionCategory::CountryCodes {
        let invalid: Vec<String> = values
            .iter()
            .filter(|value| !value.contains(COUNTRY_CODE_SEPARATOR))
            .cloned()
            .collect();
        if !invalid.is_empty() {
            return Err(AdminError::InvalidCountryCode { values: invalid });
        }
    }

    Ok(values)
}

#[derive(Serialize)]
struct ValueBody<'a> {
    value: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpAdminClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpAdminClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: trimmed_base(base_url),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn field_url(&self, category: OptionCategory) -> String {
        self.url(&format!("/api/form-fields/{}", category.label()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AdminError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(network)?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(AdminError::SessionExpired),
            StatusCode::CONFLICT => Err(AdminError::Duplicate),
            _ => Ok(ensure_success_with(response, |body| body.error.or(body.message)).await?),
        }
    }

    async fn field_values(response: Response) -> Result<Vec<String>, AdminError> {
        match decode::<Envelope<Vec<String>>>(response).await? {
            Envelope {
                success: true,
                data: Some(values),
            } => Ok(values),
            _ => Err(RemoteError::MalformedResponse(
                "form field response not marked successful".to_string(),
            )
            .into()),
        }
    }

    pub async fn list_students(&self) -> Result<Vec<StudentRecord>, AdminError> {
        let url = self.url("/api/students");
        debug!(%url, "fetching students");
        let response = self.send(self.client.get(&url)).await?;
        Ok(decode(response).await?)
    }

    pub async fn update_student(
        &self,
        student: &StudentId,
        update: &StudentUpdate,
    ) -> Result<(), AdminError> {
        let url = self.url(&format!("/api/edit/student/{student}"));
        self.send(self.client.put(&url).json(update)).await?;
        info!(student_id = %student, "student updated");
        Ok(())
    }

    pub async fn delete_student(&self, student: &StudentId) -> Result<(), AdminError> {
        let url = self.url(&format!("/api/student/{student}"));
        self.send(self.client.delete(&url)).await?;
        info!(student_id = %student, "student deleted");
        Ok(())
    }

    pub async fn form_field_values(
        &self,
        category: OptionCategory,
    ) -> Result<Vec<String>, AdminError> {
        let response = self.send(self.client.get(self.field_url(category))).await?;
        Self::field_values(response).await
    }

    pub async fn add_form_field_value(
        &self,
        category: OptionCategory,
        value: &str,
    ) -> Result<AddOutcome, AdminError> {
        let request = self
            .client
            .post(self.field_url(category))
            .json(&ValueBody { value });
        match self.send(request).await {
            Ok(response) => match decode::<Envelope<serde_json::Value>>(response).await? {
                Envelope { success: true, .. } => Ok(AddOutcome::Added),
                _ => Err(RemoteError::MalformedResponse(
                    "form field value not marked added".to_string(),
                )
                .into()),
            },
            Err(AdminError::Duplicate) => Ok(AddOutcome::Duplicate),
            Err(err) => Err(err),
        }
    }

    /// Post each comma-separated value in turn. An expired session stops the run; other
    /// failures are counted and the run continues.
    pub async fn add_form_field_values(
        &self,
        category: OptionCategory,
        raw: &str,
    ) -> Result<AddSummary, AdminError> {
        let values = parse_new_values(category, raw)?;
        let mut summary = AddSummary::default();

        for value in &values {
            match self.add_form_field_value(category, value).await {
                Ok(AddOutcome::Added) => summary.added += 1,
                Ok(AddOutcome::Duplicate) => summary.duplicates += 1,
                Err(AdminError::SessionExpired) => return Err(AdminError::SessionExpired),
                Err(error) => {
                    warn!(
                        %error,
                        %value,
                        category = category.label(),
                        "form field value not added"
                    );
                    summary.errors += 1;
                }
            }
        }

        info!(
            category = category.label(),
            added = summary.added,
            duplicates = summary.duplicates,
            errors = summary.errors,
            "form field values added"
        );
        Ok(summary)
    }

    pub async fn update_form_field_value(
        &self,
        category: OptionCategory,
        index: usize,
        value: &str,
    ) -> Result<Vec<String>, AdminError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AdminError::EmptyValue);
        }

        let url = format!("{}/{index}", self.field_url(category));
        let response = self
            .send(self.client.put(&url).json(&ValueBody { value }))
            .await?;
        Self::field_values(response).await
    }

    pub async fn delete_form_field_value(
        &self,
        category: OptionCategory,
        index: usize,
    ) -> Result<Vec<String>, AdminError> {
        let url = format!("{}/{index}", self.field_url(category));
        let response = self.send(self.client.delete(&url)).await?;
        Self::field_values(response).await
    }
}
