//! reqwest-backed adapters for the registration backend and the resume storage service.

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::domain::{
    CreateStudentRequest, FormFieldBundle, ResumePatch, ResumeUpload, StudentId,
    UploadCredentials, UploadedResume,
};
use super::repository::{FormFieldSource, RegistrationBackend, RemoteError, ResumeStorage};

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub(crate) success: bool,
    pub(crate) data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CreatedStudent {
    #[serde(rename = "_id")]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
    pub(crate) error: Option<String>,
}

pub(crate) fn trimmed_base(url: impl Into<String>) -> String {
    url.into().trim_end_matches('/').to_string()
}

pub(crate) fn network(err: reqwest::Error) -> RemoteError {
    RemoteError::Network(err.to_string())
}

/// Turn non-2xx responses into `RemoteError::Server`, keeping the server's message.
async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    ensure_success_with(response, |body| body.message).await
}

/// Like [`ensure_success`], with the caller choosing which error body field carries the message.
pub(crate) async fn ensure_success_with(
    response: Response,
    pick: fn(ErrorBody) -> Option<String>,
) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.json::<ErrorBody>().await.ok().and_then(pick);
    Err(RemoteError::Server {
        status: status.as_u16(),
        message,
    })
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RemoteError> {
    response
        .json::<T>()
        .await
        .map_err(|err| RemoteError::MalformedResponse(err.to_string()))
}

/// Client for the registration and config endpoints of the backend.
#[derive(Debug, Clone)]
pub struct HttpRegistrationBackend {
    client: Client,
    base_url: String,
}

impl HttpRegistrationBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trimmed_base(base_url),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl FormFieldSource for HttpRegistrationBackend {
    async fn fetch_form_fields(&self) -> Result<FormFieldBundle, RemoteError> {
        let url = self.url("/api/form-fields/public/all");
        debug!(%url, "fetching form fields");
        let response = self.client.get(&url).send().await.map_err(network)?;
        let response = ensure_success(response).await?;
        let envelope: Envelope<FormFieldBundle> = decode(response).await?;

        match envelope {
            Envelope {
                success: true,
                data: Some(bundle),
            } => Ok(bundle),
            _ => Err(RemoteError::MalformedResponse(
                "form field response not marked successful".to_string(),
            )),
        }
    }
}

#[async_trait]
impl RegistrationBackend for HttpRegistrationBackend {
    async fn create_student(
        &self,
        request: &CreateStudentRequest,
    ) -> Result<StudentId, RemoteError> {
        let url = self.url("/api/register/student");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        let envelope: Envelope<CreatedStudent> = decode(response).await?;

        envelope
            .data
            .and_then(|student| student.id)
            .filter(|id| !id.is_empty())
            .map(StudentId)
            .ok_or_else(|| {
                RemoteError::MalformedResponse("registration response missing student id".to_string())
            })
    }

    async fn upload_credentials(&self) -> Result<UploadCredentials, RemoteError> {
        let url = self.url("/api/imagekit/auth");
        let response = self.client.get(&url).send().await.map_err(network)?;
        let response = ensure_success(response).await?;
        decode(response).await
    }

    async fn patch_resume(
        &self,
        student: &StudentId,
        patch: &ResumePatch,
    ) -> Result<(), RemoteError> {
        let url = self.url(&format!("/api/student/{student}/resume"));
        let response = self
            .client
            .patch(&url)
            .json(patch)
            .send()
            .await
            .map_err(network)?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Direct-to-storage uploader speaking the ImageKit upload API.
#[derive(Debug, Clone)]
pub struct HttpResumeStorage {
    client: Client,
    endpoint: String,
    public_key: String,
}

impl HttpResumeStorage {
    pub fn new(endpoint: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint, public_key)
    }

    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            public_key: public_key.into(),
        }
    }

    fn form(&self, upload: &ResumeUpload) -> Form {
        Form::new()
            .text("file", upload.file.clone())
            .text("fileName", upload.file_name.clone())
            .text("folder", upload.folder.clone())
            .text("publicKey", self.public_key.clone())
            .text("signature", upload.credentials.signature.clone())
            .text("token", upload.credentials.token.clone())
            .text("expire", upload.credentials.expire.to_string())
            .text("useUniqueFileName", upload.use_unique_file_name.to_string())
            .text("overwriteFile", upload.overwrite_file.to_string())
            .text("overwriteTags", upload.overwrite_tags.to_string())
            .text("tags", upload.tags.join(","))
    }
}

#[async_trait]
impl ResumeStorage for HttpResumeStorage {
    async fn upload(&self, upload: &ResumeUpload) -> Result<UploadedResume, RemoteError> {
        debug!(file_name = %upload.file_name, folder = %upload.folder, "uploading resume");
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(self.form(upload))
            .send()
            .await
            .map_err(network)?;
        let response = ensure_success(response).await?;
        decode(response).await
    }
}
