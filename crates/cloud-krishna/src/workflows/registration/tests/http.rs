use mockito::{Matcher, Server};
use serde_json::json;

use super::common::{credentials, STUDENT_ID};
use crate::workflows::registration::domain::{
    CreateStudentRequest, ResumePatch, ResumeUpload, StudentId,
};
use crate::workflows::registration::http::{HttpRegistrationBackend, HttpResumeStorage};
use crate::workflows::registration::repository::{
    FormFieldSource, RegistrationBackend, RemoteError, ResumeStorage,
};

fn request() -> CreateStudentRequest {
    CreateStudentRequest {
        fullname: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone_number: "+919876543210".to_string(),
        college: "IIT Delhi".to_string(),
        course: "B.Tech.".to_string(),
        current_year: "2nd Year".to_string(),
        area_of_interest: vec!["Cloud Computing".to_string()],
    }
}

#[tokio::test]
async fn fetches_form_fields_from_public_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/form-fields/public/all")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "data": {
                    "colleges": ["CSVTU"],
                    "courses": ["BCA"],
                    "years": [],
                    "interests": ["DevOps"],
                    "countryCodes": ["+91 - India"]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let backend = HttpRegistrationBackend::new(format!("{}/", server.url()));
    let bundle = backend.fetch_form_fields().await.expect("bundle fetched");

    mock.assert_async().await;
    assert_eq!(bundle.colleges, vec!["CSVTU"]);
    assert!(bundle.years.is_empty());
    assert_eq!(bundle.country_codes, vec!["+91 - India"]);
}

#[tokio::test]
async fn unsuccessful_form_field_envelope_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/form-fields/public/all")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false}"#)
        .create_async()
        .await;

    let backend = HttpRegistrationBackend::new(server.url());
    match backend.fetch_form_fields().await {
        Err(RemoteError::MalformedResponse(_)) => {}
        other => panic!("expected malformed response, got {other:?}"),
    }
}

#[tokio::test]
async fn create_student_posts_json_and_reads_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/register/student")
        .match_body(Matcher::Json(json!({
            "fullname": "Asha Rao",
            "email": "asha@example.com",
            "phone_number": "+919876543210",
            "college": "IIT Delhi",
            "course": "B.Tech.",
            "current_year": "2nd Year",
            "area_of_interest": ["Cloud Computing"]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({ "success": true, "data": { "_id": STUDENT_ID } }).to_string())
        .create_async()
        .await;

    let backend = HttpRegistrationBackend::new(server.url());
    let id = backend
        .create_student(&request())
        .await
        .expect("student created");

    mock.assert_async().await;
    assert_eq!(id, StudentId(STUDENT_ID.to_string()));
}

#[tokio::test]
async fn create_student_without_id_is_malformed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/register/student")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"data":{}}"#)
        .create_async()
        .await;

    let err = HttpRegistrationBackend::new(server.url())
        .create_student(&request())
        .await
        .expect_err("id missing");
    assert!(matches!(err, RemoteError::MalformedResponse(_)));
    assert_eq!(
        err.user_message(),
        "Failed to submit registration. Please try again."
    );
}

#[tokio::test]
async fn server_error_message_is_kept() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/register/student")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"message":"Email already registered"}"#)
        .create_async()
        .await;

    let err = HttpRegistrationBackend::new(server.url())
        .create_student(&request())
        .await
        .expect_err("conflict");
    assert_eq!(
        err,
        RemoteError::Server {
            status: 409,
            message: Some("Email already registered".to_string()),
        }
    );
}

#[tokio::test]
async fn server_error_without_body_maps_to_network_notice() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/imagekit/auth")
        .with_status(502)
        .create_async()
        .await;

    let err = HttpRegistrationBackend::new(server.url())
        .upload_credentials()
        .await
        .expect_err("bad gateway");
    assert_eq!(
        err,
        RemoteError::Server {
            status: 502,
            message: None,
        }
    );
    assert_eq!(
        err.user_message(),
        "Network error. Please check your connection and try again."
    );
}

#[tokio::test]
async fn upload_credentials_are_decoded() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/imagekit/auth")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "token": "c9f1b7e2-token",
                "expire": 1_735_689_600,
                "signature": "0f9c2d7a-signature"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let creds = HttpRegistrationBackend::new(server.url())
        .upload_credentials()
        .await
        .expect("credentials");
    assert_eq!(creds, credentials());
}

#[tokio::test]
async fn patch_resume_targets_student_path() {
    let mut server = Server::new_async().await;
    let path = format!("/api/student/{STUDENT_ID}/resume");
    let mock = server
        .mock("PATCH", path.as_str())
        .match_body(Matcher::Json(json!({
            "resume_url": "https://ik.imagekit.io/cv.pdf",
            "resume_public_id": "file_1"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    HttpRegistrationBackend::new(server.url())
        .patch_resume(
            &StudentId(STUDENT_ID.to_string()),
            &ResumePatch {
                resume_url: "https://ik.imagekit.io/cv.pdf".to_string(),
                resume_public_id: "file_1".to_string(),
            },
        )
        .await
        .expect("patched");
    mock.assert_async().await;
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let backend = HttpRegistrationBackend::new("http://127.0.0.1:9");
    match backend.fetch_form_fields().await {
        Err(RemoteError::Network(_)) => {}
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn storage_upload_sends_multipart_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/files/upload")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="fileName"\s+665f1c2e9b1d4a0012ab34cd_cv.pdf"#.to_string()),
            Matcher::Regex(r#"name="publicKey"\s+public_test_key"#.to_string()),
            Matcher::Regex(r#"name="useUniqueFileName"\s+false"#.to_string()),
            Matcher::Regex(r#"name="tags"\s+resume,665f1c2e9b1d4a0012ab34cd"#.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"url":"https://ik.imagekit.io/cv.pdf","fileId":"file_1","name":"cv.pdf"}"#)
        .create_async()
        .await;

    let storage = HttpResumeStorage::new(
        format!("{}/api/v1/files/upload", server.url()),
        "public_test_key",
    );
    let uploaded = storage
        .upload(&ResumeUpload {
            file: "data:application/pdf;base64,JVBERi0xLjQ=".to_string(),
            file_name: format!("{STUDENT_ID}_cv.pdf"),
            folder: "cloudkrishna/student_resumes".to_string(),
            credentials: credentials(),
            tags: vec!["resume".to_string(), STUDENT_ID.to_string()],
            use_unique_file_name: false,
            overwrite_file: true,
            overwrite_tags: true,
        })
        .await
        .expect("uploaded");

    mock.assert_async().await;
    assert_eq!(uploaded.url, "https://ik.imagekit.io/cv.pdf");
    assert_eq!(uploaded.file_id, "file_1");
}
