//! Admin-side workflows: session checks, student management, the CSV export and the
//! dropdown values served to the registration form.

pub mod export;
pub mod http;
pub mod session;
pub mod students;

pub use export::{
    export_file_name, export_students_to_path, write_students_csv, ExportError, EXPORT_HEADERS,
};
pub use http::{parse_new_values, AddOutcome, AddSummary, AdminError, HttpAdminClient};
pub use session::{check_admin_token, SessionCheck};
pub use students::{
    split_phone_number, ApplicationStatus, EditError, StudentEdit, StudentRecord, StudentUpdate,
};
