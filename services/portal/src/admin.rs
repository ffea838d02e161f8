use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use clap::{Args, Subcommand};
use cloud_krishna::error::AppError;
use cloud_krishna::workflows::admin::{
    check_admin_token, export_file_name, export_students_to_path, AdminError, ApplicationStatus,
    HttpAdminClient, SessionCheck, StudentEdit,
};
use cloud_krishna::workflows::registration::{OptionCategory, StudentId};
use serde::Deserialize;
use tracing::info;

use crate::commands::CategoryArg;
use crate::infra::Portal;

#[derive(Args, Debug)]
pub(crate) struct AdminArgs {
    /// Admin token issued at login
    #[arg(long)]
    pub(crate) token: String,
    #[command(subcommand)]
    pub(crate) command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommand {
    /// Download every registered student as a CSV file
    Export {
        /// Output path; defaults to students_<today>.csv
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the values of one dropdown with their indexes
    Fields {
        #[arg(value_enum)]
        category: CategoryArg,
    },
    /// Add comma-separated values to a dropdown
    AddField {
        #[arg(value_enum)]
        category: CategoryArg,
        values: String,
    },
    /// Replace the dropdown value at an index
    EditField {
        #[arg(value_enum)]
        category: CategoryArg,
        index: usize,
        value: String,
    },
    /// Remove the dropdown value at an index
    DeleteField {
        #[arg(value_enum)]
        category: CategoryArg,
        index: usize,
    },
    /// Change a student's details from a JSON file of the fields to replace
    EditStudent {
        id: String,
        #[arg(long)]
        changes: PathBuf,
    },
    /// Delete a student record
    DeleteStudent { id: String },
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for ApplicationStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => ApplicationStatus::Pending,
            StatusArg::Approved => ApplicationStatus::Approved,
            StatusArg::Rejected => ApplicationStatus::Rejected,
        }
    }
}

/// Fields to replace on an existing student; absent keys keep the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub(crate) struct StudentChanges {
    fullname: Option<String>,
    email: Option<String>,
    country_code: Option<String>,
    phone: Option<String>,
    college: Option<String>,
    course: Option<String>,
    current_year: Option<String>,
    area_of_interest: Option<Vec<String>>,
    status: Option<StatusArg>,
}

impl StudentChanges {
    fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn apply_to(self, edit: &mut StudentEdit) {
        fn replace<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        replace(&mut edit.fullname, self.fullname);
        replace(&mut edit.email, self.email);
        replace(&mut edit.country_code, self.country_code);
        replace(&mut edit.phone, self.phone);
        replace(&mut edit.college, self.college);
        replace(&mut edit.course, self.course);
        replace(&mut edit.current_year, self.current_year);
        replace(&mut edit.area_of_interest, self.area_of_interest);
        if let Some(status) = self.status {
            edit.status = Some(status.into());
        }
    }
}

/// Refuse to call the admin API with a token that is missing or already expired.
fn ensure_session(token: &str, now: DateTime<Utc>) -> Result<(), AdminError> {
    match check_admin_token(Some(token), now) {
        SessionCheck::Active => Ok(()),
        SessionCheck::Expired | SessionCheck::LoginRequired => Err(AdminError::SessionExpired),
    }
}

pub(crate) async fn run_admin(portal: &Portal, args: AdminArgs) -> Result<(), AppError> {
    ensure_session(&args.token, Utc::now())?;
    let client = HttpAdminClient::new(portal.host_server.clone(), args.token);

    match args.command {
        AdminCommand::Export { out } => {
            let students = client.list_students().await?;
            let path =
                out.unwrap_or_else(|| PathBuf::from(export_file_name(Local::now().date_naive())));
            export_students_to_path(&path, &students)?;
            info!(count = students.len(), path = %path.display(), "students exported");
            println!("Exported {} students to {}", students.len(), path.display());
        }
        AdminCommand::Fields { category } => {
            let values = client.form_field_values(category.into()).await?;
            print!("{}", render_values(category.into(), &values));
        }
        AdminCommand::AddField { category, values } => {
            let summary = client.add_form_field_values(category.into(), &values).await?;
            println!("{}", summary.message());
        }
        AdminCommand::EditField {
            category,
            index,
            value,
        } => {
            let values = client
                .update_form_field_value(category.into(), index, &value)
                .await?;
            println!("Item updated successfully");
            print!("{}", render_values(category.into(), &values));
        }
        AdminCommand::DeleteField { category, index } => {
            let values = client.delete_form_field_value(category.into(), index).await?;
            println!("Item {index} deleted successfully");
            print!("{}", render_values(category.into(), &values));
        }
        AdminCommand::EditStudent { id, changes } => {
            let changes = StudentChanges::from_path(&changes)?;
            let students = client.list_students().await?;
            let record = students
                .iter()
                .find(|student| student.id.as_str() == id)
                .ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no student with id {id}"),
                    )
                })?;

            let mut edit = StudentEdit::from_record(record);
            changes.apply_to(&mut edit);
            let update = edit.validate().map_err(AdminError::from)?;
            client.update_student(&record.id, &update).await?;
            println!("Student updated successfully");
        }
        AdminCommand::DeleteStudent { id } => {
            client.delete_student(&StudentId(id)).await?;
            println!("Student deleted successfully");
        }
    }
    Ok(())
}

fn render_values(category: OptionCategory, values: &[String]) -> String {
    let mut out = format!("{}:\n", category.label());
    for (index, value) in values.iter().enumerate() {
        out.push_str(&format!("  [{index}] {value}\n"));
    }
    out
}
