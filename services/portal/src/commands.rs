use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, ValueEnum};
use cloud_krishna::error::AppError;
use cloud_krishna::workflows::admin::{check_admin_token, SessionCheck};
use cloud_krishna::workflows::registration::{
    load_options, resolve_status, AlertSeverity, FormController, OptionCategory, OptionSet,
    StatusView,
};
use tracing::info;

use crate::infra::{read_resume, DraftInput, Portal};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum CategoryArg {
    Colleges,
    Courses,
    Years,
    Interests,
    CountryCodes,
}

impl From<CategoryArg> for OptionCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Colleges => OptionCategory::Colleges,
            CategoryArg::Courses => OptionCategory::Courses,
            CategoryArg::Years => OptionCategory::Years,
            CategoryArg::Interests => OptionCategory::Interests,
            CategoryArg::CountryCodes => OptionCategory::CountryCodes,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct OptionsArgs {
    /// Only print one category
    #[arg(long, value_enum)]
    pub(crate) category: Option<CategoryArg>,
    /// Case-insensitive filter applied to every printed list
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    /// JSON file with the applicant's answers (camelCase keys)
    #[arg(long)]
    pub(crate) draft: PathBuf,
    /// Resume to attach (PDF, DOC or DOCX, at most 2 MB)
    #[arg(long)]
    pub(crate) resume: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AdminSessionArgs {
    /// Stored admin token; omit to check the "no token" case
    #[arg(long)]
    pub(crate) token: Option<String>,
}

pub(crate) async fn run_options(portal: &Portal, args: OptionsArgs) -> Result<(), AppError> {
    let options = load_options(portal.backend.as_ref()).await;
    let query = args.search.unwrap_or_default();
    let categories = match args.category {
        Some(category) => vec![category.into()],
        None => OptionCategory::ALL.to_vec(),
    };

    print!("{}", render_options(&options, &categories, &query));
    Ok(())
}

fn render_options(options: &OptionSet, categories: &[OptionCategory], query: &str) -> String {
    let mut out = String::new();
    for &category in categories {
        let source = if options.is_defaulted(category) {
            " (defaults)"
        } else {
            ""
        };
        out.push_str(&format!("{}{}:\n", category.label(), source));

        if category == OptionCategory::CountryCodes {
            for entry in options.filter_country_codes(query) {
                out.push_str(&format!("  {} {}\n", entry.code, entry.country));
            }
        } else {
            for value in options.filter(category, query) {
                out.push_str(&format!("  {value}\n"));
            }
        }
    }
    out
}

pub(crate) async fn run_register(portal: &Portal, args: RegisterArgs) -> Result<(), AppError> {
    let draft = DraftInput::from_path(&args.draft)?;
    let options = load_options(portal.backend.as_ref()).await;
    let mut form = FormController::mount(options, portal.marker())?;

    let refused = draft.apply_to(&mut form);
    if !refused.is_empty() {
        println!("Ignored values for: {}", refused.join(", "));
    }

    if let Some(path) = args.resume {
        let file = read_resume(&path)?;
        form.attach_resume(file)?;
    }

    let alert = form.alert();
    if alert.severity == AlertSeverity::Warning {
        println!("Warning: {}", alert.message);
    }

    let receipt = portal.submitter().submit(&mut form).await?;
    info!(student_id = %receipt.student_id, next = receipt.next.path(), "registration complete");

    println!("Registration submitted.");
    println!("Application ID: {}", receipt.student_id);
    if let Some(resume) = &receipt.resume {
        println!("Resume: {}", resume.url);
    }
    Ok(())
}

pub(crate) fn run_status(portal: &Portal) -> Result<(), AppError> {
    match resolve_status(portal.marker().as_ref())? {
        StatusView::Submitted {
            application_id,
            status,
        } => {
            println!("Application ID: {application_id}");
            println!("Status: {status}");
        }
        StatusView::Redirect { to } => {
            println!("No application recorded on this machine; continue at {}", to.path());
        }
    }
    Ok(())
}

pub(crate) fn run_start_over(portal: &Portal) -> Result<(), AppError> {
    let mut form = FormController::mount(OptionSet::defaults(), portal.marker())?;
    let previous = form.existing_application().cloned();
    form.start_over()?;

    match previous {
        Some(id) => println!("Cleared application {id}; a new registration can be submitted."),
        None => println!("No application was recorded."),
    }
    Ok(())
}

pub(crate) fn run_admin_session(args: AdminSessionArgs) -> Result<(), AppError> {
    let message = match check_admin_token(args.token.as_deref(), Utc::now()) {
        SessionCheck::Active => "Session active.",
        SessionCheck::Expired => "Session expired. Clear the stored token and log in again.",
        SessionCheck::LoginRequired => "No session. Log in to continue.",
    };
    println!("{message}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_marks_defaulted_categories_and_filters() {
        let options = OptionSet::defaults();
        let out = render_options(
            &options,
            &[OptionCategory::Courses, OptionCategory::CountryCodes],
            "b",
        );

        assert!(out.starts_with("courses (defaults):\n"));
        assert!(out.contains("  B.Tech.\n"));
        assert!(!out.contains("  MCA\n"));
        assert!(out.contains("countryCodes (defaults):\n"));
        assert!(out.contains("  +880 Bangladesh\n"));
        assert!(out.contains("  +975 Bhutan\n"));
    }
}
