use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate};

use super::students::{ApplicationStatus, StudentRecord};

pub const EXPORT_HEADERS: [&str; 10] = [
    "Application ID",
    "Student Name",
    "Email",
    "Phone Number",
    "College",
    "Course",
    "Year",
    "Area of Interest",
    "Status",
    "Date",
];

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to write student export: {}", err),
            ExportError::Csv(err) => write!(f, "failed to encode student export: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// `students_YYYY-MM-DD.csv` for the given day.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("students_{}.csv", date.format("%Y-%m-%d"))
}

/// Write every student as one fully quoted row under [`EXPORT_HEADERS`].
///
/// The phone cell is prefixed with a tab so spreadsheets keep the leading `+` and zeros.
pub fn write_students_csv<W: Write>(
    writer: W,
    students: &[StudentRecord],
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(EXPORT_HEADERS)?;
    for student in students {
        csv_writer.write_record(export_row(student))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_students_to_path<P: AsRef<Path>>(
    path: P,
    students: &[StudentRecord],
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_students_csv(file, students)
}

fn export_row(student: &StudentRecord) -> [String; 10] {
    [
        student.id.to_string(),
        student.fullname.clone(),
        student.email.clone(),
        format!("\t{}", student.phone_number),
        student.college.clone(),
        student.course.clone(),
        student.current_year.clone(),
        student.area_of_interest.join(", "),
        student
            .status
            .clone()
            .filter(|status| !status.is_empty())
            .unwrap_or_else(|| ApplicationStatus::Pending.as_str().to_string()),
        registered_on(student.created_at.as_deref()),
    ]
}

fn registered_on(created_at: Option<&str>) -> String {
    created_at
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.date_naive().format("%-d/%-m/%Y").to_string())
        .unwrap_or_default()
}
