mod admin;
mod cli;
mod commands;
mod infra;

use cloud_krishna::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
