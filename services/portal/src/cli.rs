use crate::admin::{run_admin, AdminArgs};
use crate::commands::{
    run_admin_session, run_options, run_register, run_start_over, run_status, AdminSessionArgs,
    OptionsArgs, RegisterArgs,
};
use crate::infra::Portal;
use clap::{Parser, Subcommand};
use cloud_krishna::config::AppConfig;
use cloud_krishna::error::AppError;
use cloud_krishna::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "Cloud Krishna Portal",
    about = "Register students for the Cloud Krishna programme from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dropdown options served by the backend (or the built-in defaults)
    Options(OptionsArgs),
    /// Validate a draft and submit it, uploading the resume when one is given
    Register(RegisterArgs),
    /// Show the application recorded on this machine
    Status,
    /// Forget the recorded application so a new registration can be submitted
    StartOver,
    /// Check whether a stored admin token is still usable
    AdminSession(AdminSessionArgs),
    /// Manage students and dropdown values with an admin token
    Admin(AdminArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, host = %config.api.host_server, "portal configured");

    let portal = Portal::from_config(&config);
    match cli.command {
        Command::Options(args) => run_options(&portal, args).await,
        Command::Register(args) => run_register(&portal, args).await,
        Command::Status => run_status(&portal),
        Command::StartOver => run_start_over(&portal),
        Command::AdminSession(args) => run_admin_session(args),
        Command::Admin(args) => run_admin(&portal, args).await,
    }
}
