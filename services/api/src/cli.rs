use crate::commands::{run_check, run_export, CheckArgs, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use madison_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Madison Law Group intake",
    about = "Serve and administer the case-inquiry intake API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Administrative tools for stored inquiries
    Inquiries {
        #[command(subcommand)]
        command: InquiriesCommand,
    },
}

#[derive(Subcommand, Debug)]
enum InquiriesCommand {
    /// Write every stored inquiry from a SQLite store to stdout
    Export(ExportArgs),
    /// Validate an inquiry payload file against the intake rules
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Inquiries {
            command: InquiriesCommand::Export(args),
        } => run_export(args),
        Command::Inquiries {
            command: InquiriesCommand::Check(args),
        } => run_check(args),
    }
}
