use crate::demo::{run_demo, run_roster, DemoArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use workforce_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Workforce AI",
    about = "Run the HR administration service or explore its data from the command line",
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
    /// Print the employee table from a CSV export or the bundled data
    Roster(RosterArgs),
    /// Walk through deadlines, leave, attrition and reviews on the bundled data
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load the initial workforce snapshot from a JSON file instead of the bundled data
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Roster(args) => run_roster(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
