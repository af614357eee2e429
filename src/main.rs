use anyhow::Result;
use clap::Parser;
use log::info;

use contacts_cli::cli::commands::{
    handle_contacts_command, handle_import_command, handle_preview_command,
    handle_settings_command,
};
use contacts_cli::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to file (truncated on each run) so output stays clean
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("contacts-cli.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    info!("Starting contacts-cli");

    match cli.command {
        Commands::Import(args) => handle_import_command(args).await,
        Commands::Preview(args) => handle_preview_command(args).await,
        Commands::Contacts(args) => handle_contacts_command(args).await,
        Commands::Settings(args) => handle_settings_command(args).await,
    }
}
