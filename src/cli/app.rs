use super::commands::contacts::ContactsCommands;
use super::commands::import::ImportArgs;
use super::commands::preview::PreviewArgs;
use super::commands::settings::SettingsCommands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "contacts-cli")]
#[command(about = "Manage contacts and import them from CSV files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import contacts from a CSV file
    Import(ImportArgs),
    /// Show how a CSV file would be read and mapped, without uploading it
    Preview(PreviewArgs),
    /// List, view and edit contacts
    Contacts(ContactsCommands),
    /// Show or change configuration
    Settings(SettingsCommands),
}
