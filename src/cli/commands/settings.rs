use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use log::info;

use crate::api::auth::mask_token;
use crate::config::Config;
use crate::ui::prompts::{prompt_api_token, text_input};

#[derive(Args)]
pub struct SettingsCommands {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Show the current configuration
    Show,
    /// Change a setting: api-url, api-token, request-timeout, preview-rows
    Set {
        name: String,
        /// New value (prompted for when omitted)
        value: Option<String>,
    },
    /// Forget the stored API token
    ClearToken,
}

pub async fn handle_settings_command(args: SettingsCommands) -> Result<()> {
    match args.command {
        SettingsSubcommands::Show => show_command(),
        SettingsSubcommands::Set { name, value } => set_command(&name, value),
        SettingsSubcommands::ClearToken => {
            let mut config = Config::load()?;
            if config.clear_api_token() {
                config.save()?;
                println!("Stored API token removed.");
            } else {
                println!("No API token stored.");
            }
            Ok(())
        }
    }
}

fn show_command() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration".bold());
    println!("  Config file:     {}", Config::get_config_path()?.display());
    match config.resolved_api_url() {
        Ok(url) => println!("  API URL:         {}", url),
        Err(_) => println!("  API URL:         {}", "not set".yellow()),
    }
    println!(
        "  API token:       {}",
        config
            .api_token
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "not set".to_string())
    );
    println!("  Credentials:     {}", config.credential_provider().describe());
    println!("  Request timeout: {}s", config.settings.request_timeout_secs);
    println!("  Preview rows:    {}", config.settings.preview_rows);
    Ok(())
}

/// Set the value of a specific setting
fn set_command(name: &str, value: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    match name {
        "api-url" => {
            let value = match value {
                Some(value) => value,
                None => text_input("API URL", config.api_url.as_deref())?,
            };
            config.set_api_url(&value)?;
            println!("Set api-url to {}", config.api_url.as_deref().unwrap_or_default());
        }
        "api-token" => {
            let value = match value {
                Some(value) => value,
                None => prompt_api_token()?,
            };
            config.set_api_token(&value)?;
            println!("API token stored.");
        }
        "request-timeout" => {
            let secs: u64 = required(name, value)?.parse().map_err(|_| {
                anyhow::anyhow!("Invalid value for request-timeout. Must be a whole number of seconds.")
            })?;
            config.set_request_timeout(secs)?;
            println!("Set request-timeout to {}s", secs);
        }
        "preview-rows" => {
            let rows: usize = required(name, value)?.parse().map_err(|_| {
                anyhow::anyhow!("Invalid value for preview-rows. Must be a positive integer.")
            })?;
            config.set_preview_rows(rows)?;
            println!("Set preview-rows to {}", rows);
        }
        _ => {
            anyhow::bail!(
                "Unknown setting: {}. Known settings: api-url, api-token, request-timeout, preview-rows",
                name
            );
        }
    }

    info!("Updated setting {}", name);
    config.save()
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| anyhow::anyhow!("A value is required for {}", name))
}
