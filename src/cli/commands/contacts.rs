use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use colored::*;
use log::info;
use std::path::PathBuf;

use crate::api::{ConsentState, ContactQuery, ContactUpdate, ExportFormat, NewContact};
use crate::config::Config;
use crate::ui::prompts::prompt_delete_confirmation;
use crate::ui::table::{print_contact, print_stats, render_contacts, write_contacts_csv};
use crate::ui::with_spinner;

#[derive(Args)]
pub struct ContactsCommands {
    #[command(subcommand)]
    pub command: ContactsSubcommands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum ContactsSubcommands {
    /// List contacts
    List {
        /// Match name, email or phone
        #[arg(short, long)]
        search: Option<String>,
        /// Only contacts with this tag
        #[arg(short, long)]
        tag: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 25)]
        limit: u32,
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show one contact
    Get {
        id: String,
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a contact
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Date of the last job (YYYY-MM-DD)
        #[arg(long)]
        last_job_date: Option<NaiveDate>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        /// yes, no or unknown
        #[arg(long, default_value = "unknown")]
        sms_consent: ConsentState,
        /// yes, no or unknown
        #[arg(long, default_value = "unknown")]
        email_consent: ConsentState,
    },
    /// Update fields of a contact; omitted fields are left as they are
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        last_job_date: Option<NaiveDate>,
        /// Replace all tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
        /// yes, no or unknown
        #[arg(long)]
        sms_consent: Option<ConsentState>,
        /// yes, no or unknown
        #[arg(long)]
        email_consent: Option<ConsentState>,
    },
    /// Delete a contact
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Export all contacts
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// csv or json
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
    },
    /// Show contact counters
    Stats,
}

pub async fn handle_contacts_command(args: ContactsCommands) -> Result<()> {
    let config = Config::load()?;
    let client = config.build_client()?;

    match args.command {
        ContactsSubcommands::List { search, tag, page, limit, format } => {
            let query = ContactQuery { page, limit, search, tag };
            let result = with_spinner("Loading contacts...", client.list_contacts(&query))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&result.contacts)?);
                }
                OutputFormat::Csv => {
                    write_contacts_csv(std::io::stdout().lock(), &result.contacts)?;
                }
                OutputFormat::Table => {
                    if result.contacts.is_empty() {
                        println!("No contacts found.");
                    } else {
                        print!("{}", render_contacts(&result.contacts));
                        println!(
                            "{}",
                            format!(
                                "Page {} of {} ({} contacts)",
                                result.page,
                                result.total_pages.max(1),
                                result.total
                            )
                            .dimmed()
                        );
                    }
                }
            }
        }
        ContactsSubcommands::Get { id, json } => {
            let contact = client
                .get_contact(&id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&contact)?);
            } else {
                print_contact(&contact);
            }
        }
        ContactsSubcommands::Create {
            name,
            email,
            phone,
            last_job_date,
            tags,
            sms_consent,
            email_consent,
        } => {
            let name = name.trim().to_string();
            if name.is_empty() {
                anyhow::bail!("Name is required");
            }
            let new_contact = NewContact {
                name,
                email,
                phone,
                last_job_date,
                tags: clean_tags(tags),
                sms_consent,
                email_consent,
            };
            let contact = client
                .create_contact(&new_contact)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{} Created contact {}", "✓".green().bold(), contact.id);
        }
        ContactsSubcommands::Update {
            id,
            name,
            email,
            phone,
            last_job_date,
            tags,
            sms_consent,
            email_consent,
        } => {
            let update = ContactUpdate {
                name,
                email,
                phone,
                last_job_date,
                tags: tags.map(clean_tags),
                sms_consent,
                email_consent,
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to update. Pass at least one field to change.");
            }
            let contact = client
                .update_contact(&id, &update)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{} Updated contact {}", "✓".green().bold(), contact.id);
        }
        ContactsSubcommands::Delete { id, force } => {
            if !force && !prompt_delete_confirmation(&id)? {
                println!("Deletion cancelled.");
                return Ok(());
            }
            client
                .delete_contact(&id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{} Deleted contact {}", "✓".green().bold(), id);
        }
        ContactsSubcommands::Export { output, format } => {
            let bytes = with_spinner("Exporting contacts...", client.export_contacts(format))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Exported {} bytes to {}", bytes.len(), path.display());
                    println!("{} Exported contacts to {}", "✓".green().bold(), path.display());
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&bytes)?;
                }
            }
        }
        ContactsSubcommands::Stats => {
            let stats = client
                .contact_stats()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            print_stats(&stats);
        }
    }

    Ok(())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}
