//! `import` command: upload, review the mapping, commit

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use is_terminal::IsTerminal;
use log::{error, info};
use std::path::PathBuf;

use crate::config::Config;
use crate::import::{FieldKey, ImportApi, ImportError, ImportOptions, ImportWorkflow, SelectedFile};
use crate::ui::prompts::{self, MappingAction};
use crate::ui::table::{print_commit_result, print_mapping, print_options, print_preview};
use crate::ui::with_spinner;

#[derive(Args)]
pub struct ImportArgs {
    /// CSV file to import (max 10 MB)
    pub file: PathBuf,
    /// Override a column mapping, e.g. --map "Customer=name" or --map 3=none
    #[arg(long = "map", value_name = "COLUMN=FIELD")]
    pub map: Vec<String>,
    /// Update contacts that already exist instead of skipping them
    #[arg(long)]
    pub update_existing: bool,
    /// Import rows even when they duplicate an existing contact
    #[arg(long)]
    pub keep_duplicates: bool,
    /// Keep rows that have no values
    #[arg(long)]
    pub keep_empty_rows: bool,
    /// Don't ask questions; commit the suggested mapping
    #[arg(short, long)]
    pub yes: bool,
}

impl ImportArgs {
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            skip_duplicates: !self.keep_duplicates,
            update_existing: self.update_existing,
            skip_empty_rows: !self.keep_empty_rows,
        }
    }
}

/// Parse a `COLUMN=FIELD` override.
///
/// COLUMN is a header name (case-insensitive) or a 1-based column number.
/// FIELD is a field key, or `none` to leave the column out.
pub fn parse_mapping_override(spec: &str, headers: &[String]) -> Result<(usize, Option<FieldKey>)> {
    let (column_part, field_part) = spec
        .rsplit_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid mapping '{}'. Expected COLUMN=FIELD.", spec))?;

    let column_part = column_part.trim();
    let column = match headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column_part))
    {
        Some(column) => column,
        None => {
            let number: usize = column_part.parse().map_err(|_| {
                anyhow::anyhow!("Unknown column '{}'. Use a header name or a column number.", column_part)
            })?;
            if number == 0 || number > headers.len() {
                anyhow::bail!(
                    "Column number {} is out of range (file has {} columns)",
                    number,
                    headers.len()
                );
            }
            number - 1
        }
    };

    let field_part = field_part.trim();
    let field = match field_part.to_lowercase().as_str() {
        "none" | "skip" | "-" | "" => None,
        _ => Some(field_part.parse::<FieldKey>().map_err(|e| anyhow::anyhow!(e))?),
    };

    Ok((column, field))
}

fn apply_overrides<A: ImportApi>(workflow: &mut ImportWorkflow<A>, specs: &[String]) -> Result<()> {
    if specs.is_empty() {
        return Ok(());
    }

    let headers = workflow
        .session()
        .context("No import in progress")?
        .headers()
        .to_vec();

    for spec in specs {
        let (column, field) = parse_mapping_override(spec, &headers)?;
        match field {
            Some(field) => {
                workflow.assign_field(column, field)?;
            }
            None => {
                workflow.unassign_column(column)?;
            }
        }
    }
    Ok(())
}

enum Review {
    Commit,
    Cancel,
}

fn review_mapping<A: ImportApi>(workflow: &mut ImportWorkflow<A>) -> Result<Review> {
    loop {
        let session = workflow.session().context("No import in progress")?;
        let headers = session.headers().to_vec();
        let mapping = session.mapping().clone();
        let options = *session.options();

        match prompts::prompt_mapping_action(mapping.is_complete())? {
            MappingAction::Commit => return Ok(Review::Commit),
            MappingAction::Cancel => return Ok(Review::Cancel),
            MappingAction::EditColumn => {
                let column = prompts::prompt_column(&headers, &mapping)?;
                match prompts::prompt_field(&headers[column], mapping.get(column))? {
                    Some(field) => {
                        if let Some(previous) = workflow.assign_field(column, field)? {
                            println!(
                                "{} moved from '{}' to '{}'",
                                field.label(),
                                headers[previous],
                                headers[column]
                            );
                        }
                    }
                    None => {
                        workflow.unassign_column(column)?;
                    }
                }
            }
            MappingAction::EditOptions => {
                let options = prompts::prompt_options(&options)?;
                workflow.set_options(options)?;
            }
        }

        if let Some(session) = workflow.session() {
            print_mapping(session.headers(), session.mapping());
        }
    }
}

pub async fn handle_import_command(args: ImportArgs) -> Result<()> {
    info!("Importing contacts from {}", args.file.display());

    let config = Config::load()?;
    let client = config.build_client()?;
    let mut workflow = ImportWorkflow::new(client).with_preview_rows(config.settings.preview_rows);

    let file = SelectedFile::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let upload = with_spinner(
        format!("Uploading {}...", file.name()),
        workflow.upload(file),
    )
    .await;
    if let Err(e) = upload {
        error!("Upload failed: {}", e);
        anyhow::bail!("{}", e.user_message());
    }

    if let Some(session) = workflow.session() {
        print_preview(session.headers(), session.preview_rows(), session.total_rows());
    }

    apply_overrides(&mut workflow, &args.map)?;
    workflow.set_options(args.options())?;

    let interactive = !args.yes && std::io::stdin().is_terminal();

    loop {
        if let Some(session) = workflow.session() {
            print_mapping(session.headers(), session.mapping());
            print_options(session.options());
        }

        if interactive {
            if let Review::Cancel = review_mapping(&mut workflow)? {
                workflow.reset();
                println!("Import cancelled.");
                return Ok(());
            }
        }

        match with_spinner("Importing contacts...", workflow.commit()).await {
            Ok(result) => {
                print_commit_result(&result);
                workflow.reset();
                return Ok(());
            }
            Err(e) => {
                println!("{} {}", "✗".red().bold(), e.user_message());

                let retry = interactive
                    && (matches!(e, ImportError::MissingRequiredField(_))
                        || prompts::prompt_retry_confirmation()?);
                if retry {
                    continue;
                }

                workflow.reset();
                anyhow::bail!("Import failed: {}", e.user_message());
            }
        }
    }
}
