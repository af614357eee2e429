use anyhow::Result;
use dialoguer::{Input, MultiSelect, Password, Select};

use crate::import::{ColumnMapping, FIELDS, FieldKey, ImportOptions};

/// What the user wants to do next while reviewing a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingAction {
    Commit,
    EditColumn,
    EditOptions,
    Cancel,
}

/// Interactive confirmation prompt using arrow-key navigable selection
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = ["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}

pub fn prompt_delete_confirmation(contact_id: &str) -> Result<bool> {
    prompt_confirmation(&format!("Delete contact '{}'?", contact_id), false)
}

pub fn prompt_retry_confirmation() -> Result<bool> {
    prompt_confirmation("Import failed. Review the mapping and try again?", true)
}

pub fn prompt_mapping_action(ready: bool) -> Result<MappingAction> {
    let commit_label = if ready {
        "Import contacts"
    } else {
        "Import contacts (a required field is still unmapped)"
    };
    let items = [commit_label, "Change a column", "Change import options", "Cancel"];

    let selection = Select::new()
        .with_prompt("Next step")
        .items(&items)
        .default(if ready { 0 } else { 1 })
        .interact()?;

    Ok(match selection {
        0 => MappingAction::Commit,
        1 => MappingAction::EditColumn,
        2 => MappingAction::EditOptions,
        _ => MappingAction::Cancel,
    })
}

pub fn prompt_column(headers: &[String], mapping: &ColumnMapping) -> Result<usize> {
    let items: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(column, header)| match mapping.get(column) {
            Some(field) => format!("{} → {}", header, field.label()),
            None => format!("{} (not imported)", header),
        })
        .collect();

    Ok(Select::new()
        .with_prompt("Column")
        .items(&items)
        .default(0)
        .interact()?)
}

/// Pick a field for a column; `None` means leave the column out
pub fn prompt_field(header: &str, current: Option<FieldKey>) -> Result<Option<FieldKey>> {
    let mut items: Vec<String> = FIELDS
        .iter()
        .map(|d| {
            if d.required {
                format!("{} (required)", d.label)
            } else {
                d.label.to_string()
            }
        })
        .collect();
    items.push("Don't import".to_string());

    let default = current
        .and_then(|field| FIELDS.iter().position(|d| d.key == field))
        .unwrap_or(FIELDS.len());

    let selection = Select::new()
        .with_prompt(format!("Map '{}' to", header))
        .items(&items)
        .default(default)
        .interact()?;

    Ok(FIELDS.get(selection).map(|d| d.key))
}

pub fn prompt_options(current: &ImportOptions) -> Result<ImportOptions> {
    let items = [
        "Skip duplicate contacts",
        "Update existing contacts",
        "Skip empty rows",
    ];
    let defaults = [
        current.skip_duplicates,
        current.update_existing,
        current.skip_empty_rows,
    ];

    let chosen = MultiSelect::new()
        .with_prompt("Import options (space to toggle)")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    Ok(ImportOptions {
        skip_duplicates: chosen.contains(&0),
        update_existing: chosen.contains(&1),
        skip_empty_rows: chosen.contains(&2),
    })
}

pub fn prompt_api_token() -> Result<String> {
    Ok(Password::new().with_prompt("API token").interact()?)
}

/// Simple text input prompt with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<String> {
    let mut input_prompt = Input::<String>::new().with_prompt(prompt);

    if let Some(default_val) = default {
        input_prompt = input_prompt.default(default_val.to_string());
    }

    Ok(input_prompt.interact_text()?)
}
