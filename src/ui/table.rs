//! Plain-text rendering of previews, mappings and contact listings

use colored::*;
use std::io::Write;

use crate::api::{CommitResult, ConsentState, Contact, ContactStats};
use crate::import::{ColumnMapping, CsvPreview, ImportOptions};

const MAX_CELL_WIDTH: usize = 24;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Render rows as aligned columns, header first
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = std::iter::once(headers.to_vec())
        .chain(rows.iter().cloned())
        .map(|row| row.iter().map(|c| truncate(c, MAX_CELL_WIDTH)).collect())
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|column| {
            cells
                .iter()
                .filter_map(|row| row.get(column))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (index, row) in cells.iter().enumerate() {
        let line: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(column, width)| {
                let cell = row.get(column).map(String::as_str).unwrap_or("");
                format!("{:<width$}", cell, width = *width)
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');

        if index == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("  "));
            out.push('\n');
        }
    }
    out
}

pub fn print_preview(headers: &[String], rows: &[Vec<String>], total_rows: u64) {
    println!("{}", "Preview".bold());
    print!("{}", render_table(headers, rows));
    println!(
        "{}",
        format!("Showing {} of {} rows", rows.len(), total_rows).dimmed()
    );
    println!();
}

pub fn print_mapping(headers: &[String], mapping: &ColumnMapping) {
    println!("{}", "Column mapping".bold());
    for (column, header) in headers.iter().enumerate() {
        match mapping.get(column) {
            Some(field) => println!("  {:>2}. {} → {}", column + 1, header, field.label().green()),
            None => println!("  {:>2}. {} → {}", column + 1, header, "not imported".dimmed()),
        }
    }

    for missing in mapping.missing_required() {
        println!("  {} {} is required", "!".yellow().bold(), missing.label);
    }
    println!();
}

/// A few non-empty values per column, to help check the mapping
pub fn print_samples(preview: &CsvPreview) {
    println!("{}", "Sample values".bold());
    for column in 0..preview.column_count() {
        let samples = preview.column_samples(column);
        let shown = if samples.is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            samples
                .iter()
                .take(3)
                .map(|value| truncate(value, MAX_CELL_WIDTH))
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("  {:>2}. {}: {}", column + 1, preview.headers[column], shown);
    }
    println!();
}

pub fn print_options(options: &ImportOptions) {
    let flag = |on: bool| if on { "yes".green() } else { "no".dimmed() };
    println!("{}", "Options".bold());
    println!("  Skip duplicates:  {}", flag(options.skip_duplicates));
    println!("  Update existing:  {}", flag(options.update_existing));
    println!("  Skip empty rows:  {}", flag(options.skip_empty_rows));
    println!();
}

pub fn print_commit_result(result: &CommitResult) {
    println!("{} Import complete: {} rows processed", "✓".green().bold(), result.processed());
    println!("  Inserted: {}", result.inserted_count.to_string().green());
    println!("  Updated:  {}", result.updated_count.to_string().cyan());
    println!("  Skipped:  {}", result.skipped_count.to_string().yellow());

    if !result.errors.is_empty() {
        println!("\n{} rows were rejected:", result.errors.len());
        for error in result.errors.iter().take(10) {
            println!("  row {}: {}", error.row, error.message);
        }
        if result.errors.len() > 10 {
            println!("  … and {} more", result.errors.len() - 10);
        }
    }
}

fn contact_cells(contact: &Contact) -> Vec<String> {
    vec![
        contact.id.clone(),
        contact.name.clone(),
        contact.email.clone().unwrap_or_default(),
        contact.phone.clone().unwrap_or_default(),
        contact
            .last_job_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        contact.tags.join(";"),
        contact.sms_consent.label().to_string(),
        contact.email_consent.label().to_string(),
    ]
}

const CONTACT_HEADERS: [&str; 8] = [
    "id",
    "name",
    "email",
    "phone",
    "last_job_date",
    "tags",
    "sms_consent",
    "email_consent",
];

pub fn render_contacts(contacts: &[Contact]) -> String {
    let headers: Vec<String> = CONTACT_HEADERS.iter().map(|h| h.to_string()).collect();
    let rows: Vec<Vec<String>> = contacts.iter().map(contact_cells).collect();
    render_table(&headers, &rows)
}

/// Write contacts as CSV; unknown consent is written as an empty cell
pub fn write_contacts_csv<W: Write>(writer: W, contacts: &[Contact]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CONTACT_HEADERS)?;

    for contact in contacts {
        let mut cells = contact_cells(contact);
        cells[6] = consent_cell(contact.sms_consent.as_option());
        cells[7] = consent_cell(contact.email_consent.as_option());
        csv_writer.write_record(&cells)?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn consent_cell(value: Option<bool>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn print_contact(contact: &Contact) {
    println!("{}", contact.name.bold());
    println!("  ID:            {}", contact.id);
    println!("  Email:         {}", contact.email.as_deref().unwrap_or("-"));
    println!("  Phone:         {}", contact.phone.as_deref().unwrap_or("-"));
    println!(
        "  Last job:      {}",
        contact
            .last_job_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    if !contact.tags.is_empty() {
        println!("  Tags:          {}", contact.tags.join(", "));
    }
    println!("  SMS consent:   {}", consent_label(contact.sms_consent));
    println!("  Email consent: {}", consent_label(contact.email_consent));
}

fn consent_label(state: ConsentState) -> ColoredString {
    if state.is_known() {
        state.label().normal()
    } else {
        state.label().dimmed()
    }
}

pub fn print_stats(stats: &ContactStats) {
    println!("{}", "Contacts".bold());
    println!("  Total:            {}", stats.total_contacts);
    println!("  With email:       {}", stats.with_email);
    println!("  With phone:       {}", stats.with_phone);
    println!("  SMS consented:    {}", stats.sms_consented);
    println!("  Email consented:  {}", stats.email_consented);
    println!("  Added this month: {}", stats.added_this_month);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, sms: ConsentState) -> Contact {
        Contact {
            id: id.to_string(),
            name: "Ann Lee".to_string(),
            email: Some("ann@example.com".to_string()),
            phone: None,
            last_job_date: None,
            tags: vec!["vip".to_string(), "spring".to_string()],
            sms_consent: sms,
            email_consent: ConsentState::Unknown,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let headers = vec!["Name".to_string(), "Email".to_string()];
        let rows = vec![vec!["Jo".to_string(), "jo@x.com".to_string()]];
        let table = render_table(&headers, &rows);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Name  Email");
        assert_eq!(lines[1], "----  --------");
        assert_eq!(lines[2], "Jo    jo@x.com");
    }

    #[test]
    fn test_long_cells_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn test_csv_keeps_unknown_consent_empty() {
        let mut out = Vec::new();
        write_contacts_csv(
            &mut out,
            &[contact("c1", ConsentState::Denied), contact("c2", ConsentState::Unknown)],
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,name,email,phone,last_job_date,tags,sms_consent,email_consent");
        assert_eq!(lines[1], "c1,Ann Lee,ann@example.com,,,vip;spring,false,");
        assert_eq!(lines[2], "c2,Ann Lee,ann@example.com,,,vip;spring,,");
    }
}
