//! CSV preview parser
//!
//! Produces a quick header/rows view of an upload for display while the
//! server does the authoritative parse. Quoting mistakes are tolerated; the
//! only hard failure is input without a header line.

use thiserror::Error;

/// Number of data rows shown in a preview unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreviewError {
    #[error("the file is empty or has no header line")]
    NoHeader,
}

/// Headers plus the first few data rows, every row as wide as the header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvPreview {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Sample values of one column, in row order
    pub fn column_samples(&self, column: usize) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// Parse the header and up to `max_rows` non-blank data rows
pub fn parse_preview(text: &str, max_rows: usize) -> Result<CsvPreview, PreviewError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.lines();

    let header_line = lines.next().ok_or(PreviewError::NoHeader)?;
    if header_line.trim().is_empty() {
        return Err(PreviewError::NoHeader);
    }

    let headers = parse_line(header_line);
    let width = headers.len();

    let rows = lines
        .filter(|line| !line.trim().is_empty())
        .take(max_rows)
        .map(|line| {
            let mut row = parse_line(line);
            row.resize(width, String::new());
            row
        })
        .collect();

    Ok(CsvPreview { headers, rows })
}

/// Split one CSV line into trimmed fields.
///
/// `"` toggles quoting, `""` inside quotes is a literal quote, and commas
/// only separate fields outside quotes.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}
