use anyhow::{Context, Result};
use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::config::Config;
use crate::import::{MAX_UPLOAD_BYTES, SelectedFile, auto_map, parse_preview};
use crate::ui::table::{print_mapping, print_preview, print_samples};

#[derive(Args)]
pub struct PreviewArgs {
    /// CSV file to inspect
    pub file: PathBuf,
    /// Number of data rows to show (defaults to the preview-rows setting)
    #[arg(short, long)]
    pub rows: Option<usize>,
}

/// Parse the file locally and show the suggested mapping; nothing is uploaded
pub async fn handle_preview_command(args: PreviewArgs) -> Result<()> {
    let config = Config::load()?;
    let rows = args.rows.unwrap_or(config.settings.preview_rows);
    info!("Previewing {} ({} rows)", args.file.display(), rows);

    let file = SelectedFile::from_path(&args.file)
        .await
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    file.validate(MAX_UPLOAD_BYTES)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    let text = file
        .read_text()
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let preview = parse_preview(&text, rows).context("Could not read the CSV file")?;

    let data_lines = text.lines().skip(1).filter(|l| !l.trim().is_empty()).count();
    print_preview(&preview.headers, &preview.rows, data_lines as u64);

    print_samples(&preview);

    let mapping = auto_map(&preview.headers);
    print_mapping(&preview.headers, &mapping);

    Ok(())
}
