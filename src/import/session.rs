use serde::{Deserialize, Serialize};
use std::fmt;

use super::file::SelectedFile;
use super::mapping::ColumnMapping;
use crate::api::CommitResult;

/// Where an import currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    Upload,
    Map,
    Commit,
}

impl fmt::Display for ImportStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportStep::Upload => "upload",
            ImportStep::Map => "map",
            ImportStep::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// How the server should treat rows during commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    pub skip_duplicates: bool,
    pub update_existing: bool,
    pub skip_empty_rows: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
            update_existing: false,
            skip_empty_rows: true,
        }
    }
}

/// State of one import, from accepted upload to commit result
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub(crate) step: ImportStep,
    pub(crate) file: SelectedFile,
    pub(crate) import_id: String,
    pub(crate) total_rows: u64,
    pub(crate) headers: Vec<String>,
    pub(crate) preview_rows: Vec<Vec<String>>,
    pub(crate) mapping: ColumnMapping,
    pub(crate) options: ImportOptions,
    pub(crate) error: Option<String>,
    pub(crate) result: Option<CommitResult>,
}

impl ImportSession {
    pub fn step(&self) -> ImportStep {
        self.step
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    /// Opaque handle assigned by the server during prepare
    pub fn import_id(&self) -> &str {
        &self.import_id
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn preview_rows(&self) -> &[Vec<String>] {
        &self.preview_rows
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&CommitResult> {
        self.result.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }
}
