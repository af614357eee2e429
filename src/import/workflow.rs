//! Import workflow controller
//!
//! Drives one import through `Upload → Map → Commit`:
//!
//! - **Upload**: the file is checked locally, then sent to the server's
//!   prepare call while the same file is parsed locally for a preview. Both
//!   must succeed before the session exists.
//! - **Map**: the user adjusts the suggested column mapping and options.
//!   Commit is refused until every required field is mapped.
//! - **Commit**: the mapping is sent with the prepared import id. Failure
//!   drops back to Map with everything intact so the user can retry.
//!
//! Each network phase is split into `begin_*` / ticket `run` / `finish_*` so
//! an event-driven caller can keep handling input while a request is in
//! flight. While one is outstanding every other action answers
//! [`ImportError::Busy`]. [`ImportWorkflow::reset`] invalidates outstanding
//! tickets, so late results from a closed session are dropped.

use async_trait::async_trait;
use log::{debug, info, warn};

use super::errors::ImportError;
use super::fields::{FieldKey, auto_map};
use super::file::{MAX_UPLOAD_BYTES, SelectedFile};
use super::preview::{CsvPreview, DEFAULT_PREVIEW_ROWS, parse_preview};
use super::session::{ImportOptions, ImportSession, ImportStep};
use crate::api::{ApiError, CommitRequest, CommitResult, PreparedImport};

/// Server side of the two-phase import protocol
#[async_trait]
pub trait ImportApi: Send + Sync {
    /// Stage a file; returns an opaque import id plus the server's view of it
    async fn prepare_import(&self, file: &SelectedFile) -> Result<PreparedImport, ApiError>;

    /// Finalize a staged import with the confirmed mapping
    async fn commit_import(&self, request: &CommitRequest) -> Result<CommitResult, ApiError>;
}

/// An accepted upload waiting for its prepare call and local parse
#[derive(Debug)]
pub struct UploadTicket {
    generation: u64,
    file: SelectedFile,
    preview_rows: usize,
}

impl UploadTicket {
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    /// Run the remote prepare and the local preview parse concurrently
    pub async fn run<A: ImportApi + ?Sized>(self, api: &A) -> UploadOutcome {
        let (prepared, preview) = tokio::join!(
            api.prepare_import(&self.file),
            read_preview(&self.file, self.preview_rows)
        );

        UploadOutcome {
            generation: self.generation,
            file: self.file,
            prepared,
            preview,
        }
    }
}

#[derive(Debug)]
pub struct UploadOutcome {
    generation: u64,
    file: SelectedFile,
    prepared: Result<PreparedImport, ApiError>,
    preview: Result<CsvPreview, ImportError>,
}

/// A validated mapping waiting to be committed
#[derive(Debug)]
pub struct CommitTicket {
    generation: u64,
    request: CommitRequest,
}

impl CommitTicket {
    pub fn request(&self) -> &CommitRequest {
        &self.request
    }

    pub async fn run<A: ImportApi + ?Sized>(self, api: &A) -> CommitOutcome {
        let result = api.commit_import(&self.request).await;
        CommitOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct CommitOutcome {
    generation: u64,
    result: Result<CommitResult, ApiError>,
}

async fn read_preview(file: &SelectedFile, max_rows: usize) -> Result<CsvPreview, ImportError> {
    let text = file
        .read_text()
        .await
        .map_err(|e| ImportError::Read(e.to_string()))?;
    Ok(parse_preview(&text, max_rows)?)
}

/// Controller for one import at a time
pub struct ImportWorkflow<A: ImportApi> {
    api: A,
    preview_rows: usize,
    session: Option<ImportSession>,
    processing: bool,
    generation: u64,
    upload_error: Option<String>,
}

impl<A: ImportApi> ImportWorkflow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            session: None,
            processing: false,
            generation: 0,
            upload_error: None,
        }
    }

    /// Number of data rows kept for preview
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> Option<&ImportSession> {
        self.session.as_ref()
    }

    pub fn step(&self) -> ImportStep {
        self.session
            .as_ref()
            .map(|s| s.step)
            .unwrap_or(ImportStep::Upload)
    }

    /// A request is outstanding; conflicting actions are refused
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Message to show for the most recent failure, if any
    pub fn error(&self) -> Option<&str> {
        match &self.session {
            Some(session) => session.error(),
            None => self.upload_error.as_deref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_complete())
    }

    /// Discard the session, whatever state it is in
    pub fn reset(&mut self) {
        if self.processing {
            debug!("Reset while a request is outstanding; its result will be dropped");
        }
        self.session = None;
        self.processing = false;
        self.upload_error = None;
        self.generation = self.generation.wrapping_add(1);
        info!("Import workflow reset");
    }

    /// Accept a file for upload after local type and size checks
    pub fn begin_upload(&mut self, file: SelectedFile) -> Result<UploadTicket, ImportError> {
        if self.processing {
            return Err(ImportError::Busy);
        }
        if let Some(session) = &self.session {
            return Err(ImportError::InvalidStep {
                expected: ImportStep::Upload,
                actual: session.step,
            });
        }

        if let Err(e) = file.validate(MAX_UPLOAD_BYTES) {
            warn!("Rejected {}: {}", file.name(), e);
            self.upload_error = Some(e.user_message());
            return Err(e);
        }

        info!("Uploading {} ({} bytes)", file.name(), file.size());
        self.upload_error = None;
        self.processing = true;

        Ok(UploadTicket {
            generation: self.generation,
            file,
            preview_rows: self.preview_rows,
        })
    }

    /// Apply the result of an upload; creates the session on success
    pub fn finish_upload(&mut self, outcome: UploadOutcome) -> Result<(), ImportError> {
        if outcome.generation != self.generation {
            debug!("Dropping upload result for {} from a closed session", outcome.file.name());
            return Err(ImportError::SessionReset);
        }
        self.processing = false;

        let prepared = match outcome.prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!("Prepare failed for {}: {}", outcome.file.name(), e);
                self.upload_error = Some(e.user_message());
                return Err(ImportError::Api(e));
            }
        };

        let preview = match outcome.preview {
            Ok(preview) => preview,
            Err(e) => {
                warn!("Local preview failed for {}: {}", outcome.file.name(), e);
                self.upload_error = Some(e.user_message());
                return Err(e);
            }
        };

        let headers = if prepared.headers.is_empty() {
            preview.headers
        } else {
            prepared.headers
        };

        let width = headers.len();
        let preview_rows = preview
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let mapping = auto_map(&headers);
        info!(
            "Import {} ready for mapping: {} columns, {} rows, {} columns auto-mapped",
            prepared.import_id,
            width,
            prepared.total_rows,
            mapping.len()
        );

        self.upload_error = None;
        self.session = Some(ImportSession {
            step: ImportStep::Map,
            file: outcome.file,
            import_id: prepared.import_id,
            total_rows: prepared.total_rows,
            headers,
            preview_rows,
            mapping,
            options: ImportOptions::default(),
            error: None,
            result: None,
        });

        Ok(())
    }

    /// Upload and wait for the session to be ready
    pub async fn upload(&mut self, file: SelectedFile) -> Result<(), ImportError> {
        let ticket = self.begin_upload(file)?;
        let outcome = ticket.run(&self.api).await;
        self.finish_upload(outcome)
    }

    fn mapping_session(&mut self) -> Result<&mut ImportSession, ImportError> {
        if self.processing {
            return Err(ImportError::Busy);
        }
        let session = self.session.as_mut().ok_or(ImportError::NoSession)?;
        if session.step != ImportStep::Map {
            return Err(ImportError::InvalidStep {
                expected: ImportStep::Map,
                actual: session.step,
            });
        }
        Ok(session)
    }

    /// Map `column` to `field`; any other column holding `field` is cleared.
    ///
    /// Returns the column that lost the field, if any.
    pub fn assign_field(&mut self, column: usize, field: FieldKey) -> Result<Option<usize>, ImportError> {
        let session = self.mapping_session()?;
        let width = session.headers.len();
        if column >= width {
            return Err(ImportError::ColumnOutOfRange { column, width });
        }

        let previous = session.mapping.assign(column, field);
        if let Some(previous) = previous {
            debug!("{} moved from column {} to column {}", field, previous, column);
        }
        Ok(previous)
    }

    pub fn unassign_column(&mut self, column: usize) -> Result<Option<FieldKey>, ImportError> {
        let session = self.mapping_session()?;
        Ok(session.mapping.unassign(column))
    }

    pub fn set_options(&mut self, options: ImportOptions) -> Result<(), ImportError> {
        let session = self.mapping_session()?;
        session.options = options;
        Ok(())
    }

    /// Check that every required field is mapped
    pub fn validate(&self) -> Result<(), ImportError> {
        let session = self.session.as_ref().ok_or(ImportError::NoSession)?;
        match session.mapping.missing_required().first() {
            Some(missing) => Err(ImportError::MissingRequiredField(missing.label)),
            None => Ok(()),
        }
    }

    /// Validate and move to Commit; nothing is sent if validation fails
    pub fn begin_commit(&mut self) -> Result<CommitTicket, ImportError> {
        self.mapping_session()?;

        if let Err(e) = self.validate() {
            warn!("Commit blocked: {}", e);
            if let Some(session) = self.session.as_mut() {
                session.error = Some(e.user_message());
            }
            return Err(e);
        }

        let session = self.session.as_mut().ok_or(ImportError::NoSession)?;
        session.step = ImportStep::Commit;
        session.error = None;
        self.processing = true;

        info!("Committing import {}", session.import_id);
        Ok(CommitTicket {
            generation: self.generation,
            request: CommitRequest {
                import_id: session.import_id.clone(),
                mapping: session.mapping.clone(),
                options: session.options,
            },
        })
    }

    /// Apply the commit result; failure returns to Map with mapping and options kept
    pub fn finish_commit(&mut self, outcome: CommitOutcome) -> Result<CommitResult, ImportError> {
        if outcome.generation != self.generation {
            debug!("Dropping commit result from a closed session");
            return Err(ImportError::SessionReset);
        }
        self.processing = false;

        let session = self.session.as_mut().ok_or(ImportError::NoSession)?;
        match outcome.result {
            Ok(result) => {
                info!(
                    "Import {} complete: {} inserted, {} updated, {} skipped",
                    session.import_id, result.inserted_count, result.updated_count, result.skipped_count
                );
                session.result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                warn!("Commit of import {} failed: {}", session.import_id, e);
                session.step = ImportStep::Map;
                session.error = Some(e.user_message());
                Err(ImportError::Api(e))
            }
        }
    }

    /// Validate, commit and wait for the result
    pub async fn commit(&mut self) -> Result<CommitResult, ImportError> {
        let ticket = self.begin_commit()?;
        let outcome = ticket.run(&self.api).await;
        self.finish_commit(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedApi {
        prepare: Mutex<Vec<Result<PreparedImport, ApiError>>>,
        commit: Mutex<Vec<Result<CommitResult, ApiError>>>,
    }

    #[async_trait]
    impl ImportApi for ScriptedApi {
        async fn prepare_import(&self, _file: &SelectedFile) -> Result<PreparedImport, ApiError> {
            self.prepare.lock().unwrap().remove(0)
        }

        async fn commit_import(&self, _request: &CommitRequest) -> Result<CommitResult, ApiError> {
            self.commit.lock().unwrap().remove(0)
        }
    }

    fn prepared(headers: &[&str]) -> PreparedImport {
        PreparedImport {
            import_id: "imp-1".to_string(),
            total_rows: 2,
            headers: headers.iter().map(|h| h.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_local_headers_used_when_server_sends_none() {
        let api = ScriptedApi::default();
        api.prepare.lock().unwrap().push(Ok(prepared(&[])));

        let mut workflow = ImportWorkflow::new(api);
        let file = SelectedFile::from_bytes("c.csv", "Customer,Mobile\nAnn,555\n");
        workflow.upload(file).await.unwrap();

        let session = workflow.session().unwrap();
        assert_eq!(session.headers(), ["Customer", "Mobile"]);
        assert_eq!(session.mapping().get(0), Some(FieldKey::Name));
        assert_eq!(session.mapping().get(1), Some(FieldKey::Phone));
    }

    #[tokio::test]
    async fn test_preview_rows_follow_server_header_width() {
        let api = ScriptedApi::default();
        api.prepare.lock().unwrap().push(Ok(prepared(&["Name", "Email", "Phone"])));

        let mut workflow = ImportWorkflow::new(api);
        let file = SelectedFile::from_bytes("c.csv", "Name,Email\nAnn,a@x.com\n");
        workflow.upload(file).await.unwrap();

        let session = workflow.session().unwrap();
        assert_eq!(session.preview_rows()[0], vec!["Ann", "a@x.com", ""]);
    }

    #[tokio::test]
    async fn test_assign_rejects_unknown_column() {
        let api = ScriptedApi::default();
        api.prepare.lock().unwrap().push(Ok(prepared(&["Name"])));

        let mut workflow = ImportWorkflow::new(api);
        workflow
            .upload(SelectedFile::from_bytes("c.csv", "Name\nAnn\n"))
            .await
            .unwrap();

        assert_eq!(
            workflow.assign_field(3, FieldKey::Email),
            Err(ImportError::ColumnOutOfRange { column: 3, width: 1 })
        );
    }

    #[tokio::test]
    async fn test_actions_refused_while_processing() {
        let api = ScriptedApi::default();
        let mut workflow = ImportWorkflow::new(api);

        let _ticket = workflow
            .begin_upload(SelectedFile::from_bytes("c.csv", "Name\nAnn\n"))
            .unwrap();
        assert!(workflow.is_processing());

        let second = workflow.begin_upload(SelectedFile::from_bytes("d.csv", "Name\n"));
        assert_eq!(second.unwrap_err(), ImportError::Busy);
        assert_eq!(workflow.assign_field(0, FieldKey::Name), Err(ImportError::Busy));
    }
}
