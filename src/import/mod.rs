//! CSV contact import pipeline
//!
//! Local preview parsing, header auto-mapping and the prepare/commit
//! workflow that ties them to the server.

pub mod errors;
pub mod fields;
pub mod file;
pub mod mapping;
pub mod preview;
pub mod session;
pub mod workflow;

pub use errors::ImportError;
pub use fields::{FIELDS, FieldDescriptor, FieldKey, auto_map, match_header};
pub use file::{MAX_UPLOAD_BYTES, SelectedFile};
pub use mapping::ColumnMapping;
pub use preview::{CsvPreview, DEFAULT_PREVIEW_ROWS, PreviewError, parse_line, parse_preview};
pub use session::{ImportOptions, ImportSession, ImportStep};
pub use workflow::{CommitOutcome, CommitTicket, ImportApi, ImportWorkflow, UploadOutcome, UploadTicket};
