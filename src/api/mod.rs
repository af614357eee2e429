//! Contacts REST API module
//!
//! Thin client over the contacts backend: the two-phase import protocol
//! (prepare, then commit) plus the plain CRUD, export and stats calls.

pub mod auth;
pub mod client;
pub mod constants;
pub mod contacts;
pub mod errors;
pub mod models;

pub use auth::{CredentialProvider, EnvToken, NoCredentials, StaticToken};
pub use client::ApiClient;
pub use errors::ApiError;
pub use models::{
    CommitRequest, CommitResult, ConsentState, Contact, ContactPage, ContactQuery, ContactStats,
    ContactUpdate, ExportFormat, NewContact, PreparedImport, RowError,
};
