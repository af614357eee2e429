//! Wire types for the contacts REST API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::import::{ColumnMapping, ImportOptions};

/// Tri-state consent: granted, denied, or not known.
///
/// Serialized as `true` / `false` / `null`. Unknown is never the same as denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum ConsentState {
    Granted,
    Denied,
    #[default]
    Unknown,
}

impl ConsentState {
    pub fn grant(&mut self) {
        *self = ConsentState::Granted;
    }

    pub fn deny(&mut self) {
        *self = ConsentState::Denied;
    }

    pub fn clear(&mut self) {
        *self = ConsentState::Unknown;
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ConsentState::Unknown)
    }

    pub fn as_option(&self) -> Option<bool> {
        (*self).into()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConsentState::Granted => "yes",
            ConsentState::Denied => "no",
            ConsentState::Unknown => "unknown",
        }
    }
}

impl From<Option<bool>> for ConsentState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => ConsentState::Granted,
            Some(false) => ConsentState::Denied,
            None => ConsentState::Unknown,
        }
    }
}

impl From<ConsentState> for Option<bool> {
    fn from(state: ConsentState) -> Self {
        match state {
            ConsentState::Granted => Some(true),
            ConsentState::Denied => Some(false),
            ConsentState::Unknown => None,
        }
    }
}

impl FromStr for ConsentState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" | "1" | "granted" | "opt-in" | "optin" => Ok(ConsentState::Granted),
            "no" | "n" | "false" | "0" | "denied" | "opt-out" | "optout" => Ok(ConsentState::Denied),
            "unknown" | "" | "null" | "none" | "-" => Ok(ConsentState::Unknown),
            other => Err(format!(
                "Invalid consent value '{}'. Use yes, no, or unknown.",
                other
            )),
        }
    }
}

impl fmt::Display for ConsentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub last_job_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sms_consent: ConsentState,
    #[serde(default)]
    pub email_consent: ConsentState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a create request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_job_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub sms_consent: ConsentState,
    pub email_consent: ConsentState,
}

/// Partial update; absent fields are left untouched server-side.
///
/// Consent fields use a nested option so "set to unknown" (`Some(Unknown)`,
/// sent as `null`) stays distinct from "leave alone" (`None`, omitted).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_job_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_consent: Option<ConsentState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_consent: Option<ConsentState>,
}

impl ContactUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ContactUpdate::default()
    }
}

/// Filters and paging for the contact list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Default for ContactQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 25,
            search: None,
            tag: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

/// Dashboard counters for the contact base
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactStats {
    pub total_contacts: u64,
    pub with_email: u64,
    pub with_phone: u64,
    pub sms_consented: u64,
    pub email_consented: u64,
    pub added_this_month: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unsupported export format '{}'. Use csv or json.", other)),
        }
    }
}

/// Response of the prepare phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedImport {
    pub import_id: String,
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub headers: Vec<String>,
}

/// Body of the commit phase
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub import_id: String,
    pub mapping: ColumnMapping,
    pub options: ImportOptions,
}

/// A row the server refused during commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub row: u64,
    pub message: String,
}

/// Summary returned by the commit phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitResult {
    #[serde(default)]
    pub inserted_count: u64,
    #[serde(default)]
    pub updated_count: u64,
    #[serde(default)]
    pub skipped_count: u64,
    #[serde(default)]
    pub errors: Vec<RowError>,
}

impl CommitResult {
    pub fn processed(&self) -> u64 {
        self.inserted_count + self.updated_count + self.skipped_count
    }
}
