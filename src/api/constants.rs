//! API constants and endpoint builders for the contacts REST API

use std::time::Duration;

/// Transport-level timeout applied to every request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection establishment timeout
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("contacts-cli/", env!("CARGO_PKG_VERSION"));

/// Base path for contact resources
pub const CONTACTS_PATH: &str = "/contacts";

/// Multipart form field carrying the uploaded CSV
pub const IMPORT_FILE_FIELD: &str = "file";

/// Standard headers
pub mod headers {
    /// Content type of an uploaded import file
    pub const CONTENT_TYPE_CSV: &str = "text/csv";

    /// Correlation id attached to each request
    pub const REQUEST_ID: &str = "X-Request-Id";
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// `{base}/contacts`
pub fn contacts_endpoint(base_url: &str) -> String {
    format!("{}{}", trim_base(base_url), CONTACTS_PATH)
}

/// `{base}/contacts/{id}`
pub fn contact_endpoint(base_url: &str, id: &str) -> String {
    format!(
        "{}{}/{}",
        trim_base(base_url),
        CONTACTS_PATH,
        urlencoding::encode(id)
    )
}

/// `{base}/contacts/import/prepare`
pub fn import_prepare_endpoint(base_url: &str) -> String {
    format!("{}{}/import/prepare", trim_base(base_url), CONTACTS_PATH)
}

/// `{base}/contacts/import/commit`
pub fn import_commit_endpoint(base_url: &str) -> String {
    format!("{}{}/import/commit", trim_base(base_url), CONTACTS_PATH)
}

/// `{base}/contacts/export`
pub fn export_endpoint(base_url: &str) -> String {
    format!("{}{}/export", trim_base(base_url), CONTACTS_PATH)
}

/// `{base}/contacts/stats`
pub fn stats_endpoint(base_url: &str) -> String {
    format!("{}{}/stats", trim_base(base_url), CONTACTS_PATH)
}
