//! Contact field catalog and the header auto-mapper

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::mapping::ColumnMapping;

/// Contact fields an import column can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Name,
    Email,
    Phone,
    LastJobDate,
    Tags,
    SmsConsent,
    EmailConsent,
}

impl FieldKey {
    /// Wire name, as the server expects it in a mapping
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::LastJobDate => "lastJobDate",
            FieldKey::Tags => "tags",
            FieldKey::SmsConsent => "smsConsent",
            FieldKey::EmailConsent => "emailConsent",
        }
    }

    pub fn descriptor(&self) -> &'static FieldDescriptor {
        FIELDS
            .iter()
            .find(|d| d.key == *self)
            .unwrap_or(&FIELDS[0])
    }

    pub fn label(&self) -> &'static str {
        self.descriptor().label
    }

    pub fn is_required(&self) -> bool {
        self.descriptor().required
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        FIELDS
            .iter()
            .find(|d| d.key.as_str().to_lowercase() == normalized)
            .map(|d| d.key)
            .ok_or_else(|| {
                let known: Vec<&str> = FIELDS.iter().map(|d| d.key.as_str()).collect();
                format!("Unknown field '{}'. Known fields: {}", s, known.join(", "))
            })
    }
}

/// Static catalog entry for a contact field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub label: &'static str,
    pub required: bool,
}

/// Every field an import can target, in display order
pub static FIELDS: [FieldDescriptor; 7] = [
    FieldDescriptor { key: FieldKey::Name, label: "Name", required: true },
    FieldDescriptor { key: FieldKey::Email, label: "Email", required: false },
    FieldDescriptor { key: FieldKey::Phone, label: "Phone", required: false },
    FieldDescriptor { key: FieldKey::LastJobDate, label: "Last Job Date", required: false },
    FieldDescriptor { key: FieldKey::Tags, label: "Tags", required: false },
    FieldDescriptor { key: FieldKey::SmsConsent, label: "SMS Consent", required: false },
    FieldDescriptor { key: FieldKey::EmailConsent, label: "Email Consent", required: false },
];

pub fn required_fields() -> impl Iterator<Item = &'static FieldDescriptor> {
    FIELDS.iter().filter(|d| d.required)
}

/// A header is matched when it contains every substring of any one group
struct MatchRule {
    field: FieldKey,
    any_of: &'static [&'static [&'static str]],
}

// Compound rules come before the single-word rules they overlap with, so
// "Email Consent" lands on emailConsent rather than email. Name follows
// email and phone because CRM exports prefix contact columns with
// "Customer": "Customer Email" is an email column, not a second name.
const RULES: &[MatchRule] = &[
    MatchRule { field: FieldKey::EmailConsent, any_of: &[&["email", "consent"]] },
    MatchRule { field: FieldKey::SmsConsent, any_of: &[&["sms"]] },
    MatchRule { field: FieldKey::Email, any_of: &[&["email"], &["mail"]] },
    MatchRule { field: FieldKey::Phone, any_of: &[&["phone"], &["tel"], &["mobile"]] },
    MatchRule { field: FieldKey::Name, any_of: &[&["name"], &["customer"]] },
    MatchRule { field: FieldKey::LastJobDate, any_of: &[&["date"], &["last"], &["job"]] },
    MatchRule { field: FieldKey::Tags, any_of: &[&["tag"], &["category"]] },
];

/// Field a single header suggests, if any
pub fn match_header(header: &str) -> Option<FieldKey> {
    let normalized = header.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    RULES
        .iter()
        .find(|rule| {
            rule.any_of
                .iter()
                .any(|group| group.iter().all(|needle| normalized.contains(needle)))
        })
        .map(|rule| rule.field)
}

/// Suggest an initial mapping for the given headers.
///
/// Never fails; headers matching no rule stay unmapped. When several headers
/// suggest the same field the leftmost one keeps it.
pub fn auto_map<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();

    for (column, header) in headers.iter().enumerate() {
        let Some(field) = match_header(header.as_ref()) else {
            log::debug!("No automatic match for column {} ('{}')", column, header.as_ref());
            continue;
        };

        if let Some(existing) = mapping.column_for(field) {
            log::debug!(
                "Column {} also looks like {}, keeping column {}",
                column,
                field,
                existing
            );
            continue;
        }

        mapping.assign(column, field);
    }

    mapping
}
