//! Column → field assignments for one import

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::fields::{FieldDescriptor, FieldKey, required_fields};

/// Sparse mapping from CSV column index to contact field.
///
/// A field is held by at most one column. Serialized as a JSON object keyed
/// by column index, e.g. `{"0": "name", "2": "email"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<usize, FieldKey>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `column` to `field`, releasing `field` from any other column.
    ///
    /// Returns the column that previously held the field, if it was a different one.
    pub fn assign(&mut self, column: usize, field: FieldKey) -> Option<usize> {
        let previous = self.column_for(field).filter(|&c| c != column);
        if let Some(previous) = previous {
            self.columns.remove(&previous);
        }
        self.columns.insert(column, field);
        previous
    }

    /// Leave `column` unmapped; returns the field it held
    pub fn unassign(&mut self, column: usize) -> Option<FieldKey> {
        self.columns.remove(&column)
    }

    pub fn get(&self, column: usize) -> Option<FieldKey> {
        self.columns.get(&column).copied()
    }

    pub fn column_for(&self, field: FieldKey) -> Option<usize> {
        self.columns
            .iter()
            .find(|(_, f)| **f == field)
            .map(|(c, _)| *c)
    }

    pub fn mapped_fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.columns.values().copied()
    }

    /// Required fields no column maps to, in catalog order
    pub fn missing_required(&self) -> Vec<&'static FieldDescriptor> {
        required_fields()
            .filter(|d| self.column_for(d.key).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, FieldKey)> + '_ {
        self.columns.iter().map(|(c, f)| (*c, *f))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assign_moves_field_between_columns() {
        let mut mapping = ColumnMapping::new();
        assert_eq!(mapping.assign(0, FieldKey::Name), None);
        assert_eq!(mapping.assign(3, FieldKey::Name), Some(0));

        assert_eq!(mapping.get(0), None);
        assert_eq!(mapping.get(3), Some(FieldKey::Name));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_reassigning_same_column_is_noop() {
        let mut mapping = ColumnMapping::new();
        mapping.assign(1, FieldKey::Email);
        assert_eq!(mapping.assign(1, FieldKey::Email), None);
        assert_eq!(mapping.get(1), Some(FieldKey::Email));
    }

    #[test]
    fn test_column_changes_field() {
        let mut mapping = ColumnMapping::new();
        mapping.assign(1, FieldKey::Email);
        mapping.assign(1, FieldKey::Phone);
        assert_eq!(mapping.get(1), Some(FieldKey::Phone));
        assert_eq!(mapping.column_for(FieldKey::Email), None);
    }

    #[test]
    fn test_each_field_held_once() {
        let mut mapping = ColumnMapping::new();
        for column in 0..5 {
            mapping.assign(column, FieldKey::Tags);
        }
        let tags: Vec<FieldKey> = mapping.mapped_fields().collect();
        assert_eq!(tags, vec![FieldKey::Tags]);
        assert_eq!(mapping.column_for(FieldKey::Tags), Some(4));
    }

    #[test]
    fn test_missing_required() {
        let mut mapping = ColumnMapping::new();
        mapping.assign(0, FieldKey::Email);

        let missing = mapping.missing_required();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].key, FieldKey::Name);
        assert!(!mapping.is_complete());

        mapping.assign(1, FieldKey::Name);
        assert!(mapping.is_complete());

        assert_eq!(mapping.unassign(1), Some(FieldKey::Name));
        assert!(!mapping.is_complete());
    }

    #[test]
    fn test_wire_format() {
        let mut mapping = ColumnMapping::new();
        mapping.assign(0, FieldKey::Name);
        mapping.assign(2, FieldKey::LastJobDate);

        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(value, json!({"0": "name", "2": "lastJobDate"}));

        let back: ColumnMapping = serde_json::from_value(value).unwrap();
        assert_eq!(back, mapping);
    }
}
