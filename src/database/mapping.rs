use crate::error::{Result, SinkError};
use crate::record::RecordField;
use std::collections::BTreeSet;

/// Default column ↔ record-field mapping covering the common reporting
/// columns. Order is significant: it fixes the column list and the
/// placeholder order of the generated INSERT statement.
pub const LOG_TABLE_MAP: [(&str, &str); 9] = [
    ("date", "created"),
    ("logger", "logger"),
    ("module", "module"),
    ("func_name", "function"),
    ("line", "line"),
    ("level", "level_no"),
    ("level_name", "level_name"),
    ("message", "message"),
    ("traceback", "exception"),
];

/// Ordered mapping from destination column name to record field.
///
/// Validated at construction: every field name must resolve to a
/// [`RecordField`]. A mapping that exists is a mapping the row translator
/// can always satisfy, so emission never re-validates.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    entries: Vec<(String, RecordField)>,
}

impl FieldMapping {
    /// Build a mapping from `(column, field name)` pairs, preserving order.
    ///
    /// **Errors**
    ///
    /// [`SinkError::InvalidMapping`] when any field name is not one the
    /// record model exposes; the message names every offending field,
    /// sorted and deduplicated.
    pub fn new<I, C, F>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, F)>,
        C: Into<String>,
        F: AsRef<str>,
    {
        let mut entries = Vec::new();
        let mut unknown = BTreeSet::new();
        for (column, field) in pairs {
            let name = field.as_ref();
            match RecordField::parse(name) {
                Some(field) => entries.push((column.into(), field)),
                None => {
                    unknown.insert(name.to_ascii_lowercase());
                }
            }
        }

        if !unknown.is_empty() {
            let listed = unknown
                .iter()
                .map(|name| format!("'{}'", name))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(SinkError::InvalidMapping(format!(
                "log record has no field{} {}",
                if unknown.len() > 1 { "s" } else { "" },
                listed
            )));
        }

        Ok(Self { entries })
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(column, _)| column.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = RecordField> + '_ {
        self.entries.iter().map(|(_, field)| *field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        // Every name in LOG_TABLE_MAP is a known field; the filter never
        // drops an entry (asserted by test).
        let entries = LOG_TABLE_MAP
            .iter()
            .filter_map(|(column, field)| {
                RecordField::parse(field).map(|field| ((*column).to_string(), field))
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mapping_keeps_all_nine_columns_in_order() {
        let mapping = FieldMapping::default();
        assert_eq!(mapping.len(), 9);
        let columns: Vec<&str> = mapping.columns().collect();
        assert_eq!(
            columns,
            vec![
                "date",
                "logger",
                "module",
                "func_name",
                "line",
                "level",
                "level_name",
                "message",
                "traceback"
            ]
        );
        assert_eq!(mapping.fields().next(), Some(RecordField::Created));
    }

    #[test]
    fn known_field_subsets_construct() {
        let mapping = FieldMapping::new([("date", "created"), ("level", "level_no")]).unwrap();
        assert_eq!(mapping.len(), 2);
        let fields: Vec<RecordField> = mapping.fields().collect();
        assert_eq!(fields, vec![RecordField::Created, RecordField::LevelNo]);
    }

    #[test]
    fn unknown_fields_fail_sorted_and_deduplicated() {
        let err = FieldMapping::new([
            ("a", "zebra"),
            ("b", "created"),
            ("c", "apple"),
            ("d", "zebra"),
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid column mapping: log record has no fields 'apple', 'zebra'"
        );
    }

    #[test]
    fn single_unknown_field_is_not_pluralized() {
        let err = FieldMapping::new([("col", "bogus")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid column mapping: log record has no field 'bogus'"
        );
    }

    #[test]
    fn validation_normalizes_case() {
        let mapping = FieldMapping::new([("date", "Created"), ("lvl", "LEVEL_NO")]).unwrap();
        let fields: Vec<RecordField> = mapping.fields().collect();
        assert_eq!(fields, vec![RecordField::Created, RecordField::LevelNo]);
    }
}
