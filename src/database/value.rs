use crate::database::mapping::FieldMapping;
use crate::record::{LogRecord, RecordField};
use chrono::NaiveDateTime;

/// A parameter ready for positional binding into a SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    /// Local wall-clock time for the `date` column.
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Empty and whitespace-only strings normalize to NULL so "no data"
    /// looks the same across all text columns.
    fn text_or_null(value: &str) -> SqlValue {
        if value.trim().is_empty() {
            SqlValue::Null
        } else {
            SqlValue::Text(value.to_string())
        }
    }

    fn opt_text_or_null(value: Option<&str>) -> SqlValue {
        match value {
            Some(value) => SqlValue::text_or_null(value),
            None => SqlValue::Null,
        }
    }
}

/// Translate one record field into a bindable parameter.
///
/// Coercion, in priority order: the creation timestamp becomes a local
/// `Timestamp`; a non-empty exception renders to its text with line breaks
/// re-joined by `|` (one scalar, safe for a single text column) and an
/// absent one to NULL; whitespace-only strings become NULL; values already
/// in the parameter domain pass through; anything else degrades to text.
pub fn translate_field(record: &LogRecord, field: RecordField) -> SqlValue {
    match field {
        RecordField::Created => SqlValue::Timestamp(record.timestamp().naive_local()),
        RecordField::Exception => match &record.exception {
            Some(info) if !info.is_empty() => {
                let flattened = info.render().lines().collect::<Vec<_>>().join("|");
                SqlValue::text_or_null(&flattened)
            }
            _ => SqlValue::Null,
        },
        RecordField::Logger => SqlValue::opt_text_or_null(record.logger.as_deref()),
        RecordField::Target => SqlValue::text_or_null(&record.target),
        RecordField::Module => SqlValue::opt_text_or_null(record.module.as_deref()),
        RecordField::Function => SqlValue::opt_text_or_null(record.function.as_deref()),
        RecordField::File => SqlValue::opt_text_or_null(record.file.as_deref()),
        RecordField::Line => match record.line {
            Some(line) => SqlValue::Int(i64::from(line)),
            None => SqlValue::Null,
        },
        RecordField::LevelNo => SqlValue::Int(record.level.number()),
        RecordField::LevelName => SqlValue::text_or_null(record.level.name()),
        RecordField::Message => SqlValue::opt_text_or_null(record.message.as_deref()),
        RecordField::Fields => {
            if record.fields.is_empty() {
                SqlValue::Null
            } else {
                SqlValue::text_or_null(&serde_json::to_string(&record.fields).unwrap_or_default())
            }
        }
    }
}

/// Translate a whole record into the parameter list for one INSERT, in
/// mapping order.
pub fn translate_row(record: &LogRecord, mapping: &FieldMapping) -> Vec<SqlValue> {
    mapping
        .fields()
        .map(|field| translate_field(record, field))
        .collect()
}
