use crate::error::Result;
use crate::record::{LogRecord, RecordField};

/// Default line template: local time, padded level name, message.
pub const DEFAULT_TEMPLATE: &str = "{created} {level_name:<8} {message}";

/// How a file or stream sink renders one record into one line.
///
/// `Template` substitutes `{field}` placeholders named after
/// [`RecordField`] names; `{field:<N}` / `{field:>N}` pad to a minimum
/// width. Placeholders that name no record field pass through literally.
/// `Json` serializes the whole record as a single JSON object.
#[derive(Debug, Clone)]
pub enum LineFormat {
    Template(String),
    Json,
}

impl Default for LineFormat {
    fn default() -> Self {
        LineFormat::Template(DEFAULT_TEMPLATE.to_string())
    }
}

impl LineFormat {
    pub fn render(&self, record: &LogRecord) -> Result<String> {
        match self {
            LineFormat::Template(template) => Ok(render_template(template, record)),
            LineFormat::Json => Ok(serde_json::to_string(record)?),
        }
    }
}

fn render_template(template: &str, record: &LogRecord) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let spec = &after[..end];
                match expand(spec, record) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(spec);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn expand(spec: &str, record: &LogRecord) -> Option<String> {
    let (name, align) = match spec.split_once(':') {
        Some((name, align)) => (name, Some(align)),
        None => (spec, None),
    };
    let field = RecordField::parse(name)?;
    let value = display_value(record, field);
    let Some(align) = align else {
        return Some(value);
    };
    if let Some(width) = align.strip_prefix('<').and_then(|w| w.parse::<usize>().ok()) {
        Some(format!("{:<width$}", value))
    } else if let Some(width) = align.strip_prefix('>').and_then(|w| w.parse::<usize>().ok()) {
        Some(format!("{:>width$}", value))
    } else {
        // Unrecognized alignment spec: treat the placeholder as literal.
        None
    }
}

fn display_value(record: &LogRecord, field: RecordField) -> String {
    match field {
        RecordField::Created => record.timestamp().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
        RecordField::Logger => record.logger.clone().unwrap_or_default(),
        RecordField::Target => record.target.clone(),
        RecordField::Module => record.module.clone().unwrap_or_default(),
        RecordField::Function => record.function.clone().unwrap_or_default(),
        RecordField::File => record.file.clone().unwrap_or_default(),
        RecordField::Line => record.line.map(|l| l.to_string()).unwrap_or_default(),
        RecordField::LevelNo => record.level.number().to_string(),
        RecordField::LevelName => record.level.name().to_string(),
        RecordField::Message => record.message.clone().unwrap_or_default(),
        RecordField::Exception => record
            .exception
            .as_ref()
            .map(|e| e.render())
            .unwrap_or_default(),
        RecordField::Fields => {
            if record.fields.is_empty() {
                String::new()
            } else {
                serde_json::to_string(&record.fields).unwrap_or_default()
            }
        }
    }
}
