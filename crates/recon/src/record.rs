use serde_json::{Map, Value};

use crate::model::MaFileInput;
use crate::variants::strip_mafile_extension;

/// A maFile that parsed as a JSON object, with its resolved identifier.
#[derive(Debug, Clone)]
pub struct MaFileRecord {
    pub filename: String,
    pub identifier: String,
    pub document: Value,
}

impl MaFileRecord {
    /// Read and parse one input. The error string ends up in the report.
    pub fn load(input: &MaFileInput) -> Result<Self, String> {
        let text = input.read_text().map_err(|e| e.to_string())?;
        let document: Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
        Self::from_document(input.filename.clone(), document)
    }

    pub fn from_document(filename: String, document: Value) -> Result<Self, String> {
        let identifier = match document.as_object() {
            Some(obj) => resolve_identifier(obj, &filename),
            None => return Err("maFile is not a JSON object".into()),
        };
        Ok(Self {
            filename,
            identifier,
            document,
        })
    }
}

/// `account_name`, then `Session.SteamID`, then the filename stem.
pub fn resolve_identifier(doc: &Map<String, Value>, filename: &str) -> String {
    doc.get("account_name")
        .and_then(identifier_text)
        .or_else(|| {
            doc.get("Session")
                .and_then(Value::as_object)
                .and_then(|session| session.get("SteamID"))
                .and_then(identifier_text)
        })
        .unwrap_or_else(|| strip_mafile_extension(filename).to_string())
}

/// Non-empty strings and non-zero numbers count as present; anything else is
/// treated as missing.
fn identifier_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
