// Trim/rename modes: rewrite a folder of maFiles for downstream panels

use std::fs;
use std::path::{Path, PathBuf};

use mafile_recon::artifacts::{sanitize_identifier, to_pretty_json};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    /// Verbatim copy renamed to `<account_name>.maFile`.
    Full,
    /// `shared_secret`, `account_name` and `Session.SteamID`, 2-space indent.
    Fsm,
    /// `shared_secret` and `Session.SteamID`, 4-space indent.
    Dm,
}

impl TrimMode {
    pub fn default_dir_name(&self) -> &'static str {
        match self {
            Self::Full => "fullmafiles",
            Self::Fsm => "shortmaffsmpanel",
            Self::Dm => "shortmafdmpanel",
        }
    }
}

impl std::fmt::Display for TrimMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Fsm => write!(f, "fsm"),
            Self::Dm => write!(f, "dm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrimSkip {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrimReport {
    pub mode: TrimMode,
    pub output_dir: PathBuf,
    pub total: usize,
    pub processed: usize,
    pub skipped: Vec<TrimSkip>,
}

/// JSON truthiness: empty strings, zero, `false`, `null` and empty containers
/// count as missing.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Apply `mode` to `files` (names inside `folder`), writing into
/// `folder/<output_name>`. `progress` gets `floor(i*100/total)` after each file.
pub fn trim_folder(
    folder: &Path,
    files: &[String],
    mode: TrimMode,
    output_name: &str,
    mut progress: impl FnMut(u8, &str),
) -> Result<TrimReport, String> {
    let output_dir = folder.join(output_name);
    fs::create_dir_all(&output_dir)
        .map_err(|e| format!("cannot create {}: {e}", output_dir.display()))?;

    let total = files.len();
    let mut processed = 0;
    let mut skipped = Vec::new();

    for (i, filename) in files.iter().enumerate() {
        match trim_one(&folder.join(filename), &output_dir, mode) {
            Ok(()) => processed += 1,
            Err(reason) => {
                log::warn!("{filename}: {reason}");
                skipped.push(TrimSkip {
                    filename: filename.clone(),
                    reason,
                });
            }
        }
        let done = i + 1;
        let pct = (done * 100 / total.max(1)).min(100) as u8;
        progress(pct, &format!("file {done}/{total}"));
    }

    log::info!("{mode} mode: {processed}/{total} files");
    Ok(TrimReport {
        mode,
        output_dir,
        total,
        processed,
        skipped,
    })
}

fn trim_one(path: &Path, output_dir: &Path, mode: TrimMode) -> Result<(), String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let data: Value = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    let doc = data.as_object().ok_or("not a JSON object")?;

    let account = present(doc.get("account_name"));
    let secret = present(doc.get("shared_secret"));
    let steam_id = present(
        doc.get("Session")
            .and_then(Value::as_object)
            .and_then(|s| s.get("SteamID")),
    );

    if mode == TrimMode::Full {
        let account = account.ok_or("no account_name")?;
        let target = output_dir.join(format!("{}.maFile", sanitize_identifier(&value_text(account))));
        fs::copy(path, &target).map_err(|e| e.to_string())?;
        return Ok(());
    }

    let (Some(account), Some(secret), Some(steam_id)) = (account, secret, steam_id) else {
        return Err("incomplete data".into());
    };

    let (trimmed, indent): (Value, &[u8]) = match mode {
        TrimMode::Fsm => (
            json!({
                "shared_secret": secret,
                "account_name": account,
                "Session": { "SteamID": steam_id },
            }),
            &b"  "[..],
        ),
        _ => (
            json!({
                "shared_secret": secret,
                "Session": { "SteamID": steam_id },
            }),
            &b"    "[..],
        ),
    };

    let target = output_dir.join(format!("{}.maFile", sanitize_identifier(&value_text(account))));
    let bytes = to_pretty_json(&trimmed, indent).map_err(|e| e.to_string())?;
    fs::write(&target, bytes).map_err(|e| e.to_string())
}
