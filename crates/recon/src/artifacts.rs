//! The two files written per matched maFile.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Constant part of the ASF bot config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsfTemplate {
    pub enabled: bool,
    pub online_status: u8,
    pub remote_communication: u8,
}

impl Default for AsfTemplate {
    fn default() -> Self {
        Self {
            enabled: true,
            online_status: 7,
            remote_communication: 0,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AsfBotConfig<'a> {
    enabled: bool,
    online_status: u8,
    remote_communication: u8,
    steam_login: &'a str,
    steam_password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub mafile: PathBuf,
    pub config: PathBuf,
}

/// Replace `:`, `/` and `\` with `_` so the identifier is usable as a file stem.
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if matches!(c, ':' | '/' | '\\') { '_' } else { c })
        .collect()
}

/// Pretty-print with a custom indent. Non-ASCII text is written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T, indent: &[u8]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    value.serialize(&mut ser).map_err(io::Error::from)?;
    Ok(buf)
}

/// Write `<id>.maFile` (2-space copy of the document) then `<id>.json` (ASF
/// config, 4-space). A failure on the second file leaves the first in place.
pub fn write_artifacts(
    dir: &Path,
    identifier: &str,
    document: &Value,
    login: &str,
    password: &str,
    template: &AsfTemplate,
) -> io::Result<ArtifactPaths> {
    let stem = sanitize_identifier(identifier);
    let mafile = dir.join(format!("{stem}.maFile"));
    let config = dir.join(format!("{stem}.json"));

    fs::write(&mafile, to_pretty_json(document, b"  ")?)?;

    let bot = AsfBotConfig {
        enabled: template.enabled,
        online_status: template.online_status,
        remote_communication: template.remote_communication,
        steam_login: login,
        steam_password: password,
    };
    fs::write(&config, to_pretty_json(&bot, b"    ")?)?;

    Ok(ArtifactPaths { mafile, config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_identifier(r"a:b/c\d"), "a_b_c_d");
        assert_eq!(sanitize_identifier("плейн"), "плейн");
    }

    #[test]
    fn bot_config_shape() {
        let dir = tempdir().unwrap();
        let doc = json!({"shared_secret": "s", "account_name": "alice"});
        let paths = write_artifacts(dir.path(), "alice", &doc, "alice", "pw1", &AsfTemplate::default())
            .unwrap();

        let config = fs::read_to_string(&paths.config).unwrap();
        assert_eq!(
            config,
            "{\n    \"Enabled\": true,\n    \"OnlineStatus\": 7,\n    \"RemoteCommunication\": 0,\n    \"SteamLogin\": \"alice\",\n    \"SteamPassword\": \"pw1\"\n}"
        );
    }

    #[test]
    fn mafile_copy_keeps_order_and_unicode() {
        let dir = tempdir().unwrap();
        let doc: Value =
            serde_json::from_str(r#"{"z":1,"account_name":"юзер","a":{"b":2}}"#).unwrap();
        let paths =
            write_artifacts(dir.path(), "x:y", &doc, "l", "p", &AsfTemplate::default()).unwrap();

        assert_eq!(paths.mafile, dir.path().join("x_y.maFile"));
        let text = fs::read_to_string(&paths.mafile).unwrap();
        assert_eq!(
            text,
            "{\n  \"z\": 1,\n  \"account_name\": \"юзер\",\n  \"a\": {\n    \"b\": 2\n  }\n}"
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("nope");
        let doc = json!({});
        assert!(write_artifacts(&gone, "a", &doc, "l", "p", &AsfTemplate::default()).is_err());
    }
}
