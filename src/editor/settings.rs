//! Live settings.json operations
//!
//! Editor settings files are JSONC: they allow `//` and `/* */` comments and
//! trailing commas. Those are stripped before parsing. Rewritten files are
//! plain pretty-printed JSON.

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

pub type Settings = Map<String, Value>;

/// Check that the settings file exists
pub fn locate_settings_file(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(SyncError::SettingsNotFound(path.to_path_buf()))
    }
}

/// Parse settings file content (JSON or JSONC) into a key/value map
pub fn parse_settings(content: &str, path: &Path) -> Result<Settings> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let cleaned = strip_trailing_commas(&strip_jsonc_comments(content));

    // An empty or whitespace-only file is what the editor leaves behind
    // after the user clears everything.
    if cleaned.trim().is_empty() {
        return Ok(Settings::new());
    }

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| SyncError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(SyncError::Format {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", json_type_name(&other)),
        }),
    }
}

/// Read the live settings file; `None` if it doesn't exist
pub fn read_settings(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).map_err(|e| SyncError::io("Failed to read settings", path, e))?;
    parse_settings(&content, path).map(Some)
}

/// Shallow-overwrite merge: every incoming key replaces the live one,
/// keys absent from `incoming` are left alone
pub fn merge_settings(live: &mut Settings, incoming: &Settings) {
    for (key, value) in incoming {
        live.insert(key.clone(), value.clone());
    }
}

/// Merge `incoming` into the settings file at `path`, creating it if needed
pub fn apply_settings(path: &Path, incoming: &Settings) -> Result<()> {
    let mut live = read_settings(path)?.unwrap_or_default();
    merge_settings(&mut live, incoming);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| SyncError::io("Failed to create directory", parent, e))?;
    }

    write_settings(path, &live)
}

/// Write settings as pretty-printed JSON
pub fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    let mut content = serde_json::to_string_pretty(settings).map_err(|e| SyncError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    content.push('\n');
    fs::write(path, content).map_err(|e| SyncError::io("Failed to write settings", path, e))
}

/// A timestamped copy of the settings file taken before an import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    pub source: PathBuf,
    pub path: PathBuf,
    pub created_at: DateTime<Local>,
}

/// Copy the settings file next to itself with a timestamp suffix
///
/// `settings.json` becomes `settings.json.backup-20250115-103000`. If a backup
/// with that name already exists (two imports within the same second), a
/// counter is appended instead of overwriting it.
pub fn create_backup(source: &Path) -> Result<Backup> {
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    create_backup_in(source, dir)
}

/// Like [`create_backup`], but places the copy in `dir`
///
/// The directory must already exist.
pub fn create_backup_in(source: &Path, dir: &Path) -> Result<Backup> {
    let created_at = Local::now();
    let path = backup_path_for(source, dir, &created_at);

    fs::copy(source, &path).map_err(|e| SyncError::Backup {
        source_path: source.to_path_buf(),
        backup_path: path.clone(),
        source: e,
    })?;

    tracing::info!(source = %source.display(), backup = %path.display(), "settings backed up");

    Ok(Backup {
        source: source.to_path_buf(),
        path,
        created_at,
    })
}

fn backup_path_for(source: &Path, dir: &Path, at: &DateTime<Local>) -> PathBuf {
    let file_name = source
        .file_name()
        .unwrap_or_else(|| OsStr::new("settings.json"));
    let mut base = dir.join(file_name).into_os_string();
    base.push(format!(".backup-{}", at.format("%Y%m%d-%H%M%S")));

    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        let mut numbered = base.clone();
        numbered.push(format!("-{}", n));
        candidate = PathBuf::from(numbered);
        n += 1;
    }
    candidate
}

/// Strip `//` and `/* */` comments, leaving string contents intact
pub fn strip_jsonc_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                // Keep the newline so line numbers in parse errors still match
                for nc in chars.by_ref() {
                    if nc == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for nc in chars.by_ref() {
                    if prev == '*' && nc == '/' {
                        break;
                    }
                    if nc == '\n' {
                        result.push('\n');
                    }
                    prev = nc;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Drop commas that directly precede `}` or `]` (outside strings)
fn strip_trailing_commas(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut result = String::with_capacity(content.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            result.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    result.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            result.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                result.push(c);
            }
        } else {
            result.push(c);
        }
        i += 1;
    }

    result
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Settings {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_parse_jsonc() {
        let content = r#"{
    // Editor font
    "editor.fontSize": 14, /* inline */
    "files.exclude": { "**/.git": true, },
    "url": "http://example.com/a//b",
    "quote": "say \"hi\" // not a comment",
}"#;
        let settings = parse_settings(content, Path::new("settings.json")).unwrap();
        assert_eq!(settings["editor.fontSize"], json!(14));
        assert_eq!(settings["files.exclude"], json!({ "**/.git": true }));
        assert_eq!(settings["url"], json!("http://example.com/a//b"));
        assert_eq!(settings["quote"], json!("say \"hi\" // not a comment"));
    }

    #[test]
    fn test_parse_strips_byte_order_mark() {
        let settings =
            parse_settings("\u{feff}{\"a\": 1}", Path::new("settings.json")).unwrap();
        assert_eq!(settings["a"], json!(1));

        let settings = parse_settings("\u{feff}", Path::new("settings.json")).unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_parse_empty_file() {
        let settings = parse_settings("  \n", Path::new("settings.json")).unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_parse_non_object_is_format_error() {
        let err = parse_settings("[1, 2]", Path::new("settings.json")).unwrap_err();
        assert!(matches!(err, SyncError::Format { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_parse_invalid_json_is_format_error() {
        let err = parse_settings("{ \"a\": }", Path::new("settings.json")).unwrap_err();
        assert!(matches!(err, SyncError::Format { .. }));
    }

    #[test]
    fn test_merge_is_non_destructive() {
        let mut live = as_map(json!({ "a": 1, "b": 2 }));
        merge_settings(&mut live, &as_map(json!({ "b": 3, "c": 4 })));
        assert_eq!(Value::Object(live), json!({ "a": 1, "b": 3, "c": 4 }));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "a": 1, "b": { "x": true } }"#).unwrap();

        let incoming = as_map(json!({ "b": { "y": false }, "c": [1, 2] }));
        apply_settings(&path, &incoming).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        apply_settings(&path, &incoming).unwrap();
        let twice = fs::read_to_string(&path).unwrap();

        assert_eq!(once, twice);
        let result = read_settings(&path).unwrap().unwrap();
        assert_eq!(
            Value::Object(result),
            json!({ "a": 1, "b": { "y": false }, "c": [1, 2] })
        );
    }

    #[test]
    fn test_apply_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("User").join("settings.json");

        let incoming = as_map(json!({ "editor.tabSize": 2 }));
        apply_settings(&path, &incoming).unwrap();

        let result = read_settings(&path).unwrap().unwrap();
        assert_eq!(result, incoming);
    }

    #[test]
    fn test_read_missing_settings() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_settings(&dir.path().join("nope.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_locate_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(matches!(
            locate_settings_file(&path),
            Err(SyncError::SettingsNotFound(_))
        ));

        fs::write(&path, "{}").unwrap();
        assert_eq!(locate_settings_file(&path).unwrap(), path);
    }

    #[test]
    fn test_backup_copies_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "// keep me\n{ \"a\": 1 }").unwrap();

        let backup = create_backup(&path).unwrap();
        assert_eq!(backup.source, path);
        assert!(backup
            .path
            .to_string_lossy()
            .contains("settings.json.backup-"));
        assert_eq!(
            fs::read_to_string(&backup.path).unwrap(),
            "// keep me\n{ \"a\": 1 }"
        );
    }

    #[test]
    fn test_backup_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{}").unwrap();

        let at = Local::now();
        let first = backup_path_for(&path, dir.path(), &at);
        fs::write(&first, "older backup").unwrap();
        let second = backup_path_for(&path, dir.path(), &at);

        assert_ne!(first, second);
        assert!(second.to_string_lossy().ends_with("-1"));
    }

    #[test]
    fn test_backup_into_other_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{}").unwrap();
        let backups = dir.path().join("backups");
        fs::create_dir(&backups).unwrap();

        let backup = create_backup_in(&path, &backups).unwrap();
        assert_eq!(backup.path.parent(), Some(backups.as_path()));
        assert_eq!(fs::read_to_string(&backup.path).unwrap(), "{}");
    }

    #[test]
    fn test_backup_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = create_backup(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, SyncError::Backup { .. }));
    }
}
