//! Global storage operations
//!
//! The editor records recently opened folders in storage.json under
//! <App>/User/globalStorage/ (and <App>/ in older versions).

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Collect folder URIs referenced by a storage.json document
///
/// Looks at:
/// - openedPathsList.workspaces3[] (plain strings, older versions)
/// - openedPathsList.entries[].folderUri
/// - backupWorkspaces.folders[].folderUri
/// - profileAssociations.workspaces (keys)
pub fn folder_uris(json: &Value) -> Vec<String> {
    let mut uris = Vec::new();

    if let Some(opened) = json.get("openedPathsList") {
        if let Some(arr) = opened.get("workspaces3").and_then(|w| w.as_array()) {
            uris.extend(arr.iter().filter_map(|v| v.as_str()).map(String::from));
        }
        if let Some(arr) = opened.get("entries").and_then(|e| e.as_array()) {
            uris.extend(
                arr.iter()
                    .filter_map(|entry| entry.get("folderUri"))
                    .filter_map(|uri| uri.as_str())
                    .map(String::from),
            );
        }
    }

    if let Some(arr) = json
        .get("backupWorkspaces")
        .and_then(|b| b.get("folders"))
        .and_then(|f| f.as_array())
    {
        uris.extend(
            arr.iter()
                .filter_map(|folder| folder.get("folderUri"))
                .filter_map(|uri| uri.as_str())
                .map(String::from),
        );
    }

    if let Some(obj) = json
        .get("profileAssociations")
        .and_then(|a| a.get("workspaces"))
        .and_then(|w| w.as_object())
    {
        uris.extend(obj.keys().cloned());
    }

    uris
}

/// Convert a folder URI to a local path; remote URIs yield `None`
///
/// Bare absolute paths (as some older versions stored them) are accepted too.
pub fn uri_to_local_path(uri: &str) -> Option<PathBuf> {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url.to_file_path().ok(),
        Ok(url) if url.scheme().len() > 1 => None,
        // "C:\..." parses as scheme "c"; treat it, and unparseable input, as a path
        _ => {
            let path = PathBuf::from(uri);
            path.is_absolute().then_some(path)
        }
    }
}

/// Find git repositories among recently opened folders
///
/// Storage files that are missing are skipped silently, unparseable ones with
/// a warning. Results keep first-seen order without duplicates.
pub fn recent_git_repos(storage_files: &[PathBuf]) -> Vec<PathBuf> {
    let mut repos: Vec<PathBuf> = Vec::new();

    for file in storage_files {
        let Some(json) = read_storage_json(file) else {
            continue;
        };

        for uri in folder_uris(&json) {
            let Some(path) = uri_to_local_path(&uri) else {
                continue;
            };
            if is_git_repo(&path) && !repos.contains(&path) {
                repos.push(path);
            }
        }
    }

    repos
}

fn read_storage_json(path: &Path) -> Option<Value> {
    if !path.exists() {
        return None;
    }

    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse storage file");
            None
        }
    }
}

fn is_git_repo(path: &Path) -> bool {
    path.is_dir() && path.join(".git").exists()
}
