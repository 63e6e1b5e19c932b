//! Built-in presets
//!
//! Named bundles of extensions and settings for common kinds of development.
//! The catalog is built once on first use and never changes afterwards.

use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::editor::settings::Settings;
use crate::error::{Result, SyncError};
use crate::snapshot::Snapshot;

/// A named bundle of extensions and settings
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    /// Lookup key, e.g. "frontend"
    pub key: &'static str,
    /// Display label, e.g. "Frontend Development"
    pub name: &'static str,
    pub description: &'static str,
    pub extensions: Vec<&'static str>,
    pub settings: Settings,
}

impl Preset {
    /// Snapshot carrying this preset's extensions and settings
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::new(
            Some(self.extensions.iter().map(|s| s.to_string()).collect()),
            Some(self.settings.clone()),
        )
    }
}

static PRESETS: OnceLock<Vec<Preset>> = OnceLock::new();

/// All built-in presets, in display order
pub fn all() -> &'static [Preset] {
    PRESETS.get_or_init(build_catalog)
}

/// Lookup keys of all presets
pub fn names() -> Vec<&'static str> {
    all().iter().map(|p| p.key).collect()
}

/// Find a preset by key or display name (case-insensitive)
pub fn get(name: &str) -> Result<&'static Preset> {
    let wanted = name.trim();
    all()
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(wanted) || p.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| SyncError::PresetNotFound {
            name: name.to_string(),
            available: names().into_iter().map(String::from).collect(),
        })
}

fn object(value: Value) -> Settings {
    match value {
        Value::Object(map) => map,
        _ => Settings::new(),
    }
}

fn build_catalog() -> Vec<Preset> {
    vec![
        Preset {
            key: "frontend",
            name: "Frontend Development",
            description: "Extensions for modern frontend development",
            extensions: vec![
                "ms-vscode.vscode-typescript-next",
                "esbenp.prettier-vscode",
                "bradlc.vscode-tailwindcss",
                "dbaeumer.vscode-eslint",
                "formulahendry.auto-rename-tag",
                "christian-kohler.npm-intellisense",
                "ritwick.reactjs-code-snippets",
            ],
            settings: object(json!({
                "editor.formatOnSave": true,
                "editor.codeActionsOnSave": { "source.fixAll.eslint": true },
                "prettier.semi": true,
                "prettier.singleQuote": true,
                "emmet.includeLanguages": {
                    "javascript": "javascriptreact",
                    "typescript": "typescriptreact"
                }
            })),
        },
        Preset {
            key: "backend",
            name: "Backend Development",
            description: "Extensions for server-side development",
            extensions: vec![
                "ms-python.python",
                "ms-python.vscode-pylance",
                "ms-azuretools.vscode-docker",
                "humao.rest-client",
                "redhat.vscode-yaml",
                "golang.go",
                "rust-lang.rust-analyzer",
            ],
            settings: object(json!({
                "python.defaultInterpreterPath": "python3",
                "editor.formatOnSave": true,
                "files.associations": {
                    "*.env": "dotenv",
                    "Dockerfile*": "dockerfile"
                }
            })),
        },
        Preset {
            key: "fullstack",
            name: "Full-Stack Development",
            description: "Complete setup for full-stack development",
            extensions: vec![
                "ms-vscode.vscode-typescript-next",
                "esbenp.prettier-vscode",
                "ms-python.python",
                "ms-python.vscode-pylance",
                "bradlc.vscode-tailwindcss",
                "dbaeumer.vscode-eslint",
                "ms-azuretools.vscode-docker",
                "humao.rest-client",
                "formulahendry.auto-rename-tag",
                "redhat.vscode-yaml",
            ],
            settings: object(json!({
                "editor.formatOnSave": true,
                "editor.codeActionsOnSave": { "source.fixAll.eslint": true },
                "python.defaultInterpreterPath": "python3",
                "prettier.semi": true,
                "prettier.singleQuote": true,
                "emmet.includeLanguages": {
                    "javascript": "javascriptreact",
                    "typescript": "typescriptreact"
                }
            })),
        },
        Preset {
            key: "data-science",
            name: "Data Science",
            description: "Extensions for data science and machine learning",
            extensions: vec![
                "ms-python.python",
                "ms-python.vscode-pylance",
                "ms-toolsai.jupyter",
                "ms-toolsai.jupyter-keymap",
                "ms-toolsai.jupyter-renderers",
                "ms-toolsai.vscode-jupyter-cell-tags",
                "reditorsupport.r",
                "ms-mssql.mssql",
                "redhat.vscode-yaml",
            ],
            settings: object(json!({
                "python.defaultInterpreterPath": "python3",
                "jupyter.askForKernelRestart": false,
                "jupyter.interactiveWindow.creationMode": "perFile",
                "editor.formatOnSave": true
            })),
        },
        Preset {
            key: "mobile",
            name: "Mobile Development",
            description: "Extensions for mobile app development",
            extensions: vec![
                "dart-code.dart-code",
                "dart-code.flutter",
                "msjsdiag.vscode-react-native",
                "mathiasfrohlich.kotlin",
                "swiftlang.swift-vscode",
                "redhat.vscode-yaml",
            ],
            settings: object(json!({
                "dart.checkForSdkUpdates": true,
                "dart.openDevTools": "flutter",
                "editor.formatOnSave": true,
                "editor.rulers": [80, 120],
                "files.associations": { "*.dart": "dart" }
            })),
        },
    ]
}
