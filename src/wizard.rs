//! Interactive setup wizard
//!
//! Builds a snapshot from one or more presets, lets the user adjust it, and
//! hands it back for import. The wizard itself never touches the filesystem
//! or the editor; cancelling at any prompt leaves the installation as it was.

use serde_json::Value;

use crate::editor::settings::{merge_settings, Settings};
use crate::error::{Result, SyncError};
use crate::presets::{self, Preset};
use crate::snapshot::Snapshot;

/// Extensions and settings accumulated from selected presets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    pub extensions: Vec<String>,
    pub settings: Settings,
}

impl Composition {
    /// Add a preset: its extensions are unioned in (first occurrence keeps its
    /// position), its settings overwrite earlier ones on colliding keys
    pub fn add(&mut self, preset: &Preset) {
        for id in &preset.extensions {
            self.add_extension(id);
        }
        merge_settings(&mut self.settings, &preset.settings);
    }

    /// Add one extension; returns false if it was already present
    pub fn add_extension(&mut self, id: &str) -> bool {
        if self.extensions.iter().any(|e| e == id) {
            return false;
        }
        self.extensions.push(id.to_string());
        true
    }

    /// Snapshot with empty parts left out (nothing to apply for them)
    pub fn into_snapshot(self) -> Snapshot {
        let extensions = (!self.extensions.is_empty()).then_some(self.extensions);
        let settings = (!self.settings.is_empty()).then_some(self.settings);
        Snapshot::new(extensions, settings)
    }
}

/// Compose presets by name, in selection order
pub fn compose<S: AsRef<str>>(names: &[S]) -> Result<Composition> {
    let mut composition = Composition::default();
    for name in names {
        composition.add(presets::get(name.as_ref())?);
    }
    Ok(composition)
}

/// Interaction primitives the wizard needs
///
/// Every prompt may return [`SyncError::Cancelled`].
pub trait Prompter {
    /// Pick one option; returns its index
    fn select(&mut self, message: &str, options: &[String]) -> Result<usize>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;

    fn text(&mut self, message: &str) -> Result<String>;

    /// Show informational output
    fn say(&mut self, message: &str);
}

/// Terminal prompts via `inquire`; Esc and Ctrl-C cancel
#[derive(Debug, Default)]
pub struct InquirePrompter;

fn prompt_error(e: inquire::InquireError) -> SyncError {
    match e {
        inquire::InquireError::OperationCanceled | inquire::InquireError::OperationInterrupted => {
            SyncError::Cancelled
        }
        other => SyncError::Prompt(other.to_string()),
    }
}

impl Prompter for InquirePrompter {
    fn select(&mut self, message: &str, options: &[String]) -> Result<usize> {
        inquire::Select::new(message, options.to_vec())
            .raw_prompt()
            .map(|choice| choice.index)
            .map_err(prompt_error)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        inquire::Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(prompt_error)
    }

    fn text(&mut self, message: &str) -> Result<String> {
        inquire::Text::new(message).prompt().map_err(prompt_error)
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// How a wizard session ended
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    /// User confirmed; import this snapshot
    Apply(Snapshot),
    /// User declined at the final confirmation
    Declined,
}

/// Run an interactive session
///
/// `preselected` presets (from the command line) skip the selection step.
pub fn run<P: Prompter>(prompter: &mut P, preselected: &[&Preset]) -> Result<WizardOutcome> {
    let mut composition = Composition::default();

    if preselected.is_empty() {
        select_presets(prompter, &mut composition)?;
    } else {
        for preset in preselected {
            composition.add(preset);
        }
    }

    prompter.say(&format_extensions(&composition.extensions));
    if prompter.confirm("Add or remove extensions?", false)? {
        edit_extensions(prompter, &mut composition)?;
    }

    prompter.say(&format_settings(&composition.settings));
    if prompter.confirm("Add or edit settings?", false)? {
        edit_settings(prompter, &mut composition)?;
    }

    prompter.say("Summary:");
    prompter.say(&format_extensions(&composition.extensions));
    prompter.say(&format_settings(&composition.settings));

    if prompter.confirm("Apply this configuration?", true)? {
        Ok(WizardOutcome::Apply(composition.into_snapshot()))
    } else {
        Ok(WizardOutcome::Declined)
    }
}

fn select_presets<P: Prompter>(prompter: &mut P, composition: &mut Composition) -> Result<()> {
    let mut remaining: Vec<&Preset> = presets::all().iter().collect();
    let mut selected = 0;

    while !remaining.is_empty() {
        let mut options: Vec<String> = remaining
            .iter()
            .map(|p| format!("{} - {}", p.name, p.description))
            .collect();
        options.push(if selected == 0 {
            "Custom (start empty)".to_string()
        } else {
            format!("Done ({} selected)", selected)
        });

        let message = if selected == 0 {
            "Select a development preset:"
        } else {
            "Add another preset?"
        };

        let choice = prompter.select(message, &options)?;
        if choice >= remaining.len() {
            break;
        }

        let preset = remaining.remove(choice);
        composition.add(preset);
        selected += 1;
    }

    Ok(())
}

fn edit_extensions<P: Prompter>(prompter: &mut P, composition: &mut Composition) -> Result<()> {
    let actions = vec!["Add".to_string(), "Remove".to_string(), "Done".to_string()];

    loop {
        match prompter.select("Extensions:", &actions)? {
            0 => {
                let id = prompter.text("Extension id to add:")?;
                let id = id.trim();
                if id.is_empty() {
                    continue;
                }
                if composition.add_extension(id) {
                    prompter.say(&format!("Added {}", id));
                } else {
                    prompter.say(&format!("{} is already included", id));
                }
            }
            1 => {
                if composition.extensions.is_empty() {
                    prompter.say("Nothing to remove.");
                    continue;
                }
                let index = prompter.select("Extension to remove:", &composition.extensions)?;
                if index < composition.extensions.len() {
                    let removed = composition.extensions.remove(index);
                    prompter.say(&format!("Removed {}", removed));
                }
            }
            _ => return Ok(()),
        }
    }
}

fn edit_settings<P: Prompter>(prompter: &mut P, composition: &mut Composition) -> Result<()> {
    loop {
        let key = prompter.text("Setting key (empty to finish):")?;
        let key = key.trim();
        if key.is_empty() {
            return Ok(());
        }

        let raw = prompter.text(&format!("Value for {}:", key))?;
        let value = parse_setting_value(&raw);
        prompter.say(&format!("Set {} = {}", key, value));
        composition.settings.insert(key.to_string(), value);
    }
}

/// Interpret user input as JSON (`true`, `14`, `[80, 120]`), falling back to a string
pub fn parse_setting_value(input: &str) -> Value {
    let trimmed = input.trim();
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

fn format_extensions(extensions: &[String]) -> String {
    if extensions.is_empty() {
        return "Extensions: (none)".to_string();
    }
    let mut lines = vec![format!("Extensions ({}):", extensions.len())];
    lines.extend(extensions.iter().map(|e| format!("  - {}", e)));
    lines.join("\n")
}

fn format_settings(settings: &Settings) -> String {
    if settings.is_empty() {
        return "Settings: (none)".to_string();
    }
    let mut lines = vec![format!("Settings ({}):", settings.len())];
    lines.extend(settings.iter().map(|(k, v)| format!("  {}: {}", k, v)));
    lines.join("\n")
}
