//! Presets command - List the built-in presets

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};

use vscode_sync::presets;

/// Format all presets as a table
pub fn format_presets() -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Key"),
        Cell::new("Name"),
        Cell::new("Description"),
        Cell::new("Extensions"),
        Cell::new("Settings"),
    ]);

    for preset in presets::all() {
        table.add_row(vec![
            Cell::new(preset.key),
            Cell::new(preset.name),
            Cell::new(preset.description),
            Cell::new(preset.extensions.len()),
            Cell::new(preset.settings.len()),
        ]);
    }

    format!(
        "{}\n\nUse with: vscode-sync wizard --preset <KEY>",
        table
    )
}
