use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{export_file_name, save_csv};
use crate::data::filter::{Comparator, FILTERABLE_COLUMNS, MAX_CONDITIONS};
use crate::data::loader::{load_source, SourceConfig};
use crate::data::model::Table;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter form, configurations, export
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Signal Filters");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No data loaded.");
        return;
    };
    let all_columns = table.column_names.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Condition form ----
            let mut n = state.draft.len();
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Conditions");
                ui.add(egui::Slider::new(&mut n, 1..=MAX_CONDITIONS));
            });
            if n != state.draft.len() {
                state.resize_draft(n);
            }

            for i in 0..state.draft.len() {
                let cond = &mut state.draft[i];
                ui.add_space(4.0);
                egui::ComboBox::from_id_salt(("column", i))
                    .selected_text(cond.column.clone())
                    .show_ui(ui, |ui: &mut Ui| {
                        for col in FILTERABLE_COLUMNS {
                            ui.selectable_value(&mut cond.column, col.to_string(), *col);
                        }
                    });
                ui.horizontal(|ui: &mut Ui| {
                    egui::ComboBox::from_id_salt(("comparator", i))
                        .width(60.0)
                        .selected_text(cond.comparator.to_string())
                        .show_ui(ui, |ui: &mut Ui| {
                            for c in Comparator::ALL {
                                ui.selectable_value(&mut cond.comparator, c, c.to_string());
                            }
                        });
                    ui.add(
                        egui::TextEdit::singleline(&mut cond.value)
                            .hint_text("value")
                            .desired_width(90.0),
                    );
                });
            }

            ui.add_space(6.0);
            if ui.button("Generate Filtered Data").clicked() {
                state.apply_filters();
            }
            ui.separator();

            // ---- Saved configurations ----
            ui.strong("Configurations");
            ui.horizontal(|ui: &mut Ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.config_name)
                        .hint_text("name")
                        .desired_width(120.0),
                );
                if ui.small_button("Save").clicked() {
                    state.save_config();
                }
            });

            let saved: Vec<String> = state.configs.keys().cloned().collect();
            let mut chosen: Option<String> = None;
            egui::ComboBox::from_id_salt("load_config")
                .selected_text("Load saved…")
                .show_ui(ui, |ui: &mut Ui| {
                    for name in &saved {
                        if ui.selectable_label(false, name).clicked() {
                            chosen = Some(name.clone());
                        }
                    }
                });
            if let Some(name) = chosen {
                state.load_config(&name);
            }
            ui.separator();

            // ---- Export ----
            ui.strong("Export columns");
            for col in &all_columns {
                let mut checked = state.export_columns.contains(col);
                if ui.checkbox(&mut checked, col).changed() {
                    if checked {
                        state.export_columns.insert(col.clone());
                    } else {
                        state.export_columns.remove(col);
                    }
                }
            }

            ui.add_space(6.0);
            if ui.button("Download filtered (CSV)…").clicked() {
                match state.export_table() {
                    Some(out) => export_dialog(&mut state.status_message, "filtered_data", &out),
                    None => {
                        state.status_message =
                            Some("Apply a filter before exporting.".to_string());
                    }
                }
            }
            if ui.button("Download bad signals (CSV)…").clicked() {
                if let Some(bad) = state.bad.clone() {
                    export_dialog(&mut state.status_message, "bad_signals", &bad);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use sample data").clicked() {
                load_into(state, &SourceConfig::default());
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let bad = state.bad.as_ref().map(Table::len).unwrap_or(0);
            ui.label(format!(
                "{} signals loaded, {} bad",
                table.len(),
                bad
            ));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open signal data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &SourceConfig::file(path));
    }
}

fn load_into(state: &mut AppState, config: &SourceConfig) {
    match load_source(config) {
        Ok(table) => {
            log::info!(
                "Loaded {} signals with columns {:?}",
                table.len(),
                table.column_names
            );
            state.set_table(table);
        }
        Err(e) => {
            log::error!("Failed to load source: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn export_dialog(status: &mut Option<String>, kind: &str, table: &Table) {
    let file = rfd::FileDialog::new()
        .set_title("Save CSV")
        .set_file_name(export_file_name(kind))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match save_csv(table, &path) {
            Ok(()) => *status = Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                *status = Some(format!("Error: {e:#}"));
            }
        }
    }
}
