use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – signal tables
// ---------------------------------------------------------------------------

/// Render the central data panel.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view signals  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::CollapsingHeader::new(RichText::new("Raw data").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    grid(ui, "raw", table);
                });

            egui::CollapsingHeader::new(RichText::new("Summary").strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    grid(ui, "summary", &table.describe());
                });

            ui.add_space(8.0);
            let shown = state.filtered.as_ref().cloned().or_else(|| state.good());
            if let Some(good) = shown {
                ui.label(
                    RichText::new(format!("Good signals ({})", good.len()))
                        .color(Color32::LIGHT_GREEN)
                        .strong(),
                );
                grid(ui, "good", &good);
            }

            ui.add_space(8.0);
            if let Some(bad) = &state.bad {
                ui.label(
                    RichText::new(format!("Bad signals ({})", bad.len()))
                        .color(Color32::LIGHT_RED)
                        .strong(),
                );
                grid(ui, "bad", bad);
            }
        });
}

/// Render one table as a striped grid.
fn grid(ui: &mut Ui, id: &str, table: &Table) {
    if table.column_names.is_empty() {
        ui.label("(no columns)");
        return;
    }
    if table.is_empty() {
        ui.label("(no rows)");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .columns(Column::auto().resizable(true), table.column_names.len())
            .header(20.0, |mut header| {
                for col in &table.column_names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|mut body| {
                for i in 0..table.len() {
                    body.row(18.0, |mut row| {
                        for col in &table.column_names {
                            let text = table.cell(i, col).to_string();
                            row.col(|ui: &mut Ui| {
                                ui.label(text);
                            });
                        }
                    });
                }
            });
    });
}
