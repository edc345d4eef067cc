use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use olist_dashboard::data::labels::thousands;
use olist_dashboard::data::model::FLAT_COLUMNS;
use olist_dashboard::data::presentation::NO_RESULTS;

use crate::state::AppState;
use crate::ui::panels::save_file_dialog;

// ---------------------------------------------------------------------------
// Data table tab
// ---------------------------------------------------------------------------

/// Render the filtered records as a scrollable table.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    let n_rows = state.visible_indices.len();

    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("Filtered records: {}", thousands(n_rows))).strong());
        if n_rows > 0 && ui.button("Download table as CSV").clicked() {
            save_file_dialog(state);
        }
    });

    if n_rows == 0 {
        ui.add_space(8.0);
        ui.label(NO_RESULTS);
        return;
    }

    let table = &state.table;
    let indices = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(70.0), FLAT_COLUMNS.len())
        .min_scrolled_height(0.0)
        .header(20.0, |mut header| {
            for name in FLAT_COLUMNS {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let rec = &table.records[indices[row.index()]];
                for cell in rec.cells() {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
