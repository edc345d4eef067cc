use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use olist_dashboard::data::export::export_file_name;
use olist_dashboard::data::labels::{payment_label, review_label, thousands};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis filters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            category_filter(ui, state);
            ui.separator();
            payment_filter(ui, state);
            ui.separator();
            review_filter(ui, state);
        });
}

fn category_filter(ui: &mut Ui, state: &mut AppState) {
    let mut on = state.filters.category_enabled;
    if ui
        .checkbox(&mut on, RichText::new("Product category").strong())
        .changed()
    {
        state.set_category_enabled(on);
    }
    if !on {
        return;
    }

    let n_selected = state.filters.categories.len();
    let n_total = state.table.categories.len();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Select one or more ({n_selected}/{n_total})"));
        if ui.small_button("None").clicked() {
            state.clear_categories();
        }
    });
    ui.text_edit_singleline(&mut state.category_search);

    // Clone what we need so we can mutate state inside the loop.
    let needle = state.category_search.to_lowercase();
    let categories: Vec<String> = state
        .table
        .categories
        .iter()
        .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    ScrollArea::vertical()
        .id_salt("category_list")
        .max_height(260.0)
        .show(ui, |ui: &mut Ui| {
            for cat in &categories {
                let mut checked = state.filters.categories.contains(cat);
                let mut text = RichText::new(cat);
                if let Some(english) = state.table.category_labels.get(cat) {
                    if english != cat {
                        text = RichText::new(format!("{cat}  ({english})"));
                    }
                }
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_category(cat);
                }
            }
        });
}

fn payment_filter(ui: &mut Ui, state: &mut AppState) {
    let mut on = state.filters.payment_enabled;
    if ui
        .checkbox(&mut on, RichText::new("Payment type").strong())
        .changed()
    {
        state.set_payment_enabled(on);
    }
    if !on {
        return;
    }

    ui.label("Select the type:");
    let kinds: Vec<String> = state.table.payment_types.iter().cloned().collect();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for kind in &kinds {
            let selected = state.filters.payment.as_deref() == Some(kind.as_str());
            if ui.selectable_label(selected, payment_label(kind)).clicked() {
                state.select_payment(kind);
            }
        }
    });
}

fn review_filter(ui: &mut Ui, state: &mut AppState) {
    let mut on = state.filters.review_enabled;
    if ui
        .checkbox(&mut on, RichText::new("Review score").strong())
        .changed()
    {
        state.set_review_enabled(on);
    }
    if !on {
        return;
    }

    ui.label("Select one or more scores:");
    let scores: Vec<u8> = state.table.review_scores.iter().copied().collect();
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for score in scores {
            let mut checked = state.filters.reviews.contains(&score);
            if ui.checkbox(&mut checked, review_label(score)).changed() {
                state.toggle_review(score);
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
            if ui.button("Open dataset folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export filtered CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} records loaded, {} visible",
            thousands(state.table.len()),
            thousands(state.visible_indices.len())
        ));

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

/// Tab strip above the central panel.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, Tab::Table, "Data table");
        ui.selectable_value(&mut state.tab, Tab::Charts, "Charts");
    });
    ui.separator();
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open Olist dataset folder")
        .set_directory(&state.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        match olist_dashboard::open_dataset(&dir) {
            Ok(table) => {
                log::info!("Loaded {} records from {}", table.len(), dir.display());
                state.set_table(table, dir);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let default_name = export_file_name(chrono::Local::now().naive_local());
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_directory(&state.export_dir)
        .set_file_name(&default_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
