use std::path::{Path, PathBuf};

use olist_dashboard::data::export;
use olist_dashboard::data::filter::{FilterState, FilteredView};
use olist_dashboard::data::model::FlatTable;
use olist_dashboard::data::presentation::{build_report, Report};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Table,
    Charts,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Joined dataset, read-only after load.
    pub table: FlatTable,

    /// Filter toggles and selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Metrics and chart for the current filters (cached).
    pub report: Report,

    pub tab: Tab,

    /// Text typed into the category search box.
    pub category_search: String,

    /// Directory the dataset was loaded from.
    pub data_dir: PathBuf,

    /// Default directory for the export dialog.
    pub export_dir: PathBuf,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        table: FlatTable,
        data_dir: PathBuf,
        export_dir: PathBuf,
        filters: FilterState,
    ) -> Self {
        let mut state = Self {
            table,
            filters,
            visible_indices: Vec::new(),
            report: Report::NoResults,
            tab: Tab::Table,
            category_search: String::new(),
            data_dir,
            export_dir,
            status_message: None,
        };
        state.refilter();
        state
    }

    /// Swap in a newly loaded dataset; filters start over.
    pub fn set_table(&mut self, table: FlatTable, data_dir: PathBuf) {
        self.table = table;
        self.data_dir = data_dir;
        self.filters = FilterState::default();
        self.category_search.clear();
        self.status_message = None;
        self.refilter();
    }

    /// The filtered view of the current selection.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::from_indices(&self.table, self.visible_indices.clone())
    }

    /// Recompute `visible_indices` and `report` after a filter change.
    pub fn refilter(&mut self) {
        let view = FilteredView::new(&self.table, &self.filters.predicates());
        self.report = build_report(&self.table, &view, &self.filters);
        self.visible_indices = view.indices().to_vec();
        log::debug!(
            "Filters {:?} keep {} of {} records",
            self.filters.active_filters(),
            self.visible_indices.len(),
            self.table.len()
        );
    }

    pub fn set_category_enabled(&mut self, on: bool) {
        self.filters.set_category_enabled(on);
        self.refilter();
    }

    pub fn set_payment_enabled(&mut self, on: bool) {
        self.filters.set_payment_enabled(on);
        self.refilter();
    }

    pub fn set_review_enabled(&mut self, on: bool) {
        self.filters.set_review_enabled(on);
        self.refilter();
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.filters.toggle_category(category);
        self.refilter();
    }

    /// Deselect all categories.
    pub fn clear_categories(&mut self) {
        self.filters.categories.clear();
        self.refilter();
    }

    pub fn select_payment(&mut self, kind: &str) {
        self.filters.select_payment(kind);
        self.refilter();
    }

    pub fn toggle_review(&mut self, score: u8) {
        self.filters.toggle_review(score);
        self.refilter();
    }

    /// Write the filtered view to `path` and report the outcome in the status bar.
    pub fn export_to(&mut self, path: &Path) {
        let result = export::export_to_path(&self.view(), path);
        match result {
            Ok(rows) => {
                self.status_message = Some(format!("Exported {rows} rows to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
