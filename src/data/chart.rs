use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::filter::FilteredView;
use super::labels::{payment_label, review_label};
use super::model::{FlatRecord, FlatTable};
use super::summary::value_counts;

// ---------------------------------------------------------------------------
// Crosstab – counts of (row label, column label) pairs
// ---------------------------------------------------------------------------

/// A contingency table. `counts[r][c]` counts rows with label `rows[r]` and
/// `columns[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Crosstab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl Crosstab {
    /// Count pairs. Rows and columns come out in key order; pairs with a
    /// missing side are skipped.
    fn build<R, C, I>(
        pairs: I,
        row_label: impl Fn(&R) -> String,
        col_label: impl Fn(&C) -> String,
    ) -> Self
    where
        R: Ord + Clone,
        C: Ord + Clone,
        I: IntoIterator<Item = (Option<R>, Option<C>)>,
    {
        let mut cells: BTreeMap<(R, C), u64> = BTreeMap::new();
        let mut row_keys = BTreeSet::new();
        let mut col_keys = BTreeSet::new();
        for (r, c) in pairs {
            let (Some(r), Some(c)) = (r, c) else { continue };
            row_keys.insert(r.clone());
            col_keys.insert(c.clone());
            *cells.entry((r, c)).or_insert(0) += 1;
        }

        let counts = row_keys
            .iter()
            .map(|r| {
                col_keys
                    .iter()
                    .map(|c| cells.get(&(r.clone(), c.clone())).copied().unwrap_or(0))
                    .collect()
            })
            .collect();

        Crosstab {
            rows: row_keys.iter().map(&row_label).collect(),
            columns: col_keys.iter().map(&col_label).collect(),
            counts,
        }
    }

    pub fn row_totals(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    /// Reorder rows by total, largest first. Equal totals keep their order.
    fn sort_rows_by_total(mut self) -> Self {
        let totals = self.row_totals();
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| totals[b].cmp(&totals[a]));
        self.rows = order.iter().map(|&i| self.rows[i].clone()).collect();
        self.counts = order.iter().map(|&i| self.counts[i].clone()).collect();
        self
    }

    /// Each row divided by its total, so every non-empty row sums to 1.
    pub fn row_normalized(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| {
                let total: u64 = row.iter().sum();
                row.iter()
                    .map(|&n| if total == 0 { 0.0 } else { n as f64 / total as f64 })
                    .collect()
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Chart descriptors and data
// ---------------------------------------------------------------------------

/// Which chart a layout draws and where its data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSpec {
    /// No chart; show this hint instead.
    Prompt(&'static str),
    /// Sales per category. Without a category selection: the `top` most
    /// frequent categories of the full table.
    CategoryBar { top: usize },
    /// Share per payment type over the full table.
    PaymentPie,
    /// Share per review score over the full table.
    ReviewPie,
    /// Payment types stacked per category.
    PaymentByCategory { top: usize },
    /// Review scores stacked per category.
    ReviewByCategory { top: usize },
    /// Row-normalised review score distribution per payment type, full table.
    PaymentReviewHeatmap,
}

/// Chart-ready data, independent of the drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Message(&'static str),
    Bars {
        title: &'static str,
        x_label: &'static str,
        y_label: &'static str,
        bars: Vec<(String, u64)>,
    },
    Pie {
        title: &'static str,
        slices: Vec<(String, u64)>,
    },
    StackedBars {
        title: &'static str,
        legend_title: &'static str,
        crosstab: Crosstab,
    },
    Heatmap {
        title: &'static str,
        x_label: &'static str,
        y_label: &'static str,
        crosstab: Crosstab,
    },
}

/// Percentage of the total held by each slice.
pub fn percentages(slices: &[(String, u64)]) -> Vec<f64> {
    let total: u64 = slices.iter().map(|(_, n)| n).sum();
    slices
        .iter()
        .map(|(_, n)| if total == 0 { 0.0 } else { *n as f64 * 100.0 / total as f64 })
        .collect()
}

fn category_of(rec: &FlatRecord) -> Option<&str> {
    rec.product_category_name.as_deref()
}

/// The `n` most frequent non-null categories of the full table.
fn top_categories(table: &FlatTable, n: usize) -> HashSet<&str> {
    value_counts(table.records.iter().filter_map(category_of))
        .into_iter()
        .take(n)
        .map(|(cat, _)| cat)
        .collect()
}

/// Rows feeding a per-category chart: the filtered view when the user picked
/// categories, otherwise the full table narrowed to its top `n` categories.
fn category_source<'a>(
    table: &'a FlatTable,
    view: &FilteredView<'a>,
    category_selected: bool,
    n: usize,
) -> Vec<&'a FlatRecord> {
    if category_selected {
        return view.iter().collect();
    }
    let top = top_categories(table, n);
    table
        .records
        .iter()
        .filter(|r| category_of(r).is_some_and(|c| top.contains(c)))
        .collect()
}

impl ChartSpec {
    /// Compute the chart data.
    ///
    /// `category_selected` tells whether an explicit category selection is in
    /// force; several charts fall back to the full table without one.
    pub fn build(
        &self,
        table: &FlatTable,
        view: &FilteredView<'_>,
        category_selected: bool,
    ) -> ChartData {
        match *self {
            ChartSpec::Prompt(msg) => ChartData::Message(msg),

            ChartSpec::CategoryBar { top } => {
                let bars = if category_selected {
                    value_counts(view.iter().filter_map(category_of))
                } else {
                    let mut all = value_counts(table.records.iter().filter_map(category_of));
                    all.truncate(top);
                    all
                };
                ChartData::Bars {
                    title: "Distribution by product category",
                    x_label: "Product category",
                    y_label: "Sales",
                    bars: bars
                        .into_iter()
                        .map(|(cat, n)| (cat.to_string(), n as u64))
                        .collect(),
                }
            }

            ChartSpec::PaymentPie => ChartData::Pie {
                title: "Distribution by payment type",
                slices: value_counts(table.records.iter().map(|r| r.payment_type.as_str()))
                    .into_iter()
                    .map(|(code, n)| (payment_label(code).to_string(), n as u64))
                    .collect(),
            },

            ChartSpec::ReviewPie => {
                let mut counts = value_counts(table.records.iter().map(|r| r.review_score));
                counts.sort_by_key(|(score, _)| *score);
                ChartData::Pie {
                    title: "Distribution by review score",
                    slices: counts
                        .into_iter()
                        .map(|(score, n)| (review_label(score), n as u64))
                        .collect(),
                }
            }

            ChartSpec::PaymentByCategory { top } => {
                let rows = category_source(table, view, category_selected, top);
                let crosstab = Crosstab::build(
                    rows.iter()
                        .map(|r| (category_of(r), Some(r.payment_type.as_str()))),
                    |c| c.to_string(),
                    |p| payment_label(p).to_string(),
                )
                .sort_rows_by_total();
                ChartData::StackedBars {
                    title: "Payment types by category",
                    legend_title: "Payment type",
                    crosstab,
                }
            }

            ChartSpec::ReviewByCategory { top } => {
                let rows = category_source(table, view, category_selected, top);
                let crosstab = Crosstab::build(
                    rows.iter().map(|r| (category_of(r), Some(r.review_score))),
                    |c| c.to_string(),
                    |s| review_label(*s),
                )
                .sort_rows_by_total();
                ChartData::StackedBars {
                    title: "Review scores by category",
                    legend_title: "Score",
                    crosstab,
                }
            }

            ChartSpec::PaymentReviewHeatmap => ChartData::Heatmap {
                title: "Share of review scores per payment type",
                x_label: "Review score",
                y_label: "Payment type",
                crosstab: Crosstab::build(
                    table
                        .records
                        .iter()
                        .map(|r| (Some(r.payment_type.as_str()), Some(r.review_score))),
                    |p| payment_label(p).to_string(),
                    |s| s.to_string(),
                ),
            },
        }
    }
}
