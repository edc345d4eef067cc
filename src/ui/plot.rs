use std::f32::consts::TAU;

use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use olist_dashboard::data::chart::{percentages, ChartData, Crosstab};
use olist_dashboard::data::presentation::{Report, NO_RESULTS};
use olist_dashboard::data::summary::Metric;

use crate::color::{self, heat_color, series_colors, text_on};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 420.0;

// ---------------------------------------------------------------------------
// Charts tab (central panel)
// ---------------------------------------------------------------------------

/// Render the metrics row and the chart picked for the current filters.
pub fn charts_tab(ui: &mut Ui, state: &AppState) {
    let (metrics, chart) = match &state.report {
        Report::NoResults => {
            ui.add_space(8.0);
            ui.label(RichText::new(format!("⚠ {NO_RESULTS}")).color(Color32::YELLOW));
            return;
        }
        Report::Ready { metrics, chart } => (metrics, chart),
    };

    metric_row(ui, metrics);
    ui.separator();
    ui.heading("Charts");

    match chart {
        ChartData::Message(msg) => {
            ui.label(*msg);
        }
        ChartData::Bars {
            title,
            x_label,
            y_label,
            bars,
        } => bar_chart(ui, title, x_label, y_label, bars),
        ChartData::Pie { title, slices } => pie_chart(ui, title, slices),
        ChartData::StackedBars {
            title,
            legend_title,
            crosstab,
        } => stacked_bar_chart(ui, title, legend_title, crosstab),
        ChartData::Heatmap {
            title,
            x_label,
            y_label,
            crosstab,
        } => heatmap(ui, title, x_label, y_label, crosstab),
    }
}

fn metric_row(ui: &mut Ui, metrics: &[Metric]) {
    if metrics.is_empty() {
        return;
    }
    ui.columns(metrics.len(), |cols| {
        for (col, m) in cols.iter_mut().zip(metrics) {
            col.group(|ui: &mut Ui| {
                ui.label(m.label);
                ui.heading(m.value.to_string());
            });
        }
    });
}

/// Numbered key for bar positions on the x axis.
fn category_key(ui: &mut Ui, labels: &[String]) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, label) in labels.iter().enumerate() {
            ui.small(format!("{i}: {label}"));
        }
    });
}

// ---------------------------------------------------------------------------
// Bars
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, title: &str, x_label: &str, y_label: &str, data: &[(String, u64)]) {
    ui.strong(title);

    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, (label, n))| Bar::new(i as f64, *n as f64).name(label).width(0.7))
        .collect();

    Plot::new("category_bars")
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color::BAR).name(y_label));
        });

    let labels: Vec<String> = data.iter().map(|(l, _)| l.clone()).collect();
    category_key(ui, &labels);
}

fn stacked_bar_chart(ui: &mut Ui, title: &str, legend_title: &str, crosstab: &Crosstab) {
    ui.strong(title);
    if crosstab.is_empty() {
        ui.label(NO_RESULTS);
        return;
    }

    let colors = series_colors(crosstab.columns.len());
    let mut bottoms = vec![0.0_f64; crosstab.rows.len()];
    let mut charts = Vec::with_capacity(crosstab.columns.len());

    for (c, series) in crosstab.columns.iter().enumerate() {
        let bars: Vec<Bar> = crosstab
            .counts
            .iter()
            .enumerate()
            .map(|(r, counts)| {
                let height = counts[c] as f64;
                let bar = Bar::new(r as f64, height)
                    .base_offset(bottoms[r])
                    .name(format!("{} – {series}", crosstab.rows[r]))
                    .width(0.7);
                bottoms[r] += height;
                bar
            })
            .collect();
        charts.push(BarChart::new(bars).name(series).color(colors[c]));
    }

    Plot::new("stacked_bars")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Product category")
        .y_axis_label(legend_title)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });

    category_key(ui, &crosstab.rows);
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, title: &str, slices: &[(String, u64)]) {
    ui.strong(title);

    let colors = series_colors(slices.len());
    let shares = percentages(slices);

    ui.horizontal(|ui: &mut Ui| {
        let size = CHART_HEIGHT.min(ui.available_width() * 0.6);
        let (response, painter) = ui.allocate_painter(egui::vec2(size, size), Sense::hover());
        let center = response.rect.center();
        let radius = size * 0.45;

        // Start at 12 o'clock and go clockwise; one triangle per arc step.
        let mut angle = -TAU / 4.0;
        for (i, pct) in shares.iter().enumerate() {
            let sweep = TAU * (*pct as f32) / 100.0;
            let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = angle + sweep * s as f32 / steps as f32;
                let a1 = angle + sweep * (s + 1) as f32 / steps as f32;
                let points = vec![
                    center,
                    center + radius * egui::vec2(a0.cos(), a0.sin()),
                    center + radius * egui::vec2(a1.cos(), a1.sin()),
                ];
                painter.add(egui::Shape::convex_polygon(points, colors[i], Stroke::NONE));
            }

            if *pct >= 3.0 {
                let mid = angle + sweep / 2.0;
                painter.text(
                    center + radius * 0.65 * egui::vec2(mid.cos(), mid.sin()),
                    egui::Align2::CENTER_CENTER,
                    format!("{pct:.1}%"),
                    egui::FontId::proportional(14.0),
                    text_on(colors[i]),
                );
            }
            angle += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            for ((label, n), c) in slices.iter().zip(&colors) {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                    ui.painter().rect_filled(swatch, 2.0, *c);
                    ui.label(format!("{label}: {n}"));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Heat map
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, title: &str, x_label: &str, y_label: &str, crosstab: &Crosstab) {
    ui.strong(title);
    if crosstab.is_empty() {
        ui.label(NO_RESULTS);
        return;
    }

    let cell = egui::vec2(80.0, 36.0);
    let shares = crosstab.row_normalized();

    ui.label(format!("Rows: {y_label}    Columns: {x_label}"));
    egui::Grid::new("payment_review_heatmap")
        .spacing(egui::vec2(2.0, 2.0))
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for col in &crosstab.columns {
                ui.strong(col);
            }
            ui.end_row();

            for (row, row_shares) in crosstab.rows.iter().zip(&shares) {
                ui.strong(row);
                for share in row_shares {
                    let fill = heat_color(*share);
                    let (rect, _) = ui.allocate_exact_size(cell, Sense::hover());
                    ui.painter().rect_filled(rect, 0.0, fill);
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("{:.2}%", share * 100.0),
                        egui::FontId::proportional(13.0),
                        text_on(fill),
                    );
                }
                ui.end_row();
            }
        });
}
