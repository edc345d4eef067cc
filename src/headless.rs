//! Text rendering of the dashboard for terminals and scripts.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::data::chart::{percentages, ChartData};
use crate::data::export::export_to_dir;
use crate::data::filter::FilteredView;
use crate::data::labels::thousands;
use crate::data::presentation::{build_report, Report, NO_RESULTS};

/// Load, filter and print the report selected by the command-line filters.
pub fn run(config: &Config) -> Result<()> {
    let table = crate::open_dataset(&config.data_dir)?;
    let filters = config.filter_state();
    let view = FilteredView::new(&table, &filters.predicates());
    let report = build_report(&table, &view, &filters);

    let mut stdout = io::stdout().lock();
    write_report(&mut stdout, table.len(), view.len(), &report).context("writing report")?;

    if config.export {
        let path = export_to_dir(&view, &config.export_dir)?;
        writeln!(stdout, "\nExported {} rows to {}", view.len(), path.display())?;
    }
    Ok(())
}

/// Write `report` as plain text.
pub fn write_report<W: Write>(
    out: &mut W,
    total: usize,
    filtered: usize,
    report: &Report,
) -> io::Result<()> {
    writeln!(out, "Filtered records: {} of {}", thousands(filtered), thousands(total))?;

    let (metrics, chart) = match report {
        Report::NoResults => {
            writeln!(out, "{NO_RESULTS}")?;
            return Ok(());
        }
        Report::Ready { metrics, chart } => (metrics, chart),
    };

    writeln!(out)?;
    for m in metrics {
        writeln!(out, "{:<26}{}", m.label, m.value)?;
    }
    writeln!(out)?;

    match chart {
        ChartData::Message(msg) => writeln!(out, "{msg}")?,
        ChartData::Bars { title, bars, .. } => {
            writeln!(out, "{title}")?;
            for (label, n) in bars {
                writeln!(out, "  {label:<40}{n:>8}")?;
            }
        }
        ChartData::Pie { title, slices } => {
            writeln!(out, "{title}")?;
            for ((label, n), pct) in slices.iter().zip(percentages(slices)) {
                writeln!(out, "  {label:<20}{n:>8}  {pct:>5.1}%")?;
            }
        }
        ChartData::StackedBars {
            title,
            legend_title,
            crosstab,
        } => {
            writeln!(out, "{title} ({legend_title})")?;
            write!(out, "  {:<40}", "")?;
            for col in &crosstab.columns {
                write!(out, "{col:>10}")?;
            }
            writeln!(out)?;
            for (row, counts) in crosstab.rows.iter().zip(&crosstab.counts) {
                write!(out, "  {row:<40}")?;
                for n in counts {
                    write!(out, "{n:>10}")?;
                }
                writeln!(out)?;
            }
        }
        ChartData::Heatmap {
            title,
            x_label,
            y_label,
            crosstab,
        } => {
            writeln!(out, "{title} ({y_label} × {x_label})")?;
            write!(out, "  {:<12}", "")?;
            for col in &crosstab.columns {
                write!(out, "{col:>9}")?;
            }
            writeln!(out)?;
            for (row, shares) in crosstab.rows.iter().zip(crosstab.row_normalized()) {
                write!(out, "  {row:<12}")?;
                for share in shares {
                    write!(out, "{:>8.2}%", share * 100.0)?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}
