use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use super::filter::FilteredView;
use super::model::FLAT_COLUMNS;

/// `filtered_data_YYYYMMDD_HHMMSS.csv`
pub fn export_file_name(at: NaiveDateTime) -> String {
    format!("filtered_data_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Write the view as UTF-8 CSV: header row, no index column.
///
/// The header is written even when the view is empty. Returns the number of
/// data rows written.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<usize> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    out.write_record(FLAT_COLUMNS).context("writing CSV header")?;
    for (row_no, rec) in view.iter().enumerate() {
        out.serialize(rec)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(view.len())
}

/// Export into `path`, replacing any existing file.
pub fn export_to_path(view: &FilteredView<'_>, path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path:?}"))?;
    let rows = write_csv(view, std::io::BufWriter::new(file))?;
    log::info!("Exported {rows} rows to {}", path.display());
    Ok(rows)
}

/// Export into `dir` under a name stamped with the current local time.
pub fn export_to_dir(view: &FilteredView<'_>, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(chrono::Local::now().naive_local()));
    export_to_path(view, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::Predicate;
    use crate::data::model::{FlatRecord, FlatTable};

    fn table() -> FlatTable {
        let rec = |order: &str, category: Option<&str>, payment: &str, score: u8| FlatRecord {
            customer_unique_id: format!("person-{order}"),
            order_id: Some(order.into()),
            product_category_name: category.map(str::to_string),
            price: Some(19.9),
            freight_value: None,
            payment_type: payment.into(),
            payment_installments: Some(3),
            payment_value: Some(25.35),
            order_status: Some("delivered".into()),
            review_score: score,
        };
        FlatTable::from_records(
            vec![
                rec("o1", Some("cama_mesa_banho"), "credit_card", 5),
                rec("o2", None, "boleto", 1),
                rec("o3", Some("toys, games"), "credit_card", 4),
            ],
            BTreeMap::new(),
        )
    }

    #[test]
    fn file_name_is_timestamped() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 1))
            .unwrap();
        assert_eq!(export_file_name(at), "filtered_data_20240307_090501.csv");
    }

    #[test]
    fn round_trip_keeps_rows_and_columns() {
        let table = table();
        let view = FilteredView::new(&table, &[Predicate::Payment("credit_card".into())]);

        let mut buf = Vec::new();
        assert_eq!(write_csv(&view, &mut buf).unwrap(), 2);

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, FLAT_COLUMNS);

        let parsed: Vec<FlatRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(parsed.len(), view.len());
        assert_eq!(parsed[1].product_category_name.as_deref(), Some("toys, games"));
        assert_eq!(parsed[0].freight_value, None);
    }

    #[test]
    fn empty_view_still_writes_the_header() {
        let table = table();
        let view = FilteredView::new(&table, &[Predicate::Payment("voucher".into())]);

        let mut buf = Vec::new();
        assert_eq!(write_csv(&view, &mut buf).unwrap(), 0);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), FLAT_COLUMNS.join(","));
    }

    #[test]
    fn export_to_dir_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = table();
        let view = FilteredView::all(&table);

        let path = export_to_dir(&view, dir.path()).unwrap();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(name.starts_with("filtered_data_") && name.ends_with(".csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.records().count(), 3);
    }
}
