use std::path::PathBuf;

/// Conditions the loader reports as typed errors.
///
/// They travel inside `anyhow::Error` and can be recovered with
/// `err.downcast_ref::<DatasetError>()`.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// No file with any supported extension exists for a required table.
    #[error("missing table '{table}' in {dir:?} (looked for .csv, .json, .parquet)")]
    MissingTable { table: String, dir: PathBuf },

    #[error("unsupported file extension: .{extension}")]
    UnsupportedExtension { extension: String },

    /// The JSON document is not a records-oriented array of objects.
    #[error("expected a top-level JSON array of objects in {path:?}")]
    NotJsonRecords { path: PathBuf },

    /// A Parquet column whose type has no scalar JSON form.
    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumn { column: String, data_type: String },
}
