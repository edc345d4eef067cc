//! Analytics dashboard over the Olist Brazilian e-commerce dataset.
//!
//! The dataset tables are loaded once, left-joined into a flat record table,
//! and then filtered per interaction by product category, payment type and
//! review score. The set of switched-on filters picks which metrics and which
//! chart are shown.

use std::path::Path;

use anyhow::Result;

pub mod config;
pub mod data;
pub mod headless;

use data::model::FlatTable;

/// Load every table under `dir` and join them.
pub fn open_dataset(dir: &Path) -> Result<FlatTable> {
    let raw = data::loader::load_dataset(dir)?;
    Ok(data::join::join(&raw))
}
