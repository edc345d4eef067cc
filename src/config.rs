use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::FilterState;

pub const ENV_DATA_DIR: &str = "OLIST_DATA_DIR";
pub const ENV_EXPORT_DIR: &str = "OLIST_EXPORT_DIR";

#[derive(Debug, Clone, Parser)]
#[command(name = "olist-dashboard")]
#[command(version, about = "Olist e-commerce analytics dashboard", long_about = None)]
pub struct Config {
    /// Directory holding the olist_*.csv / .json / .parquet tables
    #[arg(long, env = ENV_DATA_DIR, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory where exported CSV files are written
    #[arg(long, env = ENV_EXPORT_DIR, default_value = ".")]
    pub export_dir: PathBuf,

    /// Print the report to stdout instead of opening the window
    #[arg(long)]
    pub headless: bool,

    /// Turn the category filter on without selecting a category
    #[arg(long)]
    pub by_category: bool,

    /// Turn the payment filter on without selecting a type
    #[arg(long)]
    pub by_payment: bool,

    /// Turn the review filter on without selecting a score
    #[arg(long)]
    pub by_review: bool,

    /// Keep rows of this category (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Keep rows paid with this payment type code
    #[arg(long, value_name = "CODE")]
    pub payment: Option<String>,

    /// Keep rows with this review score (repeatable)
    #[arg(
        long = "review",
        value_name = "SCORE",
        value_parser = clap::value_parser!(u8).range(1..=5)
    )]
    pub reviews: Vec<u8>,

    /// Also write the filtered rows as a timestamped CSV (headless only)
    #[arg(long, requires = "headless")]
    pub export: bool,
}

impl Config {
    /// Initial filter toggles and selections from the command line.
    ///
    /// Giving a selection for a dimension turns its toggle on.
    pub fn filter_state(&self) -> FilterState {
        let mut state = FilterState::default();

        state.set_category_enabled(self.by_category || !self.categories.is_empty());
        state.categories = self.categories.iter().cloned().collect();

        state.set_payment_enabled(self.by_payment || self.payment.is_some());
        state.payment = self.payment.clone();

        state.set_review_enabled(self.by_review || !self.reviews.is_empty());
        state.reviews = self.reviews.iter().copied().collect();

        state
    }
}
