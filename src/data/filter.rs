use std::collections::BTreeSet;

use super::model::{FlatRecord, FlatTable};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One active constraint on a filter dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Keep rows whose category is one of these.
    Category(BTreeSet<String>),
    /// Keep rows paid with exactly this type.
    Payment(String),
    /// Keep rows whose review score is one of these.
    Review(BTreeSet<u8>),
}

impl Predicate {
    pub fn matches(&self, rec: &FlatRecord) -> bool {
        match self {
            Predicate::Category(set) => rec
                .product_category_name
                .as_ref()
                .is_some_and(|c| set.contains(c)),
            Predicate::Payment(kind) => rec.payment_type == *kind,
            Predicate::Review(scores) => scores.contains(&rec.review_score),
        }
    }
}

/// Return indices of records that pass every predicate.
///
/// An empty predicate list keeps everything.
pub fn filtered_indices(table: &FlatTable, predicates: &[Predicate]) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| predicates.iter().all(|p| p.matches(rec)))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Filter controls
// ---------------------------------------------------------------------------

/// Which filter toggles are switched on.
///
/// This drives the presentation layout and is independent of whether the
/// toggle's selection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ActiveFilters {
    pub category: bool,
    pub payment: bool,
    pub review: bool,
}

impl ActiveFilters {
    pub const fn new(category: bool, payment: bool, review: bool) -> Self {
        Self {
            category,
            payment,
            review,
        }
    }

    /// 3-bit key: category = 4, payment = 2, review = 1.
    pub const fn bits(self) -> usize {
        (self.category as usize) << 2 | (self.payment as usize) << 1 | self.review as usize
    }
}

/// The three toggles and their selections.
///
/// A selection only counts while its toggle is on; switching a toggle off
/// discards it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub category_enabled: bool,
    pub categories: BTreeSet<String>,
    pub payment_enabled: bool,
    pub payment: Option<String>,
    pub review_enabled: bool,
    pub reviews: BTreeSet<u8>,
}

impl FilterState {
    pub fn active_filters(&self) -> ActiveFilters {
        ActiveFilters::new(self.category_enabled, self.payment_enabled, self.review_enabled)
    }

    /// The predicates currently constraining the view.
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::with_capacity(3);
        if self.category_enabled && !self.categories.is_empty() {
            out.push(Predicate::Category(self.categories.clone()));
        }
        if self.payment_enabled {
            if let Some(kind) = &self.payment {
                out.push(Predicate::Payment(kind.clone()));
            }
        }
        if self.review_enabled && !self.reviews.is_empty() {
            out.push(Predicate::Review(self.reviews.clone()));
        }
        out
    }

    /// Whether an explicit category selection is in force.
    pub fn has_category_selection(&self) -> bool {
        self.category_enabled && !self.categories.is_empty()
    }

    pub fn set_category_enabled(&mut self, on: bool) {
        self.category_enabled = on;
        if !on {
            self.categories.clear();
        }
    }

    pub fn set_payment_enabled(&mut self, on: bool) {
        self.payment_enabled = on;
        if !on {
            self.payment = None;
        }
    }

    pub fn set_review_enabled(&mut self, on: bool) {
        self.review_enabled = on;
        if !on {
            self.reviews.clear();
        }
    }

    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }

    /// Single-select: choosing the current type again clears the selection.
    pub fn select_payment(&mut self, kind: &str) {
        if self.payment.as_deref() == Some(kind) {
            self.payment = None;
        } else {
            self.payment = Some(kind.to_string());
        }
    }

    pub fn toggle_review(&mut self, score: u8) {
        if !self.reviews.remove(&score) {
            self.reviews.insert(score);
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// A transient subset of a [`FlatTable`], same schema, row order preserved.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a FlatTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn new(table: &'a FlatTable, predicates: &[Predicate]) -> Self {
        Self {
            table,
            indices: filtered_indices(table, predicates),
        }
    }

    /// The unfiltered table as a view.
    pub fn all(table: &'a FlatTable) -> Self {
        Self::from_indices(table, (0..table.len()).collect())
    }

    pub fn from_indices(table: &'a FlatTable, indices: Vec<usize>) -> Self {
        Self { table, indices }
    }

    /// Narrow this view further.
    pub fn refine(&self, predicates: &[Predicate]) -> Self {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| predicates.iter().all(|p| p.matches(&self.table.records[i])))
            .collect();
        Self::from_indices(self.table, indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a FlatRecord> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.records[i])
    }
}
