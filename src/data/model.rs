use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::filter::{FilteredView, Predicate};

// ---------------------------------------------------------------------------
// Raw rows – one struct per source table
// ---------------------------------------------------------------------------

/// Row of `olist_customers_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    /// One person may own several `customer_id`s.
    pub customer_unique_id: String,
}

/// Row of `olist_orders_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: Option<String>,
}

/// Row of `olist_order_items_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: String,
    pub product_id: String,
    pub price: Option<f64>,
    pub freight_value: Option<f64>,
}

/// Row of `olist_products_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub product_category_name: Option<String>,
}

/// Row of `olist_order_payments_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub order_id: String,
    pub payment_type: Option<String>,
    pub payment_installments: Option<u32>,
    pub payment_value: Option<f64>,
}

/// Row of `olist_order_reviews_dataset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub order_id: String,
    pub review_score: Option<u8>,
}

/// Row of `product_category_name_translation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTranslation {
    pub product_category_name: String,
    pub product_category_name_english: String,
}

/// Every table the dashboard reads at startup.
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub payments: Vec<Payment>,
    pub reviews: Vec<Review>,
    pub categories: Vec<CategoryTranslation>,
}

// ---------------------------------------------------------------------------
// FlatRecord – one denormalized row
// ---------------------------------------------------------------------------

/// Column names of [`FlatRecord`], in export / display order.
pub const FLAT_COLUMNS: [&str; 10] = [
    "customer_unique_id",
    "order_id",
    "product_category_name",
    "price",
    "freight_value",
    "payment_type",
    "payment_installments",
    "payment_value",
    "order_status",
    "review_score",
];

/// A (customer, order, item, payment, review) combination after the join.
///
/// `payment_type` and `review_score` are guaranteed present once a record is
/// part of a [`FlatTable`]; every other attribute may be missing because the
/// join is a chain of left-joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub customer_unique_id: String,
    pub order_id: Option<String>,
    pub product_category_name: Option<String>,
    pub price: Option<f64>,
    pub freight_value: Option<f64>,
    pub payment_type: String,
    pub payment_installments: Option<u32>,
    pub payment_value: Option<f64>,
    pub order_status: Option<String>,
    pub review_score: u8,
}

impl FlatRecord {
    /// Render every column as display text, in [`FLAT_COLUMNS`] order.
    pub fn cells(&self) -> [String; 10] {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(|x| x.to_string()).unwrap_or_default()
        }
        fn money(v: Option<f64>) -> String {
            v.map(|x| format!("{x:.2}")).unwrap_or_default()
        }
        [
            self.customer_unique_id.clone(),
            opt(&self.order_id),
            opt(&self.product_category_name),
            money(self.price),
            money(self.freight_value),
            self.payment_type.clone(),
            opt(&self.payment_installments),
            money(self.payment_value),
            opt(&self.order_status),
            self.review_score.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// FlatTable – the joined dataset with pre-computed selector values
// ---------------------------------------------------------------------------

/// The cleaned join result. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct FlatTable {
    /// All records, in join order.
    pub records: Vec<FlatRecord>,
    /// Sorted distinct non-null category names.
    pub categories: BTreeSet<String>,
    /// Sorted distinct payment type codes.
    pub payment_types: BTreeSet<String>,
    /// Sorted distinct review scores.
    pub review_scores: BTreeSet<u8>,
    /// Portuguese category name → English name, where known.
    pub category_labels: BTreeMap<String, String>,
}

impl FlatTable {
    /// Build the selector indices from the records.
    pub fn from_records(
        records: Vec<FlatRecord>,
        category_labels: BTreeMap<String, String>,
    ) -> Self {
        let mut categories = BTreeSet::new();
        let mut payment_types = BTreeSet::new();
        let mut review_scores = BTreeSet::new();

        for rec in &records {
            if let Some(cat) = &rec.product_category_name {
                categories.insert(cat.clone());
            }
            payment_types.insert(rec.payment_type.clone());
            review_scores.insert(rec.review_score);
        }

        FlatTable {
            records,
            categories,
            payment_types,
            review_scores,
            category_labels,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows matching every predicate.
    pub fn filter(&self, predicates: &[Predicate]) -> FilteredView<'_> {
        FilteredView::new(self, predicates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Option<&str>, payment: &str, score: u8) -> FlatRecord {
        FlatRecord {
            customer_unique_id: "p1".into(),
            order_id: Some("o1".into()),
            product_category_name: category.map(str::to_string),
            price: Some(10.0),
            freight_value: None,
            payment_type: payment.into(),
            payment_installments: Some(1),
            payment_value: Some(12.5),
            order_status: Some("delivered".into()),
            review_score: score,
        }
    }

    #[test]
    fn from_records_collects_sorted_selector_values() {
        let table = FlatTable::from_records(
            vec![
                record(Some("toys"), "voucher", 4),
                record(None, "boleto", 1),
                record(Some("bed_bath_table"), "boleto", 4),
            ],
            BTreeMap::new(),
        );

        assert_eq!(table.len(), 3);
        let cats: Vec<_> = table.categories.iter().cloned().collect();
        assert_eq!(cats, vec!["bed_bath_table", "toys"]);
        let pays: Vec<_> = table.payment_types.iter().cloned().collect();
        assert_eq!(pays, vec!["boleto", "voucher"]);
        let scores: Vec<_> = table.review_scores.iter().copied().collect();
        assert_eq!(scores, vec![1, 4]);
    }

    #[test]
    fn cells_render_missing_values_as_blank() {
        let cells = record(None, "boleto", 3).cells();
        assert_eq!(cells.len(), FLAT_COLUMNS.len());
        assert_eq!(cells[2], "");
        assert_eq!(cells[3], "10.00");
        assert_eq!(cells[4], "");
        assert_eq!(cells[9], "3");
    }
}
