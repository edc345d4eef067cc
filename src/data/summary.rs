use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use super::filter::FilteredView;
use super::labels::{payment_label, thousands};

// ---------------------------------------------------------------------------
// Aggregation helpers
// ---------------------------------------------------------------------------

/// Count occurrences, most frequent first.
///
/// Ties keep the order in which values first appear in the input, so the
/// result is fully determined by row order.
pub fn value_counts<K, I>(values: I) -> Vec<(K, usize)>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (pos, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, pos)).0 += 1;
    }
    let mut out: Vec<(K, usize, usize)> = counts
        .into_iter()
        .map(|(k, (count, first))| (k, count, first))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    out.into_iter().map(|(k, count, _)| (k, count)).collect()
}

/// The most frequent value; on a tie the one seen first wins.
pub fn most_frequent<K, I>(values: I) -> Option<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    value_counts(values).into_iter().next().map(|(k, _)| k)
}

/// Arithmetic mean of the values; `None` when there are none.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn distinct<K: Eq + Hash, I: IntoIterator<Item = K>>(values: I) -> usize {
    values.into_iter().collect::<HashSet<_>>().len()
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// A summary figure that can be computed over a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Distinct order ids.
    OrderCount,
    /// Rows in the view.
    RowCount,
    /// Distinct `customer_unique_id`s.
    DistinctPersons,
    /// Distinct categories; a missing category counts as one value.
    DistinctCategories,
    MeanReviewScore,
    MeanPrice,
    MeanPaymentValue,
    TopPaymentType,
    TopCategory,
}

/// A computed metric value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Count(usize),
    Score(Option<f64>),
    Money(Option<f64>),
    Label(Option<String>),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", thousands(*n)),
            MetricValue::Score(Some(v)) => write!(f, "{v:.2}"),
            MetricValue::Money(Some(v)) => write!(f, "R${v:.2}"),
            MetricValue::Label(Some(s)) => write!(f, "{s}"),
            MetricValue::Score(None) | MetricValue::Money(None) | MetricValue::Label(None) => {
                write!(f, "n/a")
            }
        }
    }
}

impl MetricKind {
    /// Compute this metric over `view`.
    ///
    /// Callers short-circuit empty views; over zero rows the means and
    /// lookups come back as "not available" rather than NaN.
    pub fn compute(self, view: &FilteredView<'_>) -> MetricValue {
        match self {
            MetricKind::OrderCount => {
                MetricValue::Count(distinct(view.iter().filter_map(|r| r.order_id.as_deref())))
            }
            MetricKind::RowCount => MetricValue::Count(view.len()),
            MetricKind::DistinctPersons => {
                MetricValue::Count(distinct(view.iter().map(|r| r.customer_unique_id.as_str())))
            }
            MetricKind::DistinctCategories => MetricValue::Count(distinct(
                view.iter().map(|r| r.product_category_name.as_deref()),
            )),
            MetricKind::MeanReviewScore => {
                MetricValue::Score(mean(view.iter().map(|r| f64::from(r.review_score))))
            }
            MetricKind::MeanPrice => MetricValue::Money(mean(view.iter().filter_map(|r| r.price))),
            MetricKind::MeanPaymentValue => {
                MetricValue::Money(mean(view.iter().filter_map(|r| r.payment_value)))
            }
            MetricKind::TopPaymentType => MetricValue::Label(
                most_frequent(view.iter().map(|r| r.payment_type.as_str()))
                    .map(|code| payment_label(code).to_string()),
            ),
            MetricKind::TopCategory => MetricValue::Label(
                most_frequent(view.iter().filter_map(|r| r.product_category_name.as_deref()))
                    .map(str::to_string),
            ),
        }
    }
}

/// One metric slot of a layout: what to compute and its caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub kind: MetricKind,
    pub label: &'static str,
}

impl MetricSpec {
    pub const fn new(kind: MetricKind, label: &'static str) -> Self {
        Self { kind, label }
    }

    pub fn compute(&self, view: &FilteredView<'_>) -> Metric {
        Metric {
            label: self.label,
            value: self.kind.compute(view),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: MetricValue,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::filter::Predicate;
    use crate::data::model::{FlatRecord, FlatTable};

    fn rec(
        order: &str,
        person: &str,
        category: Option<&str>,
        payment: &str,
        score: u8,
    ) -> FlatRecord {
        FlatRecord {
            customer_unique_id: person.into(),
            order_id: Some(order.into()),
            product_category_name: category.map(str::to_string),
            price: Some(f64::from(score) * 10.0),
            freight_value: Some(1.0),
            payment_type: payment.into(),
            payment_installments: Some(1),
            payment_value: Some(100.0),
            order_status: Some("delivered".into()),
            review_score: score,
        }
    }

    fn table() -> FlatTable {
        let mut second_item = rec("o1", "u1", Some("toys"), "voucher", 5);
        second_item.price = None;
        FlatTable::from_records(
            vec![
                rec("o1", "u1", Some("toys"), "credit_card", 5),
                second_item,
                rec("o2", "u1", Some("garden_tools"), "boleto", 3),
                rec("o3", "u2", None, "boleto", 1),
            ],
            BTreeMap::new(),
        )
    }

    #[test]
    fn value_counts_orders_by_count_then_first_seen() {
        let counts = value_counts(["b", "a", "c", "a", "b", "d"]);
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn most_frequent_tie_goes_to_first_in_row_order() {
        // Two-way tie: row order decides, not lexical order.
        assert_eq!(most_frequent(["voucher", "boleto", "boleto", "voucher"]), Some("voucher"));
        assert_eq!(most_frequent(["boleto", "voucher", "voucher", "boleto"]), Some("boleto"));
        assert_eq!(most_frequent(Vec::<&str>::new()), None);
    }

    #[test]
    fn mean_of_nothing_is_not_available() {
        assert_eq!(mean(Vec::new()), None);
        assert_eq!(mean([1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn counts_over_the_view() {
        let table = table();
        let view = FilteredView::all(&table);
        assert_eq!(MetricKind::RowCount.compute(&view), MetricValue::Count(4));
        assert_eq!(MetricKind::OrderCount.compute(&view), MetricValue::Count(3));
        assert_eq!(MetricKind::DistinctPersons.compute(&view), MetricValue::Count(2));
        assert_eq!(MetricKind::DistinctCategories.compute(&view), MetricValue::Count(3));
    }

    #[test]
    fn missing_category_counts_as_one_distinct_value() {
        let table = FlatTable::from_records(
            vec![
                rec("o1", "u1", Some("toys"), "boleto", 5),
                rec("o2", "u2", None, "boleto", 4),
                rec("o3", "u3", None, "voucher", 3),
            ],
            BTreeMap::new(),
        );
        let view = FilteredView::all(&table);
        assert_eq!(MetricKind::DistinctCategories.compute(&view), MetricValue::Count(2));

        let named = view.refine(&[Predicate::Review([5].into_iter().collect())]);
        assert_eq!(MetricKind::DistinctCategories.compute(&named), MetricValue::Count(1));
    }

    #[test]
    fn means_skip_missing_cells() {
        let table = table();
        let view = FilteredView::all(&table);
        // prices: 50, -, 30, 10
        assert_eq!(MetricKind::MeanPrice.compute(&view), MetricValue::Money(Some(30.0)));
        assert_eq!(MetricKind::MeanReviewScore.compute(&view), MetricValue::Score(Some(3.5)));
        assert_eq!(MetricKind::MeanPaymentValue.compute(&view), MetricValue::Money(Some(100.0)));
    }

    #[test]
    fn lookups_translate_and_skip_nulls() {
        let table = table();
        let view = FilteredView::all(&table);
        assert_eq!(
            MetricKind::TopPaymentType.compute(&view),
            MetricValue::Label(Some("Boleto".into()))
        );
        assert_eq!(
            MetricKind::TopCategory.compute(&view),
            MetricValue::Label(Some("toys".into()))
        );

        let only_null = view.refine(&[Predicate::Review([1].into_iter().collect())]);
        assert_eq!(MetricKind::TopCategory.compute(&only_null), MetricValue::Label(None));
    }

    #[test]
    fn empty_view_yields_unavailable_values_not_nan() {
        let table = table();
        let view = FilteredView::new(&table, &[Predicate::Payment("pix".into())]);
        assert_eq!(MetricKind::MeanPrice.compute(&view), MetricValue::Money(None));
        assert_eq!(MetricKind::MeanReviewScore.compute(&view).to_string(), "n/a");
        assert_eq!(MetricKind::OrderCount.compute(&view), MetricValue::Count(0));
    }

    #[test]
    fn metric_display() {
        assert_eq!(MetricValue::Count(12345).to_string(), "12,345");
        assert_eq!(MetricValue::Score(Some(4.0867)).to_string(), "4.09");
        assert_eq!(MetricValue::Money(Some(120.5)).to_string(), "R$120.50");
        assert_eq!(MetricValue::Label(Some("Boleto".into())).to_string(), "Boleto");
    }
}
