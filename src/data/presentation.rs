use super::chart::{ChartData, ChartSpec};
use super::filter::{ActiveFilters, FilterState, FilteredView};
use super::model::FlatTable;
use super::summary::MetricKind::*;
use super::summary::{Metric, MetricSpec};

/// Hint shown when no filter toggle is on.
pub const ENABLE_FILTER_HINT: &str = "Enable at least one filter to see the analytical charts.";
/// Hint shown when all three toggles are on.
pub const NARROW_FILTERS_HINT: &str = "To see specific charts, enable only 1 or 2 filters.";
/// Shown in place of metrics and charts when the filtered view is empty.
pub const NO_RESULTS: &str = "No data found for the selected filters.";

/// The metrics and chart drawn for one combination of filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub metrics: &'static [MetricSpec],
    pub chart: ChartSpec,
}

/// Indexed by [`ActiveFilters::bits`]: category = 4, payment = 2, review = 1.
static PRESENTATIONS: [Presentation; 8] = [
    // ---
    Presentation {
        metrics: &[
            MetricSpec::new(OrderCount, "Total orders"),
            MetricSpec::new(DistinctPersons, "Total customers"),
            MetricSpec::new(DistinctCategories, "Unique categories"),
            MetricSpec::new(MeanReviewScore, "Average review"),
        ],
        chart: ChartSpec::Prompt(ENABLE_FILTER_HINT),
    },
    // --R
    Presentation {
        metrics: &[
            MetricSpec::new(RowCount, "Total reviews"),
            MetricSpec::new(TopCategory, "Most reviewed category"),
            MetricSpec::new(MeanPrice, "Average product price"),
        ],
        chart: ChartSpec::ReviewPie,
    },
    // -P-
    Presentation {
        metrics: &[
            MetricSpec::new(RowCount, "Total payments"),
            MetricSpec::new(MeanPaymentValue, "Average payment"),
            MetricSpec::new(TopCategory, "Most frequent category"),
            MetricSpec::new(MeanReviewScore, "Average review"),
        ],
        chart: ChartSpec::PaymentPie,
    },
    // -PR
    Presentation {
        metrics: &[
            MetricSpec::new(OrderCount, "Total orders"),
            MetricSpec::new(MeanPrice, "Average product price"),
            MetricSpec::new(TopCategory, "Most common category"),
        ],
        chart: ChartSpec::PaymentReviewHeatmap,
    },
    // C--
    Presentation {
        metrics: &[
            MetricSpec::new(OrderCount, "Total orders"),
            MetricSpec::new(MeanPrice, "Average product price"),
            MetricSpec::new(TopPaymentType, "Most used payment"),
            MetricSpec::new(MeanReviewScore, "Average review"),
        ],
        chart: ChartSpec::CategoryBar { top: 15 },
    },
    // C-R
    Presentation {
        metrics: &[
            MetricSpec::new(OrderCount, "Total orders"),
            MetricSpec::new(MeanPrice, "Average product price"),
            MetricSpec::new(TopPaymentType, "Most used payment"),
        ],
        chart: ChartSpec::ReviewByCategory { top: 5 },
    },
    // CP-
    Presentation {
        metrics: &[
            MetricSpec::new(OrderCount, "Total orders"),
            MetricSpec::new(MeanPrice, "Average product price"),
            MetricSpec::new(MeanReviewScore, "Average review"),
        ],
        chart: ChartSpec::PaymentByCategory { top: 10 },
    },
    // CPR
    Presentation {
        metrics: &[
            MetricSpec::new(OrderCount, "Total orders"),
            MetricSpec::new(MeanPrice, "Average product price"),
        ],
        chart: ChartSpec::Prompt(NARROW_FILTERS_HINT),
    },
];

impl Presentation {
    /// The layout for a toggle combination.
    pub fn select(active: ActiveFilters) -> &'static Presentation {
        &PRESENTATIONS[active.bits()]
    }
}

/// What the charts tab shows for the current filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    /// The filtered view is empty; nothing was aggregated.
    NoResults,
    Ready { metrics: Vec<Metric>, chart: ChartData },
}

/// Select the layout for `filters` and compute it over `view`.
///
/// `view` must be the view produced from `table` by `filters`.
pub fn build_report(table: &FlatTable, view: &FilteredView<'_>, filters: &FilterState) -> Report {
    if view.is_empty() {
        return Report::NoResults;
    }

    let layout = Presentation::select(filters.active_filters());
    let metrics = layout.metrics.iter().map(|m| m.compute(view)).collect();
    let chart = layout
        .chart
        .build(table, view, filters.has_category_selection());

    Report::Ready { metrics, chart }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::FlatRecord;
    use crate::data::summary::MetricKind;

    fn kinds(active: ActiveFilters) -> Vec<MetricKind> {
        Presentation::select(active)
            .metrics
            .iter()
            .map(|m| m.kind)
            .collect()
    }

    #[test]
    fn metric_lists_per_combination() {
        let a = ActiveFilters::new;
        assert_eq!(
            kinds(a(false, false, false)),
            vec![OrderCount, DistinctPersons, DistinctCategories, MeanReviewScore]
        );
        assert_eq!(
            kinds(a(true, false, false)),
            vec![OrderCount, MeanPrice, TopPaymentType, MeanReviewScore]
        );
        assert_eq!(
            kinds(a(false, true, false)),
            vec![RowCount, MeanPaymentValue, TopCategory, MeanReviewScore]
        );
        assert_eq!(kinds(a(false, false, true)), vec![RowCount, TopCategory, MeanPrice]);
        assert_eq!(kinds(a(true, true, false)), vec![OrderCount, MeanPrice, MeanReviewScore]);
        assert_eq!(kinds(a(true, false, true)), vec![OrderCount, MeanPrice, TopPaymentType]);
        assert_eq!(kinds(a(false, true, true)), vec![OrderCount, MeanPrice, TopCategory]);
        assert_eq!(kinds(a(true, true, true)), vec![OrderCount, MeanPrice]);
    }

    #[test]
    fn chart_per_combination() {
        let chart = |c, p, r| Presentation::select(ActiveFilters::new(c, p, r)).chart;
        assert_eq!(chart(false, false, false), ChartSpec::Prompt(ENABLE_FILTER_HINT));
        assert_eq!(chart(true, false, false), ChartSpec::CategoryBar { top: 15 });
        assert_eq!(chart(false, true, false), ChartSpec::PaymentPie);
        assert_eq!(chart(false, false, true), ChartSpec::ReviewPie);
        assert_eq!(chart(true, true, false), ChartSpec::PaymentByCategory { top: 10 });
        assert_eq!(chart(true, false, true), ChartSpec::ReviewByCategory { top: 5 });
        assert_eq!(chart(false, true, true), ChartSpec::PaymentReviewHeatmap);
        assert_eq!(chart(true, true, true), ChartSpec::Prompt(NARROW_FILTERS_HINT));
    }

    fn table() -> FlatTable {
        let rec = |category: &str, payment: &str, score: u8| FlatRecord {
            customer_unique_id: "u1".into(),
            order_id: Some(format!("{category}-{payment}")),
            product_category_name: Some(category.into()),
            price: Some(50.0),
            freight_value: Some(5.0),
            payment_type: payment.into(),
            payment_installments: Some(2),
            payment_value: Some(55.0),
            order_status: Some("delivered".into()),
            review_score: score,
        };
        FlatTable::from_records(
            vec![rec("toys", "boleto", 5), rec("books", "voucher", 2)],
            BTreeMap::new(),
        )
    }

    #[test]
    fn empty_view_short_circuits() {
        let table = table();
        let mut filters = FilterState::default();
        filters.set_payment_enabled(true);
        filters.select_payment("debit_card");
        let view = FilteredView::new(&table, &filters.predicates());

        assert_eq!(build_report(&table, &view, &filters), Report::NoResults);
    }

    #[test]
    fn all_three_filters_suppress_the_chart_but_keep_metrics() {
        let table = table();
        let mut filters = FilterState::default();
        filters.set_category_enabled(true);
        filters.set_payment_enabled(true);
        filters.set_review_enabled(true);
        let view = FilteredView::new(&table, &filters.predicates());

        let Report::Ready { metrics, chart } = build_report(&table, &view, &filters) else {
            panic!("expected a report");
        };
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].label, "Total orders");
        assert_eq!(chart, ChartData::Message(NARROW_FILTERS_HINT));
    }
}
