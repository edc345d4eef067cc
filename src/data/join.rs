use std::collections::{BTreeMap, HashMap};

use super::model::{FlatRecord, FlatTable, RawTables};

/// Payment type codes that mean "no usable payment type".
pub const UNDEFINED_PAYMENT_TYPES: [&str; 2] = ["not_defined", "undefined"];

/// Group row indices of `rows` by key, preserving row order inside each group.
fn index_by<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
) -> HashMap<&'a str, Vec<usize>> {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        index.entry(key(row)).or_default().push(i);
    }
    index
}

/// Left-join lookup: the matching rows, or a single `None` when there are none.
fn matches<'a, T>(
    rows: &'a [T],
    index: &HashMap<&str, Vec<usize>>,
    key: Option<&str>,
) -> Vec<Option<&'a T>> {
    match key.and_then(|k| index.get(k)) {
        Some(hits) => hits.iter().map(|&i| Some(&rows[i])).collect(),
        None => vec![None],
    }
}

/// Join the raw tables into the flat, cleaned record table.
///
/// Chain of left-joins anchored on customers:
/// customers → orders (`customer_id`) → items (`order_id`) → products
/// (`product_id`) → payments (`order_id`) → reviews (`order_id`).
/// Rows come out in left-table order, each fanned out over its matches in
/// right-table order. Rows without a defined payment type or without a
/// review score are then dropped.
pub fn join(raw: &RawTables) -> FlatTable {
    let orders_by_customer = index_by(&raw.orders, |o| o.customer_id.as_str());
    let items_by_order = index_by(&raw.items, |i| i.order_id.as_str());
    let products_by_id = index_by(&raw.products, |p| p.product_id.as_str());
    let payments_by_order = index_by(&raw.payments, |p| p.order_id.as_str());
    let reviews_by_order = index_by(&raw.reviews, |r| r.order_id.as_str());

    let mut joined = 0usize;
    let mut records = Vec::new();

    for customer in &raw.customers {
        let customer_id = Some(customer.customer_id.as_str());
        for order in matches(&raw.orders, &orders_by_customer, customer_id) {
            let order_id = order.map(|o| o.order_id.as_str());

            for item in matches(&raw.items, &items_by_order, order_id) {
                let product_id = item.map(|i| i.product_id.as_str());

                for product in matches(&raw.products, &products_by_id, product_id) {
                    for payment in matches(&raw.payments, &payments_by_order, order_id) {
                        for review in matches(&raw.reviews, &reviews_by_order, order_id) {
                            joined += 1;

                            let payment_type = payment
                                .and_then(|p| p.payment_type.as_deref())
                                .filter(|t| !UNDEFINED_PAYMENT_TYPES.contains(t));
                            let review_score = review.and_then(|r| r.review_score);

                            let (Some(payment_type), Some(review_score)) =
                                (payment_type, review_score)
                            else {
                                continue;
                            };

                            records.push(FlatRecord {
                                customer_unique_id: customer.customer_unique_id.clone(),
                                order_id: order_id.map(str::to_string),
                                product_category_name: product
                                    .and_then(|p| p.product_category_name.clone()),
                                price: item.and_then(|i| i.price),
                                freight_value: item.and_then(|i| i.freight_value),
                                payment_type: payment_type.to_string(),
                                payment_installments: payment
                                    .and_then(|p| p.payment_installments),
                                payment_value: payment.and_then(|p| p.payment_value),
                                order_status: order.and_then(|o| o.order_status.clone()),
                                review_score,
                            });
                        }
                    }
                }
            }
        }
    }

    log::info!(
        "Joined {joined} rows, kept {} after dropping {} without payment type or review score",
        records.len(),
        joined - records.len()
    );

    let labels: BTreeMap<String, String> = raw
        .categories
        .iter()
        .map(|c| (c.product_category_name.clone(), c.product_category_name_english.clone()))
        .collect();

    FlatTable::from_records(records, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::*;

    fn customer(id: &str, person: &str) -> Customer {
        Customer {
            customer_id: id.into(),
            customer_unique_id: person.into(),
        }
    }

    fn order(id: &str, customer: &str) -> Order {
        Order {
            order_id: id.into(),
            customer_id: customer.into(),
            order_status: Some("delivered".into()),
        }
    }

    fn item(order: &str, product: &str, price: f64) -> OrderItem {
        OrderItem {
            order_id: order.into(),
            product_id: product.into(),
            price: Some(price),
            freight_value: Some(1.5),
        }
    }

    fn product(id: &str, category: Option<&str>) -> Product {
        Product {
            product_id: id.into(),
            product_category_name: category.map(str::to_string),
        }
    }

    fn payment(order: &str, kind: Option<&str>, value: f64) -> Payment {
        Payment {
            order_id: order.into(),
            payment_type: kind.map(str::to_string),
            payment_installments: Some(1),
            payment_value: Some(value),
        }
    }

    fn review(order: &str, score: Option<u8>) -> Review {
        Review {
            order_id: order.into(),
            review_score: score,
        }
    }

    #[test]
    fn two_customer_scenario_yields_two_rows() {
        let raw = RawTables {
            customers: vec![customer("c1", "u1"), customer("c2", "u2")],
            orders: vec![order("o1", "c1"), order("o2", "c2")],
            items: vec![item("o1", "p1", 10.0), item("o2", "p2", 20.0)],
            products: vec![product("p1", Some("toys")), product("p2", Some("toys"))],
            payments: vec![
                payment("o1", Some("boleto"), 11.5),
                payment("o2", Some("credit_card"), 21.5),
            ],
            reviews: vec![review("o1", Some(5)), review("o2", Some(1))],
            categories: vec![CategoryTranslation {
                product_category_name: "toys".into(),
                product_category_name_english: "toys".into(),
            }],
        };

        let table = join(&raw);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].customer_unique_id, "u1");
        assert_eq!(table.records[0].payment_type, "boleto");
        assert_eq!(table.records[0].review_score, 5);
        assert_eq!(table.records[1].payment_type, "credit_card");
        assert_eq!(table.records[1].price, Some(20.0));
        assert_eq!(table.category_labels.get("toys").map(String::as_str), Some("toys"));
    }

    #[test]
    fn unmatched_rows_are_dropped_by_the_cleaning_step() {
        let raw = RawTables {
            // c2 has no order, o3 has no review, o4 has an undefined payment.
            customers: vec![
                customer("c1", "u1"),
                customer("c2", "u2"),
                customer("c3", "u3"),
                customer("c4", "u4"),
            ],
            orders: vec![order("o1", "c1"), order("o3", "c3"), order("o4", "c4")],
            items: vec![item("o1", "p1", 10.0), item("o3", "p1", 10.0), item("o4", "p1", 10.0)],
            products: vec![product("p1", None)],
            payments: vec![
                payment("o1", Some("voucher"), 5.0),
                payment("o3", Some("boleto"), 5.0),
                payment("o4", Some("not_defined"), 5.0),
            ],
            reviews: vec![review("o1", Some(3)), review("o4", Some(4))],
            categories: vec![],
        };

        let table = join(&raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].order_id.as_deref(), Some("o1"));
        assert_eq!(table.records[0].product_category_name, None);
        assert!(table.categories.is_empty());
    }

    #[test]
    fn order_without_items_keeps_null_item_columns() {
        let raw = RawTables {
            customers: vec![customer("c1", "u1")],
            orders: vec![order("o1", "c1")],
            payments: vec![payment("o1", Some("boleto"), 7.0)],
            reviews: vec![review("o1", Some(2))],
            ..RawTables::default()
        };

        let table = join(&raw);
        assert_eq!(table.len(), 1);
        let rec = &table.records[0];
        assert_eq!(rec.price, None);
        assert_eq!(rec.product_category_name, None);
        assert_eq!(rec.payment_value, Some(7.0));
    }

    #[test]
    fn duplicate_keys_fan_out_in_right_table_order() {
        let raw = RawTables {
            customers: vec![customer("c1", "u1")],
            orders: vec![order("o1", "c1")],
            items: vec![item("o1", "p1", 1.0), item("o1", "p2", 2.0)],
            products: vec![product("p1", Some("a")), product("p2", Some("b"))],
            payments: vec![
                payment("o1", Some("credit_card"), 1.0),
                payment("o1", Some("voucher"), 2.0),
            ],
            reviews: vec![review("o1", Some(4))],
            categories: vec![],
        };

        let table = join(&raw);
        let got: Vec<(Option<&str>, &str)> = table
            .records
            .iter()
            .map(|r| (r.product_category_name.as_deref(), r.payment_type.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (Some("a"), "credit_card"),
                (Some("a"), "voucher"),
                (Some("b"), "credit_card"),
                (Some("b"), "voucher"),
            ]
        );
    }

    #[test]
    fn no_record_has_a_missing_or_sentinel_payment_type() {
        let raw = RawTables {
            customers: vec![customer("c1", "u1"), customer("c2", "u2")],
            orders: vec![order("o1", "c1"), order("o2", "c2")],
            payments: vec![
                payment("o1", None, 1.0),
                payment("o1", Some("undefined"), 1.0),
                payment("o2", Some("debit_card"), 1.0),
            ],
            reviews: vec![review("o1", Some(5)), review("o2", None), review("o2", Some(5))],
            ..RawTables::default()
        };

        let table = join(&raw);
        assert_eq!(table.len(), 1);
        for rec in &table.records {
            assert!(!UNDEFINED_PAYMENT_TYPES.contains(&rec.payment_type.as_str()));
        }
    }
}
