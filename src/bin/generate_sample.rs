use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use olist_dashboard::data::loader::{
    CATEGORY_TRANSLATION, CUSTOMERS, ORDERS, ORDER_ITEMS, PAYMENTS, PRODUCTS, REVIEWS,
};
use olist_dashboard::data::model::{
    CategoryTranslation, Customer, Order, OrderItem, Payment, Product, Review,
};

/// Write a synthetic dataset in the Olist table layout.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory
    #[arg(default_value = "data")]
    out_dir: PathBuf,

    /// Number of customers to generate
    #[arg(long, default_value_t = 2000)]
    customers: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick from `(value, weight)` pairs.
    fn weighted<'a, T>(&mut self, choices: &'a [(T, f64)]) -> &'a T {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_f64() * total;
        for (value, weight) in choices {
            if roll < *weight {
                return value;
            }
            roll -= weight;
        }
        &choices[choices.len() - 1].0
    }

    fn hex_id(&mut self) -> String {
        format!("{:016x}{:016x}", self.next_u64(), self.next_u64())
    }
}

const CATEGORIES: [(&str, &str); 12] = [
    ("cama_mesa_banho", "bed_bath_table"),
    ("beleza_saude", "health_beauty"),
    ("esporte_lazer", "sports_leisure"),
    ("moveis_decoracao", "furniture_decor"),
    ("informatica_acessorios", "computers_accessories"),
    ("utilidades_domesticas", "housewares"),
    ("relogios_presentes", "watches_gifts"),
    ("telefonia", "telephony"),
    ("ferramentas_jardim", "garden_tools"),
    ("automotivo", "auto"),
    ("brinquedos", "toys"),
    ("cool_stuff", "cool_stuff"),
];

const PAYMENT_TYPES: [(&str, f64); 5] = [
    ("credit_card", 0.74),
    ("boleto", 0.19),
    ("voucher", 0.05),
    ("debit_card", 0.015),
    ("not_defined", 0.005),
];

const REVIEW_SCORES: [(u8, f64); 5] = [(5, 0.57), (4, 0.19), (3, 0.08), (2, 0.03), (1, 0.13)];

const ORDER_STATUSES: [(&str, f64); 4] = [
    ("delivered", 0.95),
    ("shipped", 0.02),
    ("canceled", 0.02),
    ("processing", 0.01),
];

fn write_table<T: Serialize>(dir: &Path, table: &str, rows: &[T]) -> Result<()> {
    let path = dir.join(format!("{table}.csv"));
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {path:?}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {:?}", args.out_dir))?;

    let categories: Vec<CategoryTranslation> = CATEGORIES
        .iter()
        .map(|(pt, en)| CategoryTranslation {
            product_category_name: pt.to_string(),
            product_category_name_english: en.to_string(),
        })
        .collect();

    // Products: a few without a category, as in the real dataset.
    let products: Vec<Product> = (0..CATEGORIES.len() * 20)
        .map(|i| Product {
            product_id: rng.hex_id(),
            product_category_name: if rng.chance(0.02) {
                None
            } else {
                // Skew toward the first categories.
                let idx = (rng.below(CATEGORIES.len()) * (i % 3 + 1)) % CATEGORIES.len();
                Some(CATEGORIES[idx].0.to_string())
            },
        })
        .collect();

    let mut customers = Vec::with_capacity(args.customers);
    let mut orders = Vec::new();
    let mut items = Vec::new();
    let mut payments = Vec::new();
    let mut reviews = Vec::new();

    for _ in 0..args.customers {
        // Returning shoppers reuse an earlier person id under a new customer id.
        let customer_unique_id = match customers.last() {
            Some(Customer {
                customer_unique_id, ..
            }) if rng.chance(0.05) => customer_unique_id.clone(),
            _ => rng.hex_id(),
        };
        let customer_id = rng.hex_id();
        customers.push(Customer {
            customer_id: customer_id.clone(),
            customer_unique_id,
        });

        let order_id = rng.hex_id();
        orders.push(Order {
            order_id: order_id.clone(),
            customer_id,
            order_status: Some(rng.weighted(&ORDER_STATUSES).to_string()),
        });

        let n_items = if rng.chance(0.1) { 2 } else { 1 };
        let mut order_total = 0.0;
        for _ in 0..n_items {
            let product = &products[rng.below(products.len())];
            let price = (10.0 + rng.next_f64() * 290.0).round();
            let freight = ((5.0 + rng.next_f64() * 30.0) * 100.0).round() / 100.0;
            order_total += price + freight;
            items.push(OrderItem {
                order_id: order_id.clone(),
                product_id: product.product_id.clone(),
                price: Some(price),
                freight_value: Some(freight),
            });
        }

        let kind = *rng.weighted(&PAYMENT_TYPES);
        if kind == "credit_card" && rng.chance(0.05) {
            // Split payment: part voucher, part card.
            let voucher = (order_total * 0.3 * 100.0).round() / 100.0;
            payments.push(Payment {
                order_id: order_id.clone(),
                payment_type: Some("voucher".into()),
                payment_installments: Some(1),
                payment_value: Some(voucher),
            });
            order_total -= voucher;
        }
        payments.push(Payment {
            order_id: order_id.clone(),
            payment_type: Some(kind.to_string()),
            payment_installments: Some(if kind == "credit_card" {
                1 + rng.below(10) as u32
            } else {
                1
            }),
            payment_value: Some((order_total * 100.0).round() / 100.0),
        });

        if !rng.chance(0.01) {
            reviews.push(Review {
                order_id,
                review_score: Some(*rng.weighted(&REVIEW_SCORES)),
            });
        }
    }

    let dir = &args.out_dir;
    write_table(dir, CUSTOMERS, &customers)?;
    write_table(dir, ORDERS, &orders)?;
    write_table(dir, ORDER_ITEMS, &items)?;
    write_table(dir, PRODUCTS, &products)?;
    write_table(dir, PAYMENTS, &payments)?;
    write_table(dir, REVIEWS, &reviews)?;
    write_table(dir, CATEGORY_TRANSLATION, &categories)?;

    Ok(())
}
