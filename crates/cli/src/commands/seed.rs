//! Seed a migrated database with demo records.
//!
//! Inserts `count` customers, each with a login account, a small product
//! catalogue, and one order per customer. Goes through [`PgStore`] so the
//! rows are shaped exactly as the API would write them.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use customer_desk_core::{
    NewCustomer, NewCustomerAccount, NewOrder, NewProduct, OrderLine, OrderStatus,
};
use customer_desk_server::db::{PgStore, RecordStore};
use customer_desk_server::services::credentials::hash_password_blocking;

use super::{CommandError, connect};

const DEMO_PASSWORD: &str = "change-me";

/// `(name, description, price in cents, stock level)`
const PRODUCTS: &[(&str, &str, i64, i32)] = &[
    ("Desk lamp", "Adjustable LED lamp", 3499, 40),
    ("Notebook", "A5 dotted, 120 pages", 899, 250),
    ("Fountain pen", "Steel nib, medium", 2450, 15),
];

/// Insert demo records.
///
/// # Errors
///
/// Returns `CommandError` if the connection or any insert fails.
pub async fn run(count: u32) -> Result<(), CommandError> {
    let store = PgStore::new(connect().await?);

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for &(name, description, cents, stock_level) in PRODUCTS {
        let product = store
            .create_product(NewProduct {
                name: name.to_owned(),
                description: Some(description.to_owned()),
                price: Decimal::new(cents, 2),
                stock_level,
            })
            .await?;
        products.push(product);
    }
    info!(count = products.len(), "Products seeded");

    for n in 1..=count {
        let customer = store
            .create_customer(NewCustomer {
                name: format!("Demo Customer {n}"),
                email: format!("customer{n}@example.com"),
                phone_number: format!("555-01{n:02}"),
            })
            .await?;

        let password_hash = hash_password_blocking(DEMO_PASSWORD.to_owned()).await?;
        store
            .create_account(NewCustomerAccount {
                customer_id: customer.id,
                username: format!("customer{n}"),
                password_hash,
            })
            .await?;

        let lines = products
            .iter()
            .zip(1..)
            .map(|(product, quantity)| OrderLine {
                product_id: product.id,
                quantity,
            })
            .collect();
        let order = store
            .create_order(NewOrder {
                customer_id: customer.id,
                status: OrderStatus::default(),
                order_date: Utc::now(),
                lines,
            })
            .await?;

        info!(customer_id = %customer.id, order_id = %order.id, "Customer seeded");
    }

    info!(customers = count, "Seeding complete!");
    Ok(())
}
