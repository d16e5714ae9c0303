//! Fake data for development databases.
//!
//! Every seeded account gets the password [`SEED_PASSWORD`] and the `USER`
//! role. Usernames and emails carry a per-run tag so repeated runs never
//! collide with earlier seeds.

use std::time::Instant;

use anyhow::anyhow;
use uuid::Uuid;

use letsplay_db::Store;

pub mod products;
pub mod users;

pub const SEED_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub users: usize,
    pub products_per_user: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 10,
            products_per_user: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub products: usize,
}

/// Short random tag that keeps one run's usernames and emails unique.
pub fn run_tag() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

pub async fn seed_all(store: &dyn Store, config: &SeedConfig) -> anyhow::Result<SeedSummary> {
    let start = Instant::now();
    let tag = run_tag();

    let new_users = users::generate_users(config.users, &tag, SEED_PASSWORD)?;
    println!(
        "   Generated {} users in {:.2?}",
        new_users.len(),
        start.elapsed()
    );

    let mut owner_ids = Vec::with_capacity(new_users.len());
    for new_user in new_users {
        let user = store
            .insert_user(new_user)
            .await
            .map_err(|e| anyhow!("Failed to insert user: {}", e.message()))?;
        owner_ids.push(user.id);
    }

    let new_products = products::generate_products(&owner_ids, config.products_per_user);
    let product_count = new_products.len();
    for new_product in new_products {
        store
            .insert_product(new_product)
            .await
            .map_err(|e| anyhow!("Failed to insert product: {}", e.message()))?;
    }

    println!("   Seeding finished in {:.2?}", start.elapsed());

    Ok(SeedSummary {
        users: owner_ids.len(),
        products: product_count,
    })
}
