//! # Let's Play CLI
//!
//! Administrative tooling that works directly against the store:
//!
//! - [`admin`]: create `ADMIN` accounts (the API never lets a client
//!   grant itself that role)
//! - [`seeder`]: fill a development database with fake users and products
//!
//! ## Usage
//!
//! ```ignore
//! use letsplay_cli::seeder::{seed_all, SeedConfig};
//!
//! let summary = seed_all(store.as_ref(), &SeedConfig::default()).await?;
//! println!("{} users, {} products", summary.users, summary.products);
//! ```

pub mod admin;
pub mod seeder;
