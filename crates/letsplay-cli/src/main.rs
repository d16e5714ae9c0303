use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use letsplay_cli::admin::create_admin;
use letsplay_cli::seeder::{self, SEED_PASSWORD, SeedConfig};
use letsplay_config::StoreConfig;
use letsplay_db::{Store, init_store, require_postgres};

#[derive(Parser)]
#[command(name = "letsplay-cli")]
#[command(about = "Let's Play CLI - Administrative tools for the Let's Play API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Username of the administrator
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users and products
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "10")]
        users: usize,

        /// Number of products per user
        #[arg(short = 'p', long, default_value = "5")]
        products_per_user: usize,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let config = StoreConfig::from_env();
    if let Err(e) = require_postgres(&config) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = match init_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => handle_create_admin(store, username, email, password).await,
        Commands::Seed {
            users,
            products_per_user,
        } => {
            handle_seed(
                store.as_ref(),
                SeedConfig {
                    users,
                    products_per_user,
                },
            )
            .await
        }
    }
}

async fn handle_create_admin(
    store: Arc<dyn Store>,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Username")
            .interact_text()
            .expect("Failed to read username")
    });

    let email = email.unwrap_or_else(|| {
        Input::new()
            .with_prompt("Email address")
            .interact_text()
            .expect("Failed to read email")
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .expect("Failed to read password")
    });

    match create_admin(store.as_ref(), &username, &email, &password).await {
        Ok(admin) => {
            println!("\n✅ Administrator created successfully!");
            println!("   ID: {}", admin.id);
            println!("   Username: {}", admin.username);
            println!("   Email: {}", admin.email);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating administrator: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(store: &dyn Store, config: SeedConfig) {
    println!(
        "🌱 Seeding {} users with {} products each...",
        config.users, config.products_per_user
    );

    match seeder::seed_all(store, &config).await {
        Ok(summary) => {
            println!("\n✅ Seeded {} users and {} products", summary.users, summary.products);
            println!("   All seeded accounts use the password: {}", SEED_PASSWORD);
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {:#}", e);
            std::process::exit(1);
        }
    }
}
