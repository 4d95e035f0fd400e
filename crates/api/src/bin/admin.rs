//! `archive-admin`: maintenance commands run against the archive database.
//!
//! Reads the same `.env` / environment as the server (`DATABASE_URL`,
//! `DB_*`) and applies pending migrations before doing anything.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use archive_api::auth::password::{hash_password_blocking, validate_password_strength};
use archive_api::config::DatabaseConfig;
use archive_api::seed::seed_samples;
use archive_db::repositories::UserRepo;

/// Project archive maintenance tool
#[derive(Parser)]
#[command(name = "archive-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Overwrite a user's password
    ResetPassword {
        /// Account to update
        #[arg(long, default_value = "admin")]
        username: String,
        /// New plaintext password
        #[arg(long)]
        password: String,
        /// Minimum accepted password length
        #[arg(long, env = "MIN_PASSWORD_LENGTH", default_value_t = 8)]
        min_length: usize,
    },

    /// Insert sample projects and achievements into empty tables
    SeedSamples,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archive_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env();
    let pool = archive_db::create_pool(
        &db_config.url,
        db_config.max_connections,
        db_config.acquire_timeout,
    )
    .await
    .context("failed to connect to database")?;
    archive_db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    match cli.command {
        Commands::ResetPassword {
            username,
            password,
            min_length,
        } => {
            if let Err(msg) = validate_password_strength(&password, min_length) {
                bail!(msg);
            }
            let password_hash = hash_password_blocking(password)
                .await
                .context("failed to hash password")?;
            let updated = UserRepo::update_password_by_username(&pool, &username, &password_hash)
                .await
                .context("failed to update password")?;
            if !updated {
                bail!("user '{username}' not found");
            }
            println!("Password updated for '{username}'");
        }
        Commands::SeedSamples => {
            let counts = seed_samples(&pool)
                .await
                .context("failed to seed sample data")?;
            println!(
                "Inserted {} projects and {} achievements",
                counts.projects, counts.achievements
            );
        }
    }

    Ok(())
}
