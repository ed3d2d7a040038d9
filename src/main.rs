//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `geo_address` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::process;
use strum::IntoEnumIterator;

use geo_address::config::{Command, Opt};
use geo_address::form::{AddressWidget, FormConfig};
use geo_address::initialization::init_logger_with;
use geo_address::{
    address_labels, dedupe_localities, fetch_address, import_file, init_db_pool_with_path,
    load_components, run_migrations, Config, ImportOutcome,
};

async fn run(opt: Opt) -> Result<()> {
    let config = Config::from(&opt);
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match opt.command {
        Command::Import { file } => {
            let stats = import_file(&pool, &file).await?;
            println!(
                "Processed {} input{} ({} stored, {} failed)",
                stats.total(),
                if stats.total() == 1 { "" } else { "s" },
                stats.stored(),
                stats.failed()
            );
            for outcome in ImportOutcome::iter() {
                let count = stats.get(outcome);
                if count > 0 {
                    println!("  {}: {}", outcome, count);
                }
            }
        }
        Command::Dedupe => {
            let report = dedupe_localities(&pool).await?;
            println!(
                "Scanned {} addresses: {} repointed, {} duplicate localities deleted",
                report.addresses_scanned, report.addresses_repointed, report.localities_deleted
            );
        }
        Command::Show { id } => {
            let components = load_components(&pool, id)
                .await?
                .ok_or_else(|| anyhow!("No address with id {}", id))?;
            println!("{}", serde_json::to_string_pretty(&components)?);

            if let Some(address) = fetch_address(&pool, id).await? {
                for (level, label) in address_labels(&pool, &address).await? {
                    println!("  {}: {}", level, label);
                }
            }
        }
        Command::Fields {
            id,
            name,
            api_key,
            show_map,
        } => {
            let form_config = FormConfig::new(api_key, show_map)?;
            let widget = AddressWidget::new(form_config);

            let address = fetch_address(&pool, id)
                .await?
                .ok_or_else(|| anyhow!("No address with id {}", id))?;
            let mut values = load_components(&pool, id)
                .await?
                .map(|c| c.to_form_values())
                .unwrap_or_default();
            values.insert("pk".to_string(), address.id.to_string());

            println!("{} = {:?}", name, address.to_string());
            for (level, label) in address_labels(&pool, &address).await? {
                println!("  {} ({})", label, level);
            }
            for field in widget.hidden_fields(&name, &values) {
                println!("{} [{}] = {:?}", field.name, field.geo, field.value);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    let log_level = opt.log_level.clone();
    let log_format = opt.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if let Err(e) = run(opt).await {
        eprintln!("geo_address error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
