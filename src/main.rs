use anyhow::{Context, Result};
use clap::Parser;
use secrecy::ExposeSecret;
use std::time::Instant;

use attack_etl::config::{Config, ENTERPRISE_COLLECTION_TITLE, TAXII_SERVER_ROOT};
use attack_etl::filter::{filter_objects, type_breakdown};
use attack_etl::store::Store;
use attack_etl::taxii::{find_collection, TaxiiClient};

/// No flags, no subcommands — the derive still provides --help/--version.
#[derive(Parser, Debug)]
#[command(
    name = "attack-etl",
    version,
    about = "Pull MITRE ATT&CK objects from the public TAXII server into MongoDB"
)]
struct Args {}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let _args = Args::parse();
    let started = Instant::now();

    // Configuration first: a broken environment must be reported before any
    // network activity begins.
    let config = Config::from_env().context("Configuration error")?;
    tracing::debug!(?config, "Resolved configuration");

    // Destination before source, so a misconfigured store fails the run
    // before we pull megabytes from the feed.
    let store = Store::connect(config.mongo_uri.expose_secret(), &config.mongo_db)
        .await
        .context("Failed to connect to MongoDB")?;

    let client = TaxiiClient::new(config.taxii_credentials.clone())
        .context("Failed to build TAXII client")?;

    let api_root = client
        .discover(TAXII_SERVER_ROOT)
        .await
        .context("Failed to reach the TAXII server")?;

    let collections = client
        .collections(&api_root)
        .await
        .context("Failed to list TAXII collections")?;
    let collection = find_collection(&collections, ENTERPRISE_COLLECTION_TITLE)
        .context("Enterprise ATT&CK collection not available")?;
    tracing::info!(id = %collection.id, title = %collection.title, "Found collection");

    let objects = client
        .objects(&api_root, &collection.id)
        .await
        .context("Failed to fetch objects from the collection")?;
    tracing::info!(total = objects.len(), "Retrieved objects from feed");

    let filtered = filter_objects(objects);
    tracing::info!(kept = filtered.len(), "Filtered to allowed object types");
    for (object_type, count) in type_breakdown(&filtered) {
        tracing::info!(object_type = %object_type, count, "Object type breakdown");
    }

    let inserted = store
        .insert_all(&filtered, config.insert_failure_policy)
        .await
        .context("Failed to load documents into MongoDB")?;

    tracing::info!(
        inserted,
        elapsed_secs = started.elapsed().as_secs_f64(),
        "ETL pipeline completed"
    );
    Ok(())
}
