use car_inventory::{InventoryStore, PgStore, Settings};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads (all optional):\n\
           DATABASE_URL, DATABASE_MAX_CONNECTIONS, BIND_ADDR,\n\
           CAR_MIN_YEAR, CAR_MAX_YEAR, IMPORT_ENFORCE_YEAR_RANGE, NOTIFY_RECIPIENT\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if malformed)
    let settings = Settings::from_env()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", settings.bind_addr);
    println!(
        "  CAR_MIN_YEAR={} CAR_MAX_YEAR={}",
        settings.year_range.min, settings.year_range.max
    );
    println!(
        "  IMPORT_ENFORCE_YEAR_RANGE={}",
        settings.enforce_year_range_on_import
    );
    println!(
        "  NOTIFY_RECIPIENT={}",
        settings.notify_recipient.as_deref().unwrap_or("(unset, notifications off)")
    );

    let Some(url) = settings.database_url.as_deref() else {
        println!("  DATABASE_URL is unset: the server will use the in-memory store.");
        println!("> Preflight OK.");
        return Ok(());
    };

    println!("  DATABASE_MAX_CONNECTIONS={}", settings.max_connections);
    let store = PgStore::connect(url, settings.max_connections)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to DATABASE_URL: {}", e))?;
    store.ping().await?;
    println!("  Database reachable, schema ensured.");

    let brands = store.list_brands().await?.len();
    let cars = store.count_cars().await?;
    println!("  Brands: {}", brands);
    println!("  Cars: {}", cars);

    println!("> Preflight OK.");
    Ok(())
}
