#![deny(warnings)]

use baseline_store::{default_sqlite_url, ensure_parent_dir, init_db, synthetic, upsert_regions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| default_sqlite_url().to_string());
    ensure_parent_dir(&url)?;
    let pool = init_db(&url).await?;
    // Region reference data is small; keep the demo set present.
    let regions = upsert_regions(&pool, &synthetic::demo_regions()).await?;
    println!("DB migrated at {} ({} regions)", url, regions);
    Ok(())
}
