//! Render example: a complete card from a snapshot file
//!
//! This example demonstrates:
//! - Loading a `CharacterSnapshot` and a `CardConfig` from JSON
//! - A `DiskAssetCache` that fills misses through a `RemoteFetcher`
//! - Calling `render_card` and writing the PNG under a timestamped name
//!
//! Usage:
//!
//! ```text
//! cargo run --example render -- <snapshot.json> [asset-root] [config.json]
//! ```
//!
//! Asset URLs of the form `file:///path/to/image.png` are copied into the
//! cache on first use.

use buildcard::font::BlockFonts;
use buildcard::*;
use std::error::Error;

/// Fetches `file://` URLs from the local filesystem.
struct FileFetcher;

impl RemoteFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        let path = url
            .strip_prefix("file://")
            .ok_or_else(|| format!("unsupported url: {url}"))?;
        Ok(std::fs::read(path)?)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let snapshot_path = args
        .next()
        .ok_or("usage: render <snapshot.json> [asset-root] [config.json]")?;
    let asset_root = args.next().unwrap_or_else(|| "attributes".to_string());
    let config = match args.next() {
        Some(path) => CardConfig::from_path(path)?,
        None => CardConfig::default(),
    };

    println!("=== Build Card Render ===\n");

    let snapshot = CharacterSnapshot::from_json_str(&std::fs::read_to_string(&snapshot_path)?)?;
    println!("Character: {} (Lv. {})", snapshot.name, snapshot.level);
    println!("Equipment pieces: {}", snapshot.equipment.len());

    let assets = DiskAssetCache::with_fetcher(&asset_root, Box::new(FileFetcher));
    let fonts = BlockFonts::new();

    let card = render_card(&snapshot, &assets, &fonts, &config)?;
    println!("Rendered {}x{} card", card.width(), card.height());
    for diagnostic in &card.diagnostics {
        println!("  warning: {diagnostic}");
    }

    let file = format!("{}.png", card.file_stem(&chrono::Local::now()));
    std::fs::write(&file, card.to_png()?)?;
    println!("Saved to {file}");

    Ok(())
}
