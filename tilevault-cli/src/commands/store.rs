//! Store maintenance CLI commands.

use std::path::PathBuf;

use tilevault::store::TileStore;

use crate::error::CliError;

/// Print the total number of stored tiles.
pub async fn count(store: &TileStore) -> Result<(), CliError> {
    let n = store.count().await?;
    println!("{n}");
    Ok(())
}

/// List the stored tiles belonging to one URL template, one JSON object
/// per line.
pub async fn list(store: &TileStore, template: &str) -> Result<(), CliError> {
    let tiles = store.list_by_template(template).await?;
    for tile in &tiles {
        println!("{}", serde_json::to_string(tile)?);
    }
    Ok(())
}

/// Fetch one blob by key, writing it to `output` or stdout.
pub async fn get(store: &TileStore, key: &str, output: Option<PathBuf>) -> Result<(), CliError> {
    let blob = store.get(key).await?;
    match output {
        Some(path) => {
            std::fs::write(&path, &blob)?;
            eprintln!("wrote {} bytes to {}", blob.len(), path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&blob)?;
        }
    }
    Ok(())
}

/// Remove one tile by key. Succeeds whether or not the key existed.
pub async fn remove(store: &TileStore, key: &str) -> Result<(), CliError> {
    store.remove(key).await?;
    Ok(())
}

/// Delete every stored tile.
pub async fn clear(store: &TileStore) -> Result<(), CliError> {
    let before = store.count().await?;
    store.clear().await?;
    println!("removed {before} tiles");
    Ok(())
}
