use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::model::Quote;
use crate::Result;

/// Serializes the whole collection as a pretty printed JSON array (4 space indent)
/// and writes it in one go, replacing any existing file.
pub async fn write_collection(path: impl AsRef<Path>, quotes: &[Quote]) -> Result<()> {
    let bytes = to_pretty_json(quotes)?;
    let mut file = File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Reads back a collection written by `write_collection`.
pub async fn read_collection(path: impl AsRef<Path>) -> Result<Vec<Quote>> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn to_pretty_json(quotes: &[Quote]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    quotes.serialize(&mut ser)?;
    Ok(bytes)
}
