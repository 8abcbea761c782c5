//! JSON Lines dataset reader

use std::path::Path;

use tracing::{info, instrument};

use crate::error::{CatalogError, CatalogResult};
use crate::models::CatalogRecord;

/// Read and normalize every record in a `.jsonl` file
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_jsonl(path: impl AsRef<Path>) -> CatalogResult<Vec<CatalogRecord>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let records = parse_jsonl(&content)?;
    info!(records = records.len(), "Catalog dataset read");
    Ok(records)
}

/// One record per non-blank line; line numbers in errors are 1-based
pub fn parse_jsonl(content: &str) -> CatalogResult<Vec<CatalogRecord>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let record: CatalogRecord =
                serde_json::from_str(line).map_err(|e| CatalogError::Parse {
                    line: index + 1,
                    message: e.to_string(),
                })?;
            record.normalize().map_err(|e| CatalogError::Parse {
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}
