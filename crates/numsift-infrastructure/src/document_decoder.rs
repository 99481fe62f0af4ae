//! File decoding for uploads.
//!
//! Every format is reduced to whitespace-separated cell text; token
//! extraction happens later, in the core.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use calamine::{Data, Reader, open_workbook_auto};
use numsift_core::document::{DocumentDecoder, InputFormat};
use std::path::{Path, PathBuf};

/// Decodes txt, csv, xls and xlsx files from disk.
#[derive(Debug, Clone, Default)]
pub struct FileDocumentDecoder;

#[async_trait]
impl DocumentDecoder for FileDocumentDecoder {
    async fn decode(&self, path: &Path, format: InputFormat) -> Result<String> {
        tracing::debug!("Decoding {} as {:?}", path.display(), format);
        match format {
            InputFormat::Txt => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display())),
            InputFormat::Csv => run_blocking(path, decode_csv).await,
            InputFormat::Xls | InputFormat::Xlsx => run_blocking(path, decode_workbook).await,
        }
    }
}

async fn run_blocking(path: &Path, decode: fn(&Path) -> Result<String>) -> Result<String> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || decode(&path))
        .await
        .context("Decoder task panicked")?
}

/// All cells of all rows, header row included.
fn decode_csv(path: &Path) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record.context("Malformed CSV record")?;
        cells.extend(record.iter().filter(|c| !c.is_empty()).map(str::to_string));
    }
    Ok(cells.join(" "))
}

/// Non-empty cells of the first worksheet.
fn decode_workbook(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook {}", path.display()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("Workbook has no worksheets"))??;
    let cells: Vec<String> = range
        .rows()
        .flat_map(|row| row.iter())
        .filter(|cell| !matches!(cell, Data::Empty))
        .map(|cell| cell.to_string())
        .collect();
    Ok(cells.join(" "))
}
