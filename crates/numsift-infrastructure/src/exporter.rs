//! Export encoding for token lists.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use numsift_core::document::{ExportArtifact, ExportFormat, Exporter, export_file_name};
use numsift_core::session::OwnerId;
use rust_xlsxwriter::Workbook;

/// Column header used by the tabular formats.
pub const EXPORT_HEADER: &str = "Phone Numbers";

/// Builds export files in memory.
#[derive(Debug, Clone, Default)]
pub struct FileExporter;

#[async_trait]
impl Exporter for FileExporter {
    async fn export(
        &self,
        tokens: &[String],
        format: ExportFormat,
        owner: OwnerId,
    ) -> Result<ExportArtifact> {
        let bytes = match format {
            ExportFormat::Txt => tokens.join("\n").into_bytes(),
            ExportFormat::Csv => encode_csv(tokens)?,
            ExportFormat::Xlsx => encode_xlsx(tokens)?,
        };
        Ok(ExportArtifact {
            file_name: export_file_name(owner, format),
            bytes,
        })
    }
}

fn encode_csv(tokens: &[String]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([EXPORT_HEADER])?;
    for token in tokens {
        writer.write_record([token])?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV export: {}", e.error()))
}

fn encode_xlsx(tokens: &[String]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, EXPORT_HEADER)?;
    for (row, token) in (1u32..).zip(tokens) {
        worksheet.write_string(row, 0, token)?;
    }
    Ok(workbook.save_to_buffer()?)
}
