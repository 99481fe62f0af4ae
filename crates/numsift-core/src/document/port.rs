use super::format::{ExportFormat, InputFormat};
use crate::session::OwnerId;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Turns an uploaded file into raw text for token extraction.
#[async_trait]
pub trait DocumentDecoder: Send + Sync {
    async fn decode(&self, path: &Path, format: InputFormat) -> Result<String>;
}

/// A rendered export, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Encodes a token list into a downloadable file.
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(
        &self,
        tokens: &[String],
        format: ExportFormat,
        owner: OwnerId,
    ) -> Result<ExportArtifact>;
}

/// File name exports are delivered under.
pub fn export_file_name(owner: OwnerId, format: ExportFormat) -> String {
    format!("numbers_{}.{}", owner, format.extension())
}
