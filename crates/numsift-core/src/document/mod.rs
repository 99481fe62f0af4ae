//! Ports for the file-decoding and export collaborators.

mod format;
mod port;

pub use format::{ExportFormat, InputFormat};
pub use port::{DocumentDecoder, ExportArtifact, Exporter, export_file_name};
