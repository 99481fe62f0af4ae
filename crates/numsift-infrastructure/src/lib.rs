//! Infrastructure adapters for numsift: configuration loading, file
//! decoding, export encoding and membership lookups.

pub mod config_service;
pub mod document_decoder;
pub mod exporter;
pub mod membership;
pub mod paths;

pub use config_service::ConfigService;
pub use document_decoder::FileDocumentDecoder;
pub use exporter::FileExporter;
pub use membership::{BotApiMembershipOracle, StaticMembershipOracle};
pub use paths::NumsiftPaths;
