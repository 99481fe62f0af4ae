use crate::error::{NumsiftError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upload formats the decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Txt,
    Csv,
    Xls,
    Xlsx,
}

impl InputFormat {
    /// Picks the format from a file name's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`NumsiftError::UnsupportedInputFormat`] for anything else,
    /// including names without an extension.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            "xls" => Ok(Self::Xls),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(NumsiftError::unsupported_format(extension)),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Xls => "xls",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Formats the exporter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [Self::Txt, Self::Csv, Self::Xlsx];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_from_file_name() {
        assert_eq!(InputFormat::from_file_name("list.TXT").unwrap(), InputFormat::Txt);
        assert_eq!(InputFormat::from_file_name("a.b.csv").unwrap(), InputFormat::Csv);
        assert_eq!(InputFormat::from_file_name("old.xls").unwrap(), InputFormat::Xls);
        assert_eq!(InputFormat::from_file_name("sheet.xlsx").unwrap(), InputFormat::Xlsx);
    }

    #[test]
    fn test_unsupported_input_format() {
        assert_eq!(
            InputFormat::from_file_name("photo.png").unwrap_err(),
            NumsiftError::unsupported_format("png")
        );
        assert_eq!(
            InputFormat::from_file_name("README").unwrap_err(),
            NumsiftError::unsupported_format("")
        );
    }

    #[test]
    fn test_export_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("XLSX"), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::from_extension("xls"), None);
    }
}
