use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum FileFormatError {
    #[error("File has no extension: {0}")]
    MissingFileExtension(String),
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type FileFormatResult<T> = Result<T, FileFormatError>;

pub fn get_file_extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|os_str| os_str.to_str())
}

/// Text formats used for analysis configs and defect reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_file_name(path: &Path) -> FileFormatResult<Self> {
        let extension = get_file_extension(path)
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| FileFormatError::MissingFileExtension(path.display().to_string()))?;

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(FileFormatError::UnsupportedFileExtension(
                path.display().to_string(),
            )),
        }
    }

    pub fn serialize<T: Serialize>(self, value: &T) -> FileFormatResult<String> {
        let mut text = match self {
            FileFormat::Yaml => serde_yml::to_string(value)?,
            FileFormat::Json => serde_json::to_string_pretty(value)?,
        };
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text)
    }

    pub fn deserialize<T: DeserializeOwned>(self, text: &str) -> FileFormatResult<T> {
        match self {
            FileFormat::Yaml => Ok(serde_yml::from_str(text)?),
            FileFormat::Json => Ok(serde_json::from_str(text)?),
        }
    }
}

/// Reads and deserializes a file, picking the format from its extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> FileFormatResult<T> {
    let format = FileFormat::from_file_name(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| FileFormatError::Io {
        path: path.display().to_string(),
        source,
    })?;
    format.deserialize(&text)
}

/// Serializes `value` and writes it to `path`, picking the format from its extension.
pub fn write_file<T: Serialize>(path: &Path, value: &T) -> FileFormatResult<()> {
    let format = FileFormat::from_file_name(path)?;
    let text = format.serialize(value)?;
    std::fs::write(path, text).map_err(|source| FileFormatError::Io {
        path: path.display().to_string(),
        source,
    })
}
