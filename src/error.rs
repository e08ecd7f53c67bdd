use dicom_header::HeaderError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::fhir::MappingError;
use crate::storage::{BlobLocation, StorageError};

/// Every way an invocation can fail, tagged by stage.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read {location}: {source}")]
    StorageRead {
        location: BlobLocation,
        source: StorageError,
    },

    #[error("failed to parse DICOM header of {location}: {source}")]
    Parse {
        location: BlobLocation,
        source: HeaderError,
    },

    #[error("failed to build ImagingStudy: {0}")]
    Mapping(#[from] MappingError),

    #[error("failed to write {location}: {source}")]
    StorageWrite {
        location: BlobLocation,
        source: StorageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    StorageRead,
    Parse,
    Mapping,
    StorageWrite,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::StorageRead => "StorageReadError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Mapping => "MappingError",
            ErrorKind::StorageWrite => "StorageWriteError",
        }
    }
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::Config(_) => ErrorKind::Config,
            TransformError::StorageRead { .. } => ErrorKind::StorageRead,
            TransformError::Parse { .. } => ErrorKind::Parse,
            TransformError::Mapping(_) => ErrorKind::Mapping,
            TransformError::StorageWrite { .. } => ErrorKind::StorageWrite,
        }
    }
}
