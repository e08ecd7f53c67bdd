use dicom_header::DicomHeaderMetadata;

use crate::error::TransformError;
use crate::logging::LogContext;
use crate::storage::{BlobLocation, BucketResolver};

/// Fetch the object at `source` and read its DICOM header.
///
/// Performs exactly one GET. Pixel data is never decoded.
pub async fn extract(
    resolver: &dyn BucketResolver,
    source: &BlobLocation,
    log: &LogContext,
) -> Result<DicomHeaderMetadata, TransformError> {
    let bytes = resolver
        .get_bytes(source)
        .await
        .map_err(|source_err| TransformError::StorageRead {
            location: source.clone(),
            source: source_err,
        })?;

    log.emit(|| tracing::debug!(location = %source, size = bytes.len(), "Fetched DICOM object"));

    let metadata =
        dicom_header::parse_header(&bytes).map_err(|parse_err| TransformError::Parse {
            location: source.clone(),
            source: parse_err,
        })?;

    log.emit(|| {
        tracing::debug!(
            study = metadata.study_instance_uid.as_deref().unwrap_or("-"),
            series = metadata.series_instance_uid.as_deref().unwrap_or("-"),
            "Extracted DICOM header metadata"
        )
    });
    Ok(metadata)
}
