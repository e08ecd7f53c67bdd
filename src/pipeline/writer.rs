use crate::error::TransformError;
use crate::fhir::ImagingStudy;
use crate::logging::LogContext;
use crate::storage::{BlobLocation, BucketResolver, StorageError};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Receipt for a persisted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub location: BlobLocation,
    pub e_tag: Option<String>,
    pub bytes_written: usize,
}

/// Pretty-printed JSON with keys in model field order.
pub fn render(document: &ImagingStudy) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(document)
}

/// Serialize `document` and PUT it at `destination` as `application/json`.
pub async fn write(
    document: &ImagingStudy,
    destination: &BlobLocation,
    resolver: &dyn BucketResolver,
    log: &LogContext,
) -> Result<Acknowledgment, TransformError> {
    let write_error = |source: StorageError| TransformError::StorageWrite {
        location: destination.clone(),
        source,
    };

    let body = render(document).map_err(|e| write_error(e.into()))?;
    let bytes_written = body.len();

    let result = resolver
        .put_bytes(destination, body, JSON_CONTENT_TYPE)
        .await
        .map_err(write_error)?;

    log.emit(|| tracing::info!("Successfully saved FHIR data to {}", destination));

    Ok(Acknowledgment {
        location: destination.clone(),
        e_tag: result.e_tag,
        bytes_written,
    })
}
