//! Header-only reading of whole-slide-image DICOM objects.
//!
//! The parser stops before Pixel Data, so only the attribute set needed for
//! FHIR `ImagingStudy` mapping is ever decoded.

use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::mem::InMemDicomObject;
use dicom_object::file::ReadPreamble;
use dicom_object::OpenFileOptions;
use serde::Serialize;
use thiserror::Error;

/// Length of the Part 10 preamble that precedes the `DICM` magic code.
const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("not a DICOM Part 10 stream: missing DICM magic code")]
    MissingMagic,

    #[error("failed to parse DICOM header: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, HeaderError>;

/// Attributes read from a DICOM header. Every field is optional: an attribute
/// missing from the source stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DicomHeaderMetadata {
    #[serde(rename = "SOPClassUID")]
    pub sop_class_uid: Option<String>,
    #[serde(rename = "StudyInstanceUID")]
    pub study_instance_uid: Option<String>,
    #[serde(rename = "SeriesInstanceUID")]
    pub series_instance_uid: Option<String>,
    #[serde(rename = "SOPInstanceUID")]
    pub sop_instance_uid: Option<String>,
    pub patient_name: Option<String>,
    #[serde(rename = "PatientID")]
    pub patient_id: Option<String>,
    pub study_date: Option<String>,
    pub modality: Option<String>,
    #[serde(rename = "SpecimenUID")]
    pub specimen_uid: Option<String>,
    pub total_pixel_matrix_columns: Option<u32>,
    pub total_pixel_matrix_rows: Option<u32>,
    /// Raw `AcquisitionDateTime` (0008,002A) value, expected as `YYYYMMDDHHMMSS`.
    pub acquisition_time: Option<String>,
    pub dimension_organization_type: Option<String>,
    pub series_description: Option<String>,
    pub instance_number: Option<i64>,
    pub series_number: Option<i64>,
    #[serde(rename = "MediaStorageSOPClassUID")]
    pub media_storage_sop_class_uid: Option<String>,
}

impl DicomHeaderMetadata {
    /// Collect the attribute set from an already parsed dataset.
    ///
    /// `media_storage_sop_class_uid` lives in the file meta group and is not
    /// part of the dataset, so callers holding a file object pass it in.
    pub fn from_dataset(obj: &InMemDicomObject, media_storage_sop_class_uid: Option<String>) -> Self {
        Self {
            sop_class_uid: text(obj, tags::SOP_CLASS_UID),
            study_instance_uid: text(obj, tags::STUDY_INSTANCE_UID),
            series_instance_uid: text(obj, tags::SERIES_INSTANCE_UID),
            sop_instance_uid: text(obj, tags::SOP_INSTANCE_UID),
            patient_name: text(obj, tags::PATIENT_NAME),
            patient_id: text(obj, tags::PATIENT_ID),
            study_date: text(obj, tags::STUDY_DATE),
            modality: text(obj, tags::MODALITY),
            specimen_uid: text(obj, tags::SPECIMEN_UID),
            total_pixel_matrix_columns: unsigned(obj, tags::TOTAL_PIXEL_MATRIX_COLUMNS),
            total_pixel_matrix_rows: unsigned(obj, tags::TOTAL_PIXEL_MATRIX_ROWS),
            acquisition_time: text(obj, tags::ACQUISITION_DATE_TIME),
            dimension_organization_type: text(obj, tags::DIMENSION_ORGANIZATION_TYPE),
            series_description: text(obj, tags::SERIES_DESCRIPTION),
            instance_number: signed(obj, tags::INSTANCE_NUMBER),
            series_number: signed(obj, tags::SERIES_NUMBER),
            media_storage_sop_class_uid: media_storage_sop_class_uid.and_then(clean),
        }
    }
}

/// Parse the header of a Part 10 byte stream, with or without the 128 byte
/// preamble. Reading stops at Pixel Data.
pub fn parse_header(bytes: &[u8]) -> Result<DicomHeaderMetadata> {
    let body = strip_preamble(bytes)?;

    let obj = OpenFileOptions::new()
        .read_preamble(ReadPreamble::Never)
        .read_until(tags::PIXEL_DATA)
        .from_reader(body)
        .map_err(|e| HeaderError::Parse(e.to_string()))?;

    let ms_sop_class = Some(obj.meta().media_storage_sop_class_uid.clone());
    Ok(DicomHeaderMetadata::from_dataset(&obj, ms_sop_class))
}

fn strip_preamble(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.starts_with(MAGIC) {
        return Ok(bytes);
    }
    match bytes.get(PREAMBLE_LEN..) {
        Some(rest) if rest.starts_with(MAGIC) => Ok(rest),
        _ => Err(HeaderError::MissingMagic),
    }
}

fn clean(raw: String) -> Option<String> {
    let trimmed = raw.trim_end_matches(['\0', ' ']).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn text(obj: &InMemDicomObject, tag: Tag) -> Option<String> {
    obj.element(tag)
        .ok()
        .and_then(|e| e.to_str().ok())
        .and_then(|s| clean(s.into_owned()))
}

fn signed(obj: &InMemDicomObject, tag: Tag) -> Option<i64> {
    obj.element(tag).ok().and_then(|e| e.to_int::<i64>().ok())
}

fn unsigned(obj: &InMemDicomObject, tag: Tag) -> Option<u32> {
    obj.element(tag).ok().and_then(|e| e.to_int::<u32>().ok())
}
