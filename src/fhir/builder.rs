use chrono::{NaiveDateTime, Timelike};
use dicom_header::DicomHeaderMetadata;
use thiserror::Error;

use crate::fhir::mapping::FieldMapping;
use crate::fhir::model::{
    Coding, ImagingStudy, Instance, Reference, Series, RESOURCE_TYPE, STATUS_AVAILABLE,
};

pub const SERIES_DESCRIPTION_FALLBACK: &str = "Whole Slide Image Pathology Scan";

const ACQUISITION_FIELD: &str = "AcquisitionDateTime";
const ACQUISITION_FORMAT: &str = "%Y%m%d%H%M%S";
const STARTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("required field {field} is missing")]
    MissingField { field: &'static str },

    #[error("field {field} has invalid value {value:?}: expected {expected}")]
    InvalidField {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl MappingError {
    pub fn field(&self) -> &'static str {
        match self {
            MappingError::MissingField { field } | MappingError::InvalidField { field, .. } => *field,
        }
    }
}

/// Maps extracted header metadata onto an `ImagingStudy` document.
///
/// Pure and deterministic: the same metadata and mapping table always give the
/// same document.
#[derive(Debug, Clone, Default)]
pub struct FhirBuilder {
    mapping: FieldMapping,
}

impl FhirBuilder {
    pub fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn build(&self, metadata: &DicomHeaderMetadata) -> Result<ImagingStudy, MappingError> {
        let started = format_started(metadata.acquisition_time.as_deref())?;
        let modality = Coding::dicom(metadata.modality.clone());

        Ok(ImagingStudy {
            resource_type: RESOURCE_TYPE.to_string(),
            id: metadata.study_instance_uid.clone(),
            status: STATUS_AVAILABLE.to_string(),
            subject: Reference {
                reference: metadata
                    .patient_name
                    .as_ref()
                    .map(|name| format!("Patient/{}", name)),
                display: metadata.patient_name.clone(),
            },
            started,
            modality: vec![modality.clone()],
            series: vec![self.series(metadata, modality)],
        })
    }

    fn series(&self, metadata: &DicomHeaderMetadata, modality: Coding) -> Series {
        let description = metadata
            .series_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(SERIES_DESCRIPTION_FALLBACK)
            .to_string();

        Series {
            uid: metadata.series_instance_uid.clone(),
            number: self.mapping.series_number.resolve(metadata),
            modality,
            description,
            number_of_instances: self.mapping.number_of_instances.resolve(metadata),
            instance: vec![Instance {
                uid: self.mapping.instance_uid.resolve(metadata),
                number: 1,
                sop_class: Coding::uri(metadata.sop_class_uid.clone()),
            }],
        }
    }
}

/// Reformat a 14 digit `YYYYMMDDHHMMSS` timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_started(raw: Option<&str>) -> Result<String, MappingError> {
    let raw = raw.ok_or(MappingError::MissingField {
        field: ACQUISITION_FIELD,
    })?;

    let invalid = |expected| MappingError::InvalidField {
        field: ACQUISITION_FIELD,
        value: raw.to_string(),
        expected,
    };

    // chrono accepts shorter numeric fields, so the width is checked first
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("14 digits in YYYYMMDDHHMMSS form"));
    }
    let parsed = NaiveDateTime::parse_from_str(raw, ACQUISITION_FORMAT)
        .map_err(|_| invalid("a valid calendar date and time"))?;
    // chrono reads second 60 as a leap second
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(invalid("a valid calendar date and time"));
    }

    Ok(parsed.format(STARTED_FORMAT).to_string())
}
