//! Which header attribute feeds each ambiguous `ImagingStudy` field.
//!
//! The defaults reproduce the established output: `series.number` and
//! `series.numberOfInstances` both come from InstanceNumber, and
//! `instance.uid` comes from StudyInstanceUID. Changing any of them is a
//! `[mapping]` entry in the config file.

use dicom_header::DicomHeaderMetadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberSource {
    InstanceNumber,
    SeriesNumber,
    /// Always null.
    Omit,
}

impl NumberSource {
    pub fn resolve(self, metadata: &DicomHeaderMetadata) -> Option<i64> {
        match self {
            NumberSource::InstanceNumber => metadata.instance_number,
            NumberSource::SeriesNumber => metadata.series_number,
            NumberSource::Omit => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UidSource {
    StudyInstanceUid,
    SeriesInstanceUid,
    SopInstanceUid,
}

impl UidSource {
    pub fn resolve(self, metadata: &DicomHeaderMetadata) -> Option<String> {
        match self {
            UidSource::StudyInstanceUid => metadata.study_instance_uid.clone(),
            UidSource::SeriesInstanceUid => metadata.series_instance_uid.clone(),
            UidSource::SopInstanceUid => metadata.sop_instance_uid.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub series_number: NumberSource,
    pub number_of_instances: NumberSource,
    pub instance_uid: UidSource,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            series_number: NumberSource::InstanceNumber,
            number_of_instances: NumberSource::InstanceNumber,
            instance_uid: UidSource::StudyInstanceUid,
        }
    }
}
