//! Serializable shape of the FHIR `ImagingStudy` document.
//!
//! Field order in these structs is the key order of the emitted JSON.
//! Optional values serialize as `null` rather than being skipped.

use serde::{Deserialize, Serialize};

pub const RESOURCE_TYPE: &str = "ImagingStudy";
pub const STATUS_AVAILABLE: &str = "available";
pub const DICOM_ONTOLOGY_SYSTEM: &str = "http://dicom.nema.org/resources/ontology/DCM";
pub const URI_SYSTEM: &str = "urn:ietf:rfc:3986";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagingStudy {
    pub resource_type: String,
    pub id: Option<String>,
    pub status: String,
    pub subject: Reference,
    pub started: String,
    pub modality: Vec<Coding>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: Option<String>,
}

impl Coding {
    pub fn dicom(code: Option<String>) -> Self {
        Self {
            system: DICOM_ONTOLOGY_SYSTEM.to_string(),
            code,
        }
    }

    pub fn uri(code: Option<String>) -> Self {
        Self {
            system: URI_SYSTEM.to_string(),
            code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub uid: Option<String>,
    pub number: Option<i64>,
    pub modality: Coding,
    pub description: String,
    pub number_of_instances: Option<i64>,
    pub instance: Vec<Instance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub uid: Option<String>,
    pub number: u32,
    pub sop_class: Coding,
}
