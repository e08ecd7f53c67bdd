use clap::Parser;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::storage::BlobLocation;

pub const SOURCE_BUCKET_VAR: &str = "S3_LandingBucketName";
pub const SOURCE_KEY_VAR: &str = "S3_DICOMFileKey";
pub const DESTINATION_BUCKET_VAR: &str = "S3_FHIROutPutBucketName";
pub const DESTINATION_KEY_VAR: &str = "S3_CustomFHIRFileName";

/// Startup arguments. Each job value can come from a flag or from the
/// environment variable the task scheduler sets.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "wsi2fhir",
    about = "Convert a whole-slide-image DICOM header into a FHIR ImagingStudy document"
)]
pub struct Cli {
    /// Bucket holding the input DICOM object
    #[arg(long, env = SOURCE_BUCKET_VAR)]
    pub source_bucket: Option<String>,

    /// Key of the input DICOM object
    #[arg(long, env = SOURCE_KEY_VAR)]
    pub source_key: Option<String>,

    /// Bucket receiving the FHIR document
    #[arg(long, env = DESTINATION_BUCKET_VAR)]
    pub destination_bucket: Option<String>,

    /// Key of the FHIR document
    #[arg(long, env = DESTINATION_KEY_VAR)]
    pub destination_key: Option<String>,

    /// Optional TOML file with logging, storage and mapping settings
    #[arg(short, long, env = "WSI2FHIR_CONFIG")]
    pub config: Option<PathBuf>,
}

/// The validated, immutable description of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub source: BlobLocation,
    pub destination: BlobLocation,
}

impl JobConfig {
    /// Validate the four required values. All missing or blank values are
    /// reported together.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut take = |value: &Option<String>, name: &'static str| {
            // blank means missing; anything else is kept as given
            match value.as_deref().filter(|v| !v.trim().is_empty()) {
                Some(v) => v.to_string(),
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let source_bucket = take(&cli.source_bucket, SOURCE_BUCKET_VAR);
        let source_key = take(&cli.source_key, SOURCE_KEY_VAR);
        let destination_bucket = take(&cli.destination_bucket, DESTINATION_BUCKET_VAR);
        let destination_key = take(&cli.destination_key, DESTINATION_KEY_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::MissingValues(missing));
        }

        Ok(Self {
            source: BlobLocation::new(source_bucket, source_key),
            destination: BlobLocation::new(destination_bucket, destination_key),
        })
    }
}
