mod common;

use common::{buckets, capturing_log, cli, part10, read_object, scenario_elements, seed, CountingResolver};
use dicom_dictionary_std::tags;
use wsi2fhir::config::{Config, JobConfig};
use wsi2fhir::logging::LogContext;
use wsi2fhir::pipeline::{ExitStatus, Orchestrator};
use wsi2fhir::storage::MemoryBuckets;
use wsi2fhir::{run_with_resolver, ErrorKind};

fn job() -> JobConfig {
    JobConfig::from_cli(&cli()).expect("valid job")
}

#[tokio::test]
async fn test_missing_configuration_makes_no_storage_calls() {
    let resolver = CountingResolver::new(buckets());
    let (log, output) = capturing_log();

    for missing in 0..4 {
        let mut cli = cli();
        match missing {
            0 => cli.source_bucket = None,
            1 => cli.source_key = None,
            2 => cli.destination_bucket = Some(String::new()),
            _ => cli.destination_key = None,
        }

        let status = run_with_resolver(&cli, &Config::default(), &resolver, &log).await;
        assert_eq!(status, ExitStatus::Failure);
        assert_eq!(status.code(), 1);
    }

    assert_eq!(resolver.calls(), 0);
    assert!(output.contents().contains("ConfigError"));
}

#[tokio::test]
async fn test_missing_source_object_is_a_read_error() {
    let buckets = buckets();
    let log = LogContext::silent();

    let err = Orchestrator::new(&buckets, &log).run(&job()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageRead);
    assert!(err.to_string().contains("s3://landing/study1.dcm"));
    assert!(read_object(&buckets, "fhir-out", "study1.fhir.json").await.is_none());
}

#[tokio::test]
async fn test_non_dicom_source_is_a_parse_error() {
    let buckets = buckets();
    seed(&buckets, "landing", "study1.dcm", b"this is not a DICOM stream".to_vec()).await;
    let log = LogContext::silent();

    let err = Orchestrator::new(&buckets, &log).run(&job()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(read_object(&buckets, "fhir-out", "study1.fhir.json").await.is_none());
}

#[tokio::test]
async fn test_missing_acquisition_time_writes_nothing() {
    let buckets = buckets();
    let elements: Vec<_> = scenario_elements()
        .into_iter()
        .filter(|(tag, _, _)| *tag != tags::ACQUISITION_DATE_TIME)
        .collect();
    seed(&buckets, "landing", "study1.dcm", part10(&elements)).await;
    let (log, output) = capturing_log();

    let status = run_with_resolver(&cli(), &Config::default(), &buckets, &log).await;
    assert_eq!(status, ExitStatus::Failure);
    assert!(read_object(&buckets, "fhir-out", "study1.fhir.json").await.is_none());

    let logged = output.contents();
    assert!(logged.contains("MappingError"));
    assert!(logged.contains("AcquisitionDateTime"));
    assert_eq!(logged.matches("ERROR").count(), 1);
}

#[tokio::test]
async fn test_malformed_acquisition_time_is_a_mapping_error() {
    let buckets = buckets();
    let elements: Vec<_> = scenario_elements()
        .into_iter()
        .map(|(tag, vr, value)| {
            if tag == tags::ACQUISITION_DATE_TIME {
                (tag, vr, "2023-01-01")
            } else {
                (tag, vr, value)
            }
        })
        .collect();
    seed(&buckets, "landing", "study1.dcm", part10(&elements)).await;
    let log = LogContext::silent();

    let err = Orchestrator::new(&buckets, &log).run(&job()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Mapping);
}

#[tokio::test]
async fn test_unwritable_destination_is_a_write_error() {
    // destination bucket is not registered
    let buckets = MemoryBuckets::new().with_bucket("landing");
    seed(&buckets, "landing", "study1.dcm", part10(&scenario_elements())).await;
    let (log, output) = capturing_log();

    let status = run_with_resolver(&cli(), &Config::default(), &buckets, &log).await;
    assert_eq!(status, ExitStatus::Failure);
    let logged = output.contents();
    assert!(logged.contains("StorageWriteError"));
    assert!(logged.contains("s3://fhir-out/study1.fhir.json"));
}

#[tokio::test]
async fn test_success_logs_destination_and_completion() {
    let buckets = buckets();
    seed(&buckets, "landing", "study1.dcm", part10(&scenario_elements())).await;
    let (log, output) = capturing_log();

    let status = run_with_resolver(&cli(), &Config::default(), &buckets, &log).await;
    assert_eq!(status, ExitStatus::Success);

    let logged = output.contents();
    assert!(logged.contains("Processing DICOM file: s3://landing/study1.dcm"));
    assert!(logged.contains("Successfully saved FHIR data to s3://fhir-out/study1.fhir.json"));
    assert!(logged.contains("WSI transform completed successfully"));
    assert!(!logged.contains("ERROR"));
}
