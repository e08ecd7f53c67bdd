mod common;

use common::{buckets, cli, part10, read_object, scenario_elements, seed};
use dicom_dictionary_std::tags;
use dicom_core::VR;
use serde_json::{json, Value};
use wsi2fhir::config::Config;
use wsi2fhir::fhir::FhirBuilder;
use wsi2fhir::logging::LogContext;
use wsi2fhir::pipeline::{self, ExitStatus, Orchestrator};
use wsi2fhir::run_with_resolver;

fn expected_document() -> Value {
    json!({
        "resourceType": "ImagingStudy",
        "id": "1.2.3",
        "status": "available",
        "subject": {"reference": "Patient/Doe^Jane", "display": "Doe^Jane"},
        "started": "2023-01-01T12:00:00Z",
        "modality": [{"system": "http://dicom.nema.org/resources/ontology/DCM", "code": "SM"}],
        "series": [{
            "uid": "4.5.6",
            "number": 1,
            "modality": {"system": "http://dicom.nema.org/resources/ontology/DCM", "code": "SM"},
            "description": "Whole Slide Image Pathology Scan",
            "numberOfInstances": 1,
            "instance": [{
                "uid": "1.2.3",
                "number": 1,
                "sopClass": {"system": "urn:ietf:rfc:3986", "code": "1.2.840.10008.5.1.4.1.1.77.1.6"}
            }]
        }]
    })
}

#[tokio::test]
async fn test_reference_slide_produces_expected_document() {
    let buckets = buckets();
    seed(&buckets, "landing", "study1.dcm", part10(&scenario_elements())).await;

    let status = run_with_resolver(&cli(), &Config::default(), &buckets, &LogContext::silent()).await;
    assert_eq!(status, ExitStatus::Success);
    assert_eq!(status.code(), 0);

    let written = read_object(&buckets, "fhir-out", "study1.fhir.json")
        .await
        .expect("destination object written");
    let doc: Value = serde_json::from_slice(&written).expect("valid JSON");
    assert_eq!(doc, expected_document());
}

#[tokio::test]
async fn test_output_is_indented_with_stable_key_order() {
    let buckets = buckets();
    seed(&buckets, "landing", "study1.dcm", part10(&scenario_elements())).await;

    run_with_resolver(&cli(), &Config::default(), &buckets, &LogContext::silent()).await;

    let written = read_object(&buckets, "fhir-out", "study1.fhir.json").await.unwrap();
    let text = String::from_utf8(written).expect("UTF-8 body");
    assert!(text.starts_with("{\n  \"resourceType\": \"ImagingStudy\",\n  \"id\": \"1.2.3\""));

    let keys = ["\"resourceType\"", "\"id\"", "\"status\"", "\"subject\"", "\"started\"", "\"modality\"", "\"series\""];
    let positions: Vec<usize> = keys.iter().map(|k| text.find(k).expect("key present")).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "keys out of order: {text}");
}

#[tokio::test]
async fn test_written_document_round_trips() {
    let buckets = buckets();
    seed(&buckets, "landing", "study1.dcm", part10(&scenario_elements())).await;
    let log = LogContext::silent();
    let job = wsi2fhir::config::JobConfig::from_cli(&cli()).unwrap();

    let metadata = pipeline::extract(&buckets, &job.source, &log).await.expect("extract");
    let document = FhirBuilder::default().build(&metadata).expect("build");
    let ack = pipeline::write(&document, &job.destination, &buckets, &log)
        .await
        .expect("write");

    assert_eq!(ack.location, job.destination);
    let written = read_object(&buckets, "fhir-out", "study1.fhir.json").await.unwrap();
    assert_eq!(ack.bytes_written, written.len());

    let back: wsi2fhir::fhir::ImagingStudy = serde_json::from_slice(&written).expect("deserialize");
    assert_eq!(back, document);
}

#[tokio::test]
async fn test_series_description_passes_through() {
    let buckets = buckets();
    let mut elements = scenario_elements();
    elements.push((tags::SERIES_DESCRIPTION, VR::LO, "Prostate core, H&E"));
    seed(&buckets, "landing", "study1.dcm", part10(&elements)).await;

    let log = LogContext::silent();
    let job = wsi2fhir::config::JobConfig::from_cli(&cli()).unwrap();
    let ack = Orchestrator::new(&buckets, &log).run(&job).await.expect("run");

    let written = read_object(&buckets, &ack.location.bucket, &ack.location.key).await.unwrap();
    let doc: Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(doc["series"][0]["description"], "Prostate core, H&E");
}

#[tokio::test]
async fn test_mapping_table_from_config_is_applied() {
    let buckets = buckets();
    let mut elements = scenario_elements();
    elements.push((tags::SERIES_NUMBER, VR::IS, "5"));
    seed(&buckets, "landing", "study1.dcm", part10(&elements)).await;

    let config: Config = toml::from_str(
        r#"
        [mapping]
        series_number = "series_number"
        number_of_instances = "omit"
        instance_uid = "sop_instance_uid"
        "#,
    )
    .expect("parse config");

    let status = run_with_resolver(&cli(), &config, &buckets, &LogContext::silent()).await;
    assert_eq!(status, ExitStatus::Success);

    let written = read_object(&buckets, "fhir-out", "study1.fhir.json").await.unwrap();
    let doc: Value = serde_json::from_slice(&written).unwrap();
    assert_eq!(doc["series"][0]["number"], 5);
    assert!(doc["series"][0]["numberOfInstances"].is_null());
    assert_eq!(doc["series"][0]["instance"][0]["uid"], "1.2.3.4");
}
