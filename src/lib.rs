pub mod config;
pub mod error;
pub mod fhir;
pub mod logging;
pub mod pipeline;
pub mod storage;

pub use dicom_header::DicomHeaderMetadata;
pub use error::{ErrorKind, TransformError};

use crate::config::{Cli, Config, JobConfig, LoggingConfig};
use crate::fhir::FhirBuilder;
use crate::logging::LogContext;
use crate::pipeline::orchestrator::report_failure;
use crate::pipeline::{ExitStatus, Orchestrator};
use crate::storage::BucketResolver;

/// Process entry: load settings, then run one job on a single-threaded
/// runtime.
pub fn run(cli: Cli) -> ExitStatus {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            // No logging settings yet, so report through the defaults
            return match LogContext::from_config(&LoggingConfig::default()) {
                Ok(log) => fail(&log, err.into()),
                Err(_) => ExitStatus::Failure,
            };
        }
    };

    let log = match LogContext::from_config(&config.logging) {
        Ok(log) => log,
        Err(err) => {
            return match LogContext::from_config(&LoggingConfig::default()) {
                Ok(fallback) => fail(&fallback, err.into()),
                Err(_) => ExitStatus::Failure,
            };
        }
    };

    let resolver = match storage::create_bucket_resolver(&config.storage) {
        Ok(resolver) => resolver,
        Err(err) => return fail(&log, err.into()),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            log.emit(|| tracing::error!("Failed to start runtime: {}", err));
            return ExitStatus::Failure;
        }
    };

    runtime.block_on(run_with_resolver(&cli, &config, resolver.as_ref(), &log))
}

/// Validate the job values and, only if they are complete, run the pipeline
/// against `resolver`.
pub async fn run_with_resolver(
    cli: &Cli,
    config: &Config,
    resolver: &dyn BucketResolver,
    log: &LogContext,
) -> ExitStatus {
    let job = match JobConfig::from_cli(cli) {
        Ok(job) => job,
        Err(err) => return fail(log, err.into()),
    };

    Orchestrator::new(resolver, log)
        .with_builder(FhirBuilder::new(config.mapping.clone()))
        .execute(&job)
        .await
}

fn fail(log: &LogContext, err: TransformError) -> ExitStatus {
    report_failure(log, &err);
    ExitStatus::Failure
}
