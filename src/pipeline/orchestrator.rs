use crate::config::JobConfig;
use crate::error::TransformError;
use crate::fhir::FhirBuilder;
use crate::logging::LogContext;
use crate::pipeline::extractor::extract;
use crate::pipeline::writer::{write, Acknowledgment};
use crate::storage::BucketResolver;

/// Process outcome of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

/// Sequences extraction, mapping and persistence for a single job.
pub struct Orchestrator<'a> {
    resolver: &'a dyn BucketResolver,
    builder: FhirBuilder,
    log: &'a LogContext,
}

impl<'a> Orchestrator<'a> {
    pub fn new(resolver: &'a dyn BucketResolver, log: &'a LogContext) -> Self {
        Self {
            resolver,
            builder: FhirBuilder::default(),
            log,
        }
    }

    pub fn with_builder(mut self, builder: FhirBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Run the job through every stage.
    ///
    /// # Flow
    /// 1. Extractor: one GET of the source object, header-only parse
    /// 2. Builder: pure mapping to an `ImagingStudy`
    /// 3. Writer: one PUT of the JSON document
    ///
    /// The first failing stage ends the run; later stages never start, so a
    /// failure before the writer leaves no destination object behind.
    pub async fn run(&self, job: &JobConfig) -> Result<Acknowledgment, TransformError> {
        self.log
            .emit(|| tracing::info!("Processing DICOM file: {}", job.source));

        let metadata = extract(self.resolver, &job.source, self.log).await?;
        let document = self.builder.build(&metadata)?;
        let ack = write(&document, &job.destination, self.resolver, self.log).await?;

        self.log.emit(|| tracing::info!("WSI transform completed successfully"));
        Ok(ack)
    }

    /// Run the job and translate the result into an exit status, logging a
    /// single line for any failure.
    pub async fn execute(&self, job: &JobConfig) -> ExitStatus {
        match self.run(job).await {
            Ok(_) => ExitStatus::Success,
            Err(err) => {
                report_failure(self.log, &err);
                ExitStatus::Failure
            }
        }
    }
}

pub(crate) fn report_failure(log: &LogContext, err: &TransformError) {
    log.emit(|| {
        tracing::error!(
            kind = err.kind().as_str(),
            "WSI transform failed: {}",
            err
        )
    });
}
