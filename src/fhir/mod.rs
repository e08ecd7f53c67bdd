pub mod builder;
pub mod mapping;
pub mod model;

pub use builder::{FhirBuilder, MappingError, SERIES_DESCRIPTION_FALLBACK};
pub use mapping::{FieldMapping, NumberSource, UidSource};
pub use model::{Coding, ImagingStudy, Instance, Reference, Series};
