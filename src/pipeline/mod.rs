pub mod extractor;
pub mod orchestrator;
pub mod writer;


pub use extractor::extract;
pub use orchestrator::{ExitStatus, Orchestrator};
pub use writer::{render, write, Acknowledgment, JSON_CONTENT_TYPE};
