pub mod error_log;
pub mod separation_service;

pub use error_log::{ErrorLog, ErrorLogSink};
pub use separation_service::{SeparationOutcome, SeparationService};
