//! Logging infrastructure: the structured run transcript.
//!
//! Provides [`JsonlRunLogger`], a JSONL file writer that implements
//! the [`RunLogger`](scriptorium_application::RunLogger) port.

mod jsonl_run_logger;

pub use jsonl_run_logger::JsonlRunLogger;
