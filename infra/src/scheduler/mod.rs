//! Task scheduling on the tokio runtime

pub mod tokio_scheduler;

pub use tokio_scheduler::TokioScheduler;
