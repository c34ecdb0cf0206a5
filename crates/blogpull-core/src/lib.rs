//! blogpull core - shared infrastructure for the blogpull pipeline.
//!
//! Provides the blocking HTTP layer, atomic filesystem writes, logging,
//! progress reporting, and the graceful-shutdown flag used by the
//! pipeline crates.

pub mod fsops;
pub mod http;
pub mod logging;
pub mod progress;
pub mod shutdown;

// Re-exports for convenience
pub use fsops::{cleanup_tmp_files, tmp_path, write_atomic};
pub use http::{Client, DownloadError, FetchError, HttpSettings, SHARED_RUNTIME};
pub use logging::{init_logging, IndicatifLogger};
pub use progress::{ProgressContext, SharedProgress};
pub use shutdown::{is_shutdown_requested, request_shutdown, shutdown_flag};
