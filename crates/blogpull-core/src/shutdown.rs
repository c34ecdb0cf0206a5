//! Graceful shutdown via a process-wide atomic flag.
//!
//! The phases check this flag between pages, posts, and assets; the
//! frequent checkpoint writes make stopping at any of those points safe.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown flag, set from the SIGINT/SIGTERM handler.
pub fn shutdown_flag() -> &'static AtomicBool {
    static FLAG: AtomicBool = AtomicBool::new(false);
    &FLAG
}

pub fn is_shutdown_requested() -> bool {
    shutdown_flag().load(Ordering::Relaxed)
}

pub fn request_shutdown() {
    shutdown_flag().store(true, Ordering::Relaxed);
}
