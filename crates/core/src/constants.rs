//! Constants shared across the diagnostics client.

/// Diagnose endpoint used when `RACKDIAG_DIAGNOSE_URL` is not set.
pub const DEFAULT_DIAGNOSE_URL: &str = "http://127.0.0.1:8000/api/diagnose";

/// Per-request deadline used when `RACKDIAG_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Number of characters of a manual chunk shown in the result panel.
pub const MANUAL_CHUNK_PREVIEW_CHARS: usize = 120;
