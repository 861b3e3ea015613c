//! Shared constants

/// Participant identifier used when the client does not send one.
pub const UNKNOWN_PARTICIPANT: &str = "unknown";

/// Fallback for an original filename that sanitizes to nothing.
pub const FALLBACK_FILENAME: &str = "file";

/// Extension given to notebook uploads.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// `strftime` pattern for the timestamp embedded in stored filenames.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Route prefix under which stored files are served.
pub const SAVED_RESULTS_ROUTE: &str = "/saved_results";
