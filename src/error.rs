/// Crate-level error types for apilink.
use std::path::PathBuf;

/// All errors in apilink carry enough context to produce a useful diagnostic
/// without a debugger. Resolution itself never errors; a failed lookup
/// degrades to plain inline code, so every variant here is an I/O or
/// configuration fault.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scanned page disappeared before it could be read.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed.
    #[error("json serialize: {0}")]
    Json(
        /// The wrapped JSON serialization error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    WatchFailed {
        /// Description of the watcher failure.
        reason: String,
    },
}
