use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `LookingGlass`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum MirrorError {
    // ── Config document ─────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Mode presets ────────────────────────────────────────────────────
    #[error("mode: {0}")]
    Mode(#[from] ModeError),

    // ── Collaborator fetches ────────────────────────────────────────────
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config document at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse config document: {0}")]
    Parse(String),

    #[error("failed to serialize config document: {0}")]
    Serialize(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Mode errors ────────────────────────────────────────────────────────────

/// Invalid mode strings indicate a programmer/client error and are the one
/// validation failure surfaced to the caller instead of dropped.
#[derive(Debug, Error)]
pub enum ModeError {
    #[error("unsupported os mode: {0:?}")]
    Invalid(String),
}

// ─── Fetch errors ───────────────────────────────────────────────────────────

/// Collaborator failures. Always caught at the call boundary (snapshot
/// builder, quote refresh) and converted into a typed fallback; never allowed
/// to abort a broader request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{service} request failed: {message}")]
    Request { service: String, message: String },

    #[error("{service} returned malformed data: {message}")]
    Decode { service: String, message: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, MirrorError>;
