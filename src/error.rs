//! The error taxonomy (spec.md §7). Only configuration errors unwind the
//! pipeline; asset errors are reported to the caller as a recoverable
//! `Result` so the loader can fall back to an untextured material or a
//! black environment, and numerical degeneracies during rendering never
//! reach this type at all — they are clamped/discarded in place
//! (`integrator.rs`, `scheduler.rs`) and only show up as a diagnostic
//! counter.

use thiserror::Error;

/// Rejected before a render starts: bad resolution, zero samples, an
/// unknown scene name. Abort-worthy because no partial image can be
/// produced from them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("width and height must both be non-zero, got {width}x{height}")]
    ZeroResolution { width: u32, height: u32 },

    #[error("numSamples must be at least 1, got {0}")]
    ZeroSamples(u32),

    #[error("numSubSamples must be at least 1, got {0}")]
    ZeroSubSamples(u32),

    #[error("maxBounceCount must be at least 1, got {0}")]
    ZeroBounceCount(u32),

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reported by an external loader (`io/`) when a file is missing or
/// malformed. Callers fall back rather than propagate: a missing texture
/// becomes an untextured material, a missing IBL file becomes a black
/// environment (spec.md §7).
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read '{path}': {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("'{path}' is not a valid {format} file: {reason}")]
    MalformedHeader { path: String, format: &'static str, reason: String },

    #[error("'{path}' ended unexpectedly while reading {what}")]
    Truncated { path: String, what: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_name_the_offending_field() {
        let err = ConfigError::ZeroResolution { width: 0, height: 10 };
        assert!(err.to_string().contains("0x10"));
    }

    #[test]
    fn asset_error_names_the_path_and_format() {
        let err = AssetError::MalformedHeader {
            path: "env.hdr".into(),
            format: "Radiance HDR",
            reason: "missing magic header".into(),
        };
        assert!(err.to_string().contains("env.hdr"));
        assert!(err.to_string().contains("Radiance HDR"));
    }
}
