//! Error types for netform.
//!
//! Every failure the generator can produce is deterministic: the same
//! topology always fails the same way, so nothing here is retried. Errors
//! carry the field path and offending value so the caller can render a
//! message next to the input that caused it.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for netform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for netform.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Topology Errors
    // ========================================================================
    /// A required field is missing, malformed, or an enum value is unknown.
    #[error("Invalid configuration at '{path}': {message}")]
    Configuration {
        /// Field path, e.g. `network.vpcCidr`
        path: String,
        /// Error message
        message: String,
    },

    /// A workload or subnet references a region the network does not define.
    #[error("'{subject}' references region '{region}' which is neither the primary region nor a secondary region")]
    UnresolvedRegion {
        /// Field path of the referencing entry, e.g. `workloads[web].region`
        subject: String,
        /// The unknown region
        region: String,
    },

    /// A workload kind outside compute, orchestrated and serverless.
    #[error("Workload '{workload}' has unsupported kind '{kind}' (expected compute, orchestrated or serverless)")]
    UnsupportedWorkloadKind {
        /// Workload name
        workload: String,
        /// Kind as written in the input
        kind: String,
    },

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// Two different logical resources resolved to the same symbolic name.
    #[error("Symbolic name '{name}' is already assigned to {existing}; cannot assign it to {requested}")]
    NameCollision {
        /// The contested symbolic name
        name: String,
        /// Key that owns the name
        existing: String,
        /// Key that asked for it
        requested: String,
    },

    /// A declaration references something not declared before it.
    #[error("Declaration '{from}' references '{target}' which is not declared earlier in the template")]
    DanglingReference {
        /// Address of the referencing declaration
        from: String,
        /// Address of the missing target
        target: String,
    },

    /// No non-overlapping range left for cluster pod/service networks.
    #[error("Cannot allocate a {purpose} range for workload '{workload}': address pool exhausted")]
    CidrExhausted {
        /// Workload name
        workload: String,
        /// What the range was for (pods, services, control plane)
        purpose: String,
    },

    // ========================================================================
    // Loading Errors
    // ========================================================================
    /// Failed to read or parse a topology document.
    #[error("Failed to load '{path}': {message}")]
    Load {
        /// Path to the document
        path: PathBuf,
        /// Error message
        message: String,
        /// Source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new unresolved region error.
    pub fn unresolved_region(subject: impl Into<String>, region: impl Into<String>) -> Self {
        Self::UnresolvedRegion {
            subject: subject.into(),
            region: region.into(),
        }
    }

    /// Creates a new load error.
    pub fn load(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Returns true if the error points at the caller's input rather than
    /// at the generator itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::UnresolvedRegion { .. }
                | Error::UnsupportedWorkloadKind { .. }
                | Error::CidrExhausted { .. }
                | Error::Load { .. }
        )
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration { .. } | Error::Load { .. } => 2,
            Error::UnresolvedRegion { .. } | Error::UnsupportedWorkloadKind { .. } => 3,
            Error::CidrExhausted { .. } => 4,
            Error::NameCollision { .. } | Error::DanglingReference { .. } => 5,
            Error::Io(_) => 1,
        }
    }
}
