//! Common types for KernelChaos: the CRD, field errors, and the grammars
//! used to validate it at admission time.

#![deny(missing_docs)]

pub mod crd;
pub mod cron;
pub mod duration;
pub mod error;
pub mod field;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Admission path of the KernelChaos mutating (defaulting) webhook
pub const MUTATE_PATH: &str = "/mutate-chaos-mesh-org-v1alpha1-kernelchaos";

/// Admission path of the KernelChaos validating webhook
pub const VALIDATE_PATH: &str = "/validate-chaos-mesh-org-v1alpha1-kernelchaos";

/// Upper bound accepted for percentage pod modes
pub const MAX_PERCENT: i64 = 100;

/// Namespace used for selector defaulting when the resource carries none
pub const FALLBACK_NAMESPACE: &str = "default";
