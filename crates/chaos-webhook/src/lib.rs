//! Admission hooks for KernelChaos
//!
//! [`KernelChaosWebhook`] exposes the four admission call points (default,
//! validate create/update/delete) as plain methods over the resource. The
//! [`admission`] module adapts them to Kubernetes AdmissionReview objects so
//! the host can mount them on whatever HTTP server it runs.
//!
//! # Modules
//!
//! - [`admission`] - AdmissionReview request/response translation

#![deny(missing_docs)]

pub mod admission;
mod kernel_chaos;

pub use chaos_common::{MUTATE_PATH, VALIDATE_PATH};
pub use kernel_chaos::KernelChaosWebhook;
