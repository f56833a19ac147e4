//! KernelChaos Custom Resource Definition
//!
//! A KernelChaos injects failures into kernel allocation paths of the selected
//! pods, optionally on a recurring schedule. This module owns the admission
//! semantics of the resource: selector defaulting and field validation.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::pod_mode::validate_pod_mode;
use super::scheduler::{validate_scheduler, SchedulerSpec};
use super::selector::SelectorSpec;
use crate::field::{ErrorList, FieldPath};
use crate::FALLBACK_NAMESPACE;

/// Specification for a KernelChaos
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "chaos-mesh.org",
    version = "v1alpha1",
    kind = "KernelChaos",
    plural = "kernelchaos",
    namespaced,
    status = "KernelChaosStatus",
    printcolumn = r#"{"name":"Mode","type":"string","jsonPath":".spec.mode"}"#,
    printcolumn = r#"{"name":"Phase","type":"string","jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct KernelChaosSpec {
    /// Pods targeted by the experiment
    #[serde(default)]
    pub selector: SelectorSpec,

    /// Pod selection mode: one, all, fixed-count, fixed-percent or random-max-percent
    pub mode: String,

    /// Companion value of `mode` (a count or a percentage)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// Recurrence of the experiment; absent for a one-shot run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler: Option<SchedulerSpec>,

    /// How long each run lasts, e.g. `30s` or `5m`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// The kernel fault to inject
    #[serde(default)]
    pub fail_kern_request: FailKernRequest,
}

/// Kernel allocation fault to inject
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailKernRequest {
    /// Call chain that must be on the stack for the fault to fire
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callchain: Vec<Frame>,

    /// Allocation path to fail: 0 slab (kmalloc), 1 page, 2 bio
    #[serde(default)]
    #[schemars(range(min = 0, max = 2))]
    pub failtype: i32,

    /// Headers to include when compiling the predicates
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,

    /// Chance, in percent, that a matching call fails
    #[serde(default)]
    #[schemars(range(min = 0, max = 100))]
    pub probability: u32,

    /// Maximum number of failures to inject
    #[serde(default)]
    pub times: u32,
}

/// One frame of a kernel call chain
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Function name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub funcname: String,

    /// Parameter list as written in C, e.g. `struct file *file`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameters: String,

    /// C predicate over the parameters, e.g. `STRNCMP(name->name, "bananas", 8)`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub predicate: String,
}

/// Lifecycle phase of a chaos experiment
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum ExperimentPhase {
    /// Accepted but not started
    #[default]
    Waiting,
    /// Fault is being injected
    Running,
    /// Paused by the user
    Paused,
    /// Injection or recovery failed
    Failed,
    /// Experiment completed
    Finished,
}

impl std::fmt::Display for ExperimentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "Waiting"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Failed => write!(f, "Failed"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Status of a KernelChaos
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KernelChaosStatus {
    /// Current phase of the experiment
    #[serde(default)]
    pub phase: ExperimentPhase,

    /// Human-readable message about current state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The generation of the spec last acted upon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl KernelChaosSpec {
    /// Validate the scheduler and duration fields
    pub fn validate_scheduler(&self, path: &FieldPath) -> ErrorList {
        validate_scheduler(self.scheduler.as_ref(), self.duration.as_deref(), path)
    }

    /// Validate the mode and its value
    pub fn validate_pod_mode(&self, path: &FieldPath) -> ErrorList {
        validate_pod_mode(&self.value, &self.mode, path)
    }

    /// Every field error in the spec: scheduler errors first, then pod mode
    pub fn field_errors(&self) -> ErrorList {
        let spec = FieldPath::new("spec");
        let mut errs = self.validate_scheduler(&spec);
        errs.extend(self.validate_pod_mode(&spec));
        errs
    }
}

impl KernelChaos {
    /// Fill unset defaults in place.
    ///
    /// An empty selector namespace list becomes the resource's own namespace
    /// (or [`FALLBACK_NAMESPACE`] when it has none). Calling this again is a
    /// no-op.
    pub fn default_selector(&mut self) {
        let namespace = self
            .metadata
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| FALLBACK_NAMESPACE.to_string());
        self.spec.selector.default_namespace(&namespace);
    }

    /// Validate the resource, reporting every problem at once
    pub fn validate(&self) -> crate::Result<()> {
        match self.spec.field_errors().into_aggregate() {
            None => Ok(()),
            Some(errors) => Err(crate::Error::validation(self.resource_ref(), errors)),
        }
    }

    /// `namespace/name` of the resource, for logs and error messages
    pub fn resource_ref(&self) -> String {
        match self.namespace() {
            Some(ns) => format!("{}/{}", ns, self.name_any()),
            None => self.name_any(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
