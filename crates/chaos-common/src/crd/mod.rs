//! Custom Resource Definitions for chaos experiments
//!
//! Besides the KernelChaos resource itself, this module holds the pieces
//! shared by scheduled, pod-targeting chaos kinds: the pod selector, the pod
//! selection modes, and the scheduler.

mod kernel_chaos;
mod pod_mode;
mod scheduler;
mod selector;

pub use kernel_chaos::{
    ExperimentPhase, FailKernRequest, Frame, KernelChaos, KernelChaosSpec, KernelChaosStatus,
};
pub use pod_mode::{validate_pod_mode, PodMode, UnknownPodMode};
pub use scheduler::{validate_scheduler, SchedulerSpec};
pub use selector::SelectorSpec;
