//! Defaulting and validation call points for KernelChaos

use chaos_common::crd::KernelChaos;
use chaos_common::Result;
use kube::ResourceExt;
use tracing::{debug, info, info_span, warn, Span};

/// Admission call points for KernelChaos
///
/// Holds no state besides the span its log events are attached to, so one
/// instance can serve concurrent requests. Pass `Span::none()` to silence it.
#[derive(Clone, Debug)]
pub struct KernelChaosWebhook {
    span: Span,
}

impl Default for KernelChaosWebhook {
    fn default() -> Self {
        Self::new(info_span!("kernelchaos-resource"))
    }
}

impl KernelChaosWebhook {
    /// Create hooks that log under `span`
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Span every event of these hooks is attached to
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Fill unset fields before the resource is persisted
    pub fn apply_defaults(&self, chaos: &mut KernelChaos) {
        info!(parent: &self.span, name = %chaos.name_any(), "default");
        chaos.default_selector();
    }

    /// Validate a resource being created
    pub fn validate_create(&self, chaos: &KernelChaos) -> Result<()> {
        info!(parent: &self.span, name = %chaos.name_any(), "validate create");
        self.validate(chaos)
    }

    /// Validate a resource being updated
    ///
    /// Only the new object is checked, exactly as on create. `old` is absent
    /// when the previous state is missing or no longer decodes.
    pub fn validate_update(&self, old: Option<&KernelChaos>, new: &KernelChaos) -> Result<()> {
        info!(
            parent: &self.span,
            name = %new.name_any(),
            has_old = old.is_some(),
            "validate update"
        );
        self.validate(new)
    }

    /// Validate a resource being deleted; deletion is never refused
    pub fn validate_delete(&self, chaos: &KernelChaos) -> Result<()> {
        info!(parent: &self.span, name = %chaos.name_any(), "validate delete");
        Ok(())
    }

    fn validate(&self, chaos: &KernelChaos) -> Result<()> {
        match chaos.validate() {
            Ok(()) => {
                debug!(parent: &self.span, resource = %chaos.resource_ref(), "accepted");
                Ok(())
            }
            Err(e) => {
                warn!(
                    parent: &self.span,
                    resource = %chaos.resource_ref(),
                    errors = e.field_errors().len(),
                    error = %e,
                    "rejected"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaos_common::crd::{KernelChaosSpec, SchedulerSpec};

    fn webhook() -> KernelChaosWebhook {
        KernelChaosWebhook::new(Span::none())
    }

    fn chaos(mode: &str, value: &str) -> KernelChaos {
        let spec: KernelChaosSpec = serde_json::from_value(serde_json::json!({
            "mode": mode,
            "value": value,
        }))
        .unwrap();
        let mut chaos = KernelChaos::new("kernel-fault", spec);
        chaos.metadata.namespace = Some("ns-a".to_string());
        chaos
    }

    #[test]
    fn create_accepts_valid_spec() {
        assert!(webhook().validate_create(&chaos("fixed-count", "3")).is_ok());
    }

    #[test]
    fn create_rejects_invalid_spec() {
        let err = webhook().validate_create(&chaos("one", "5")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn update_validates_only_new_object() {
        let old = chaos("one", "not valid anyway");
        let new = chaos("all", "");
        assert!(webhook().validate_update(Some(&old), &new).is_ok());

        let old = chaos("all", "");
        let new = chaos("fixed-percent", "101");
        assert!(webhook().validate_update(Some(&old), &new).is_err());
    }

    #[test]
    fn update_without_previous_state_matches_create() {
        assert!(webhook().validate_update(None, &chaos("all", "")).is_ok());
        assert!(webhook().validate_update(None, &chaos("one", "5")).is_err());
    }

    #[test]
    fn update_matches_create() {
        let hooks = webhook();
        for (mode, value) in [("one", ""), ("one", "1"), ("fixed", "2"), ("bogus", "")] {
            let c = chaos(mode, value);
            assert_eq!(
                hooks.validate_create(&c).is_ok(),
                hooks.validate_update(Some(&c), &c).is_ok(),
                "create and update disagree on {mode}/{value}"
            );
        }
    }

    #[test]
    fn delete_always_succeeds() {
        let mut broken = chaos("bogus", "-1");
        broken.spec.scheduler = Some(SchedulerSpec {
            cron: "never".to_string(),
        });
        assert!(webhook().validate_delete(&broken).is_ok());
    }

    #[test]
    fn defaults_scope_selector() {
        let mut c = chaos("all", "");
        webhook().apply_defaults(&mut c);
        assert_eq!(c.spec.selector.namespaces, vec!["ns-a"]);
    }

    #[test]
    fn default_hooks_work_without_subscriber() {
        let hooks = KernelChaosWebhook::default();
        let mut c = chaos("all", "");
        hooks.apply_defaults(&mut c);
        assert!(hooks.validate_create(&c).is_ok());
    }
}
