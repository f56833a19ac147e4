//! AdmissionReview adapter for KernelChaos
//!
//! Translates AdmissionReview requests into calls on [`KernelChaosWebhook`]
//! and builds the matching responses. The mutating side answers with a JSON
//! patch carrying the defaulted selector; the validating side denies with the
//! aggregated validation message verbatim.

use chaos_common::crd::KernelChaos;
use jsonptr::PointerBuf;
use kube::core::{
    admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation},
    DynamicObject,
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::KernelChaosWebhook;

/// Error type for admission translation
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The admission review request was invalid or malformed
    #[error("invalid admission review: {0}")]
    InvalidReview(String),

    /// The KernelChaos could not be decoded or failed validation
    #[error(transparent)]
    Resource(#[from] chaos_common::Error),
}

/// Handle a mutating admission review
pub fn mutate_review(
    webhook: &KernelChaosWebhook,
    review: AdmissionReview<DynamicObject>,
) -> AdmissionReview<DynamicObject> {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(parent: webhook.span(), error = %e, "Failed to parse admission request");
            return AdmissionResponse::invalid(e.to_string()).into_review();
        }
    };

    mutate(webhook, &request).into_review()
}

/// Handle a validating admission review
pub fn validate_review(
    webhook: &KernelChaosWebhook,
    review: AdmissionReview<DynamicObject>,
) -> AdmissionReview<DynamicObject> {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(parent: webhook.span(), error = %e, "Failed to parse admission request");
            return AdmissionResponse::invalid(e.to_string()).into_review();
        }
    };

    validate(webhook, &request).into_review()
}

/// Default a single request's object and patch in whatever changed
fn mutate(
    webhook: &KernelChaosWebhook,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let uid = &request.uid;

    let obj = match &request.object {
        Some(obj) => obj,
        None => {
            debug!(parent: webhook.span(), uid = %uid, "No object in request, allowing unchanged");
            return AdmissionResponse::from(request);
        }
    };

    let mut chaos = match decode(obj, request) {
        Ok(chaos) => chaos,
        Err(e) => {
            error!(parent: webhook.span(), uid = %uid, error = %e, "Failed to decode KernelChaos");
            return AdmissionResponse::from(request).deny(e.to_string());
        }
    };

    let before = chaos.spec.selector.namespaces.clone();
    webhook.apply_defaults(&mut chaos);
    if chaos.spec.selector.namespaces == before {
        return AdmissionResponse::from(request);
    }

    let patch_ops = build_patch_operations(obj, &chaos.spec.selector.namespaces);
    info!(
        parent: webhook.span(),
        uid = %uid,
        resource = %chaos.resource_ref(),
        patch_ops = patch_ops.len(),
        "Defaulting selector namespaces"
    );

    match AdmissionResponse::from(request).with_patch(json_patch::Patch(patch_ops)) {
        Ok(response) => response,
        Err(e) => {
            error!(parent: webhook.span(), uid = %uid, error = %e, "Failed to serialize patch");
            AdmissionResponse::from(request).deny(format!("patch serialization error: {e}"))
        }
    }
}

/// Route a single request to the validation hook for its operation
fn validate(
    webhook: &KernelChaosWebhook,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let outcome = match request.operation {
        Operation::Create => required(request.object.as_ref(), "object", request)
            .and_then(|chaos| Ok(webhook.validate_create(&chaos)?)),
        Operation::Update => required(request.object.as_ref(), "object", request).and_then(|new| {
            // The previous state never blocks an update, decodable or not.
            let old = request
                .old_object
                .as_ref()
                .and_then(|o| decode(o, request).ok());
            Ok(webhook.validate_update(old.as_ref(), &new)?)
        }),
        Operation::Delete => match request.old_object.as_ref().map(|o| decode(o, request)) {
            Some(Ok(chaos)) => webhook.validate_delete(&chaos).map_err(WebhookError::from),
            // Deletion is never refused, even for objects that no longer decode.
            _ => Ok(()),
        },
        Operation::Connect => Ok(()),
    };

    match outcome {
        Ok(()) => AdmissionResponse::from(request),
        Err(e) => {
            debug!(parent: webhook.span(), uid = %request.uid, error = %e, "Denying request");
            AdmissionResponse::from(request).deny(e.to_string())
        }
    }
}

fn required(
    obj: Option<&DynamicObject>,
    field: &str,
    request: &AdmissionRequest<DynamicObject>,
) -> Result<KernelChaos, WebhookError> {
    let obj = obj.ok_or_else(|| {
        WebhookError::InvalidReview(format!("{:?} request carries no {field}", request.operation))
    })?;
    decode(obj, request)
}

/// Decode a KernelChaos, taking the namespace from the request when the
/// object itself carries none (as on create).
fn decode(
    obj: &DynamicObject,
    request: &AdmissionRequest<DynamicObject>,
) -> Result<KernelChaos, WebhookError> {
    let mut chaos: KernelChaos = serde_json::to_value(obj)
        .and_then(serde_json::from_value)
        .map_err(|e| chaos_common::Error::serialization_for("KernelChaos", e.to_string()))?;
    if chaos.metadata.namespace.is_none() {
        chaos.metadata.namespace = request.namespace.clone();
    }
    Ok(chaos)
}

/// Build JSON patch operations that set the defaulted selector namespaces
fn build_patch_operations(
    obj: &DynamicObject,
    namespaces: &[String],
) -> Vec<json_patch::PatchOperation> {
    use json_patch::{AddOperation, PatchOperation};

    let namespaces = Value::Array(namespaces.iter().cloned().map(Value::String).collect());
    let has_selector = obj
        .data
        .get("spec")
        .and_then(|spec| spec.get("selector"))
        .is_some_and(Value::is_object);

    let op = if has_selector {
        AddOperation {
            path: PointerBuf::from_tokens(["spec", "selector", "namespaces"]),
            value: namespaces,
        }
    } else {
        let mut selector = serde_json::Map::new();
        selector.insert("namespaces".to_string(), namespaces);
        AddOperation {
            path: PointerBuf::from_tokens(["spec", "selector"]),
            value: Value::Object(selector),
        }
    };

    vec![PatchOperation::Add(op)]
}
