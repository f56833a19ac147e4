//! Target pod selection criteria

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Criteria used to pick the pods a chaos experiment targets
///
/// Criteria combine with AND semantics; an empty criterion matches everything.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectorSpec {
    /// Namespaces the target pods live in
    ///
    /// Defaulted to the chaos resource's own namespace when left empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,

    /// Node names the target pods must be scheduled on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,

    /// Explicit pods, keyed by namespace
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pods: BTreeMap<String, Vec<String>>,

    /// Labels of the nodes the target pods run on
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selectors: BTreeMap<String, String>,

    /// Pod field selectors (e.g. `metadata.name`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_selectors: BTreeMap<String, String>,

    /// Pod label selectors
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub label_selectors: BTreeMap<String, String>,

    /// Pod annotation selectors
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotation_selectors: BTreeMap<String, String>,

    /// Pod phases (e.g. `Running`, `Pending`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pod_phase_selectors: Vec<String>,
}

impl SelectorSpec {
    /// Scope the selector to `namespace` unless namespaces are already set.
    pub fn default_namespace(&mut self, namespace: &str) {
        if self.namespaces.is_empty() {
            self.namespaces = vec![namespace.to_string()];
        }
    }
}
