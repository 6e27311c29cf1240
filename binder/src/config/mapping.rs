use binder_engine::PodMapping;
use serde::{Deserialize, Serialize};

/// Associates a resource type with the mapping used to bind it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMapping {
    /// Matches every group and version of `kind` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub kind: String,

    #[serde(default)]
    pub mapping: PodMapping,
}

impl ResourceMapping {
    pub fn cron_job() -> Self {
        Self {
            api_version: Some(binder_base::consts::k8s::kinds::BATCH_V1.to_string()),
            kind: binder_base::consts::k8s::kinds::CRON_JOB.to_string(),
            mapping: PodMapping::cron_job(),
        }
    }

    pub fn matches(&self, api_version: &str, kind: &str) -> bool {
        self.kind == kind
            && self.api_version.as_deref().is_none_or(|expected| expected == api_version)
    }
}
