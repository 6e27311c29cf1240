use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{EnvVar, Volume, VolumeMount};
use serde::{Deserialize, Serialize};

/// Shape-independent view of a workload's pod template.
///
/// Built fresh by [`PodMapping::to_meta`](crate::PodMapping::to_meta) on every
/// call and written back by
/// [`PodMapping::from_meta`](crate::PodMapping::from_meta).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplate {
    pub annotations: BTreeMap<String, String>,

    /// Containers in mapping order, then match order.
    pub containers: Vec<MetaContainer>,

    pub volumes: Vec<Volume>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaContainer {
    /// Empty when the mapping has no name pointer.
    pub name: String,

    pub env: Vec<EnvVar>,

    pub volume_mounts: Vec<VolumeMount>,
}

impl PodTemplate {
    #[must_use]
    pub fn volume(&self, name: &str) -> Option<&Volume> {
        self.volumes.iter().find(|volume| volume.name == name)
    }

    #[must_use]
    pub fn container(&self, name: &str) -> Option<&MetaContainer> {
        self.containers.iter().find(|container| container.name == name)
    }
}

impl MetaContainer {
    #[must_use]
    pub fn env_var(&self, name: &str) -> Option<&EnvVar> {
        self.env.iter().find(|env| env.name == name)
    }

    #[must_use]
    pub fn volume_mount(&self, name: &str) -> Option<&VolumeMount> {
        self.volume_mounts.iter().find(|mount| mount.name == name)
    }
}
