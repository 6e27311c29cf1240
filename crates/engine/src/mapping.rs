use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{
    error::{self, Error},
    pointer::Pointer,
    query::Query,
};

pub const DEFAULT_ANNOTATIONS_POINTER: &str = "/spec/template/metadata/annotations";
pub const DEFAULT_VOLUMES_POINTER: &str = "/spec/template/spec/volumes";
pub const DEFAULT_INIT_CONTAINERS_PATH: &str = ".spec.template.spec.initContainers[*]";
pub const DEFAULT_CONTAINERS_PATH: &str = ".spec.template.spec.containers[*]";
pub const DEFAULT_NAME_POINTER: &str = "/name";
pub const DEFAULT_ENV_POINTER: &str = "/env";
pub const DEFAULT_VOLUME_MOUNTS_POINTER: &str = "/volumeMounts";

/// Describes where the pod template pieces of a resource live.
///
/// Unset fields behave as their defaults, which match any resource embedding
/// a `PodTemplateSpec` at `.spec.template` (Deployment, `StatefulSet`,
/// `DaemonSet`, `ReplicaSet`, Job).
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodMapping {
    /// Pointer to the `map[string]string` holding the template annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<String>,

    /// Container locations, evaluated in order. Empty means the init
    /// containers followed by the regular containers of `.spec.template`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<ContainerMapping>,

    /// Pointer to the list of volumes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<String>,
}

/// Locates containers and their fields.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMapping {
    /// Path query run from the root of the resource. It may match nothing.
    pub path: String,

    /// Pointer to the container name, relative to each match. Containers
    /// stay nameless when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_mounts: Option<String>,
}

impl PodMapping {
    /// The mapping for resources shaped like a Deployment, with every field
    /// filled in.
    #[must_use]
    pub fn defaulted() -> Self {
        let mut mapping = Self::default();
        mapping.default_fields();
        mapping
    }

    /// The mapping for a `CronJob`, whose pod template sits under
    /// `.spec.jobTemplate.spec.template`.
    #[must_use]
    pub fn cron_job() -> Self {
        Self {
            annotations: Some("/spec/jobTemplate/spec/template/metadata/annotations".to_string()),
            containers: vec![
                ContainerMapping::named(".spec.jobTemplate.spec.template.spec.initContainers[*]"),
                ContainerMapping::named(".spec.jobTemplate.spec.template.spec.containers[*]"),
            ],
            volumes: Some("/spec/jobTemplate/spec/template/spec/volumes".to_string()),
        }
    }

    /// Fills every unset field with its default. A pointer holding an empty
    /// string counts as unset. Calling it again is a no-op.
    pub fn default_fields(&mut self) {
        fill(&mut self.annotations, DEFAULT_ANNOTATIONS_POINTER);
        if self.containers.is_empty() {
            self.containers = default_containers();
        }
        self.containers.iter_mut().for_each(ContainerMapping::default_fields);
        fill(&mut self.volumes, DEFAULT_VOLUMES_POINTER);
    }

    pub(crate) fn annotations_pointer(&self) -> Pointer {
        pointer_or(self.annotations.as_deref(), DEFAULT_ANNOTATIONS_POINTER)
    }

    pub(crate) fn volumes_pointer(&self) -> Pointer {
        pointer_or(self.volumes.as_deref(), DEFAULT_VOLUMES_POINTER)
    }

    /// Compiles every container query up front so that a malformed one fails
    /// before the resource is looked at.
    pub(crate) fn compile_containers(&self) -> Result<Vec<(ContainerMapping, Query)>, Error> {
        let containers =
            if self.containers.is_empty() { default_containers() } else { self.containers.clone() };
        containers
            .into_iter()
            .map(|mut mapping| {
                mapping.default_fields();
                let query = mapping.query()?;
                Ok((mapping, query))
            })
            .collect()
    }
}

impl ContainerMapping {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self { Self { path: path.into(), ..Self::default() } }

    /// A mapping reading the container name from `/name`.
    #[must_use]
    pub fn named(path: impl Into<String>) -> Self {
        Self { name: Some(DEFAULT_NAME_POINTER.to_string()), ..Self::new(path) }
    }

    /// Fills the env and volume mount pointers when unset or empty. The name
    /// pointer is optional and left alone; an empty one reads as no name.
    pub fn default_fields(&mut self) {
        fill(&mut self.env, DEFAULT_ENV_POINTER);
        fill(&mut self.volume_mounts, DEFAULT_VOLUME_MOUNTS_POINTER);
    }

    /// # Errors
    ///
    /// Returns [`Error::CompileQuery`] when `path` is malformed.
    pub fn query(&self) -> Result<Query, Error> {
        Query::compile(&self.path)
            .context(error::CompileQuerySnafu { expression: self.path.clone() })
    }

    pub(crate) fn name_pointer(&self) -> Option<Pointer> {
        self.name.as_deref().filter(|pointer| !pointer.is_empty()).map(Pointer::parse)
    }

    pub(crate) fn env_pointer(&self) -> Pointer {
        pointer_or(self.env.as_deref(), DEFAULT_ENV_POINTER)
    }

    pub(crate) fn volume_mounts_pointer(&self) -> Pointer {
        pointer_or(self.volume_mounts.as_deref(), DEFAULT_VOLUME_MOUNTS_POINTER)
    }
}

fn fill(field: &mut Option<String>, default: &str) {
    if field.as_deref().is_none_or(str::is_empty) {
        *field = Some(default.to_string());
    }
}

fn pointer_or(pointer: Option<&str>, default: &str) -> Pointer {
    Pointer::parse(pointer.filter(|pointer| !pointer.is_empty()).unwrap_or(default))
}

fn default_containers() -> Vec<ContainerMapping> {
    vec![
        ContainerMapping::named(DEFAULT_INIT_CONTAINERS_PATH),
        ContainerMapping::named(DEFAULT_CONTAINERS_PATH),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_empty_container_mapping() {
        let mut mapping = ContainerMapping::default();
        mapping.default_fields();
        assert_eq!(
            mapping,
            ContainerMapping {
                path: String::new(),
                name: None,
                env: Some("/env".to_string()),
                volume_mounts: Some("/volumeMounts".to_string()),
            }
        );
    }

    #[test]
    fn test_default_keeps_custom_container_fields() {
        let mut mapping = ContainerMapping {
            path: ".spec.containers[*]".to_string(),
            name: Some("/id".to_string()),
            env: Some("/environment".to_string()),
            volume_mounts: None,
        };
        mapping.default_fields();
        assert_eq!(mapping.name.as_deref(), Some("/id"));
        assert_eq!(mapping.env.as_deref(), Some("/environment"));
        assert_eq!(mapping.volume_mounts.as_deref(), Some("/volumeMounts"));
    }

    #[test]
    fn test_default_treats_empty_pointers_as_unset() {
        let mut mapping = PodMapping {
            annotations: Some(String::new()),
            containers: vec![ContainerMapping {
                env: Some(String::new()),
                volume_mounts: Some(String::new()),
                ..ContainerMapping::new(DEFAULT_CONTAINERS_PATH)
            }],
            volumes: Some(String::new()),
        };
        assert_eq!(mapping.annotations_pointer().to_string(), DEFAULT_ANNOTATIONS_POINTER);
        assert_eq!(mapping.containers[0].env_pointer().to_string(), DEFAULT_ENV_POINTER);

        mapping.default_fields();
        assert_eq!(mapping.annotations.as_deref(), Some(DEFAULT_ANNOTATIONS_POINTER));
        assert_eq!(mapping.volumes.as_deref(), Some(DEFAULT_VOLUMES_POINTER));
        assert_eq!(mapping.containers[0].env.as_deref(), Some(DEFAULT_ENV_POINTER));
        assert_eq!(
            mapping.containers[0].volume_mounts.as_deref(),
            Some(DEFAULT_VOLUME_MOUNTS_POINTER)
        );
    }

    #[test]
    fn test_empty_name_pointer_reads_as_unnamed() {
        let mapping =
            ContainerMapping { name: Some(String::new()), ..ContainerMapping::new(".a[*]") };
        assert_eq!(mapping.name_pointer(), None);
    }

    #[test]
    fn test_default_empty_pod_mapping() {
        let mapping = PodMapping::defaulted();
        assert_eq!(mapping.annotations.as_deref(), Some("/spec/template/metadata/annotations"));
        assert_eq!(mapping.volumes.as_deref(), Some("/spec/template/spec/volumes"));
        assert_eq!(
            mapping.containers,
            vec![
                ContainerMapping {
                    path: ".spec.template.spec.initContainers[*]".to_string(),
                    name: Some("/name".to_string()),
                    env: Some("/env".to_string()),
                    volume_mounts: Some("/volumeMounts".to_string()),
                },
                ContainerMapping {
                    path: ".spec.template.spec.containers[*]".to_string(),
                    name: Some("/name".to_string()),
                    env: Some("/env".to_string()),
                    volume_mounts: Some("/volumeMounts".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_default_is_idempotent() {
        let once = PodMapping::defaulted();
        let mut twice = once.clone();
        twice.default_fields();
        assert_eq!(once, twice);

        let mut cron_job = PodMapping::cron_job();
        cron_job.default_fields();
        let mut again = cron_job.clone();
        again.default_fields();
        assert_eq!(cron_job, again);
    }

    #[test]
    fn test_default_defaults_each_custom_container_independently() {
        let mut mapping = PodMapping {
            containers: vec![
                ContainerMapping { env: Some("/e".to_string()), ..ContainerMapping::new(".a[*]") },
                ContainerMapping::new(".b[*]"),
            ],
            ..PodMapping::default()
        };
        mapping.default_fields();
        assert_eq!(mapping.containers.len(), 2);
        assert_eq!(mapping.containers[0].env.as_deref(), Some("/e"));
        assert_eq!(mapping.containers[1].env.as_deref(), Some("/env"));
        assert_eq!(mapping.containers[1].name, None);
    }

    #[test]
    fn test_compile_containers_fails_on_malformed_path() {
        let mapping = PodMapping {
            containers: vec![ContainerMapping::new(".spec.containers[*]"), ContainerMapping::new("[")],
            ..PodMapping::default()
        };
        let err = mapping.compile_containers().unwrap_err();
        assert!(matches!(err, Error::CompileQuery { expression, .. } if expression == "["));
    }

    #[test]
    fn test_deserialize_from_yaml_shape() {
        let mapping: PodMapping = serde_json::from_value(serde_json::json!({
            "annotations": "/spec/jobTemplate/spec/template/metadata/annotations",
            "containers": [{
                "path": ".spec.jobTemplate.spec.template.spec.containers[*]",
                "name": "/name",
                "volumeMounts": "/mounts",
            }],
        }))
        .unwrap();
        assert_eq!(mapping.containers[0].volume_mounts.as_deref(), Some("/mounts"));
        assert_eq!(mapping.containers[0].env, None);
        assert_eq!(mapping.volumes, None);
    }
}
