use std::collections::BTreeSet;

use binder_base::consts::binding::{DEFAULT_BINDING_ROOT, SERVICE_BINDING_ROOT};
use k8s_openapi::api::core::v1::{EnvVar, SecretVolumeSource, Volume, VolumeMount};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    error::Error,
    mapping::PodMapping,
    template::{MetaContainer, PodTemplate},
};

/// Reference to a secret in the namespace of the workload.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SecretReference {
    pub name: String,
}

/// Credentials to project into the containers of a workload.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Name of the binding. Used as the volume name and as the directory of
    /// the mount below the binding root.
    pub name: String,

    /// Secret holding the credentials to bind.
    pub secret: SecretReference,

    /// Names of the containers to bind. Every container is bound when empty.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub containers: BTreeSet<String>,
}

impl Binding {
    #[must_use]
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: SecretReference { name: secret.into() },
            containers: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_containers<I, S>(mut self, containers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers.extend(containers.into_iter().map(Into::into));
        self
    }

    /// Injects this binding into `resource`, locating its pod template with
    /// `mapping`.
    ///
    /// Binding the same resource twice leaves it as the first call did.
    ///
    /// # Errors
    ///
    /// Returns an error when the resource cannot be projected or written
    /// back. `resource` is unchanged in that case.
    pub fn bind<R>(&self, resource: &mut R, mapping: &PodMapping) -> Result<(), Error>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut template = mapping.to_meta(&*resource)?;
        let bound = self.apply(&mut template);
        mapping.from_meta(resource, &template)?;
        tracing::info!(binding = %self.name, secret = %self.secret.name, bound, "Binding injected");
        Ok(())
    }

    /// Injects this binding into an already projected template and returns
    /// the number of containers it selected.
    ///
    /// Each selected container gets `SERVICE_BINDING_ROOT` unless it already
    /// declares one, and a read-only mount of the binding below that root.
    /// The secret volume is registered once if any container was selected.
    pub fn apply(&self, template: &mut PodTemplate) -> usize {
        let mut bound = 0;
        for container in
            template.containers.iter_mut().filter(|container| self.selects(&container.name))
        {
            let root = binding_root(container);
            if container.volume_mount(&self.name).is_none() {
                container.volume_mounts.push(VolumeMount {
                    name: self.name.clone(),
                    mount_path: format!("{}/{}", root.trim_end_matches('/'), self.name),
                    read_only: Some(true),
                    ..VolumeMount::default()
                });
            }
            bound += 1;
        }
        if bound > 0 && template.volume(&self.name).is_none() {
            template.volumes.push(self.volume());
        }
        bound
    }

    fn selects(&self, container: &str) -> bool {
        self.containers.is_empty() || self.containers.contains(container)
    }

    fn volume(&self) -> Volume {
        Volume {
            name: self.name.clone(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(self.secret.name.clone()),
                ..SecretVolumeSource::default()
            }),
            ..Volume::default()
        }
    }
}

/// Returns the binding root declared by `container`, declaring the default
/// one first if it has none.
fn binding_root(container: &mut MetaContainer) -> String {
    if let Some(env) = container.env_var(SERVICE_BINDING_ROOT) {
        // set through `valueFrom`, the actual path is unknown here
        return env.value.clone().unwrap_or_else(|| DEFAULT_BINDING_ROOT.to_string());
    }
    container.env.push(EnvVar {
        name: SERVICE_BINDING_ROOT.to_string(),
        value: Some(DEFAULT_BINDING_ROOT.to_string()),
        ..EnvVar::default()
    });
    DEFAULT_BINDING_ROOT.to_string()
}
