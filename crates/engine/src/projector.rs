//! Projection between a resource and its [`PodTemplate`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::ensure;

use crate::{
    codec,
    error::{self, Error},
    mapping::{ContainerMapping, PodMapping},
    template::{MetaContainer, PodTemplate},
};

impl PodMapping {
    /// Reads the pod template of `resource` through this mapping.
    ///
    /// Pointers that resolve to nothing produce empty values, and container
    /// queries without matches are skipped. The resource is never modified.
    ///
    /// # Errors
    ///
    /// Returns an error when the resource cannot be converted, a container
    /// query is malformed, or a located value has the wrong shape.
    pub fn to_meta<R>(&self, resource: &R) -> Result<PodTemplate, Error>
    where
        R: Serialize + ?Sized,
    {
        let tree = codec::to_tree(resource)?;
        let queries = self.compile_containers()?;

        let annotations = self.annotations_pointer().get(&tree)?;
        let mut containers = Vec::new();
        for (mapping, query) in &queries {
            let matches = query.evaluate(&tree);
            if matches.is_empty() {
                tracing::debug!(path = query.expression(), "No containers matched, skipping");
                continue;
            }
            for node in matches {
                let container = mapping.project(node)?;
                tracing::trace!(
                    path = query.expression(),
                    name = %container.name,
                    "Projected container"
                );
                containers.push(container);
            }
        }
        let volumes = self.volumes_pointer().get(&tree)?;

        Ok(PodTemplate { annotations, containers, volumes })
    }

    /// Writes `template` into `resource` through this mapping.
    ///
    /// Containers are matched again against the current resource and consumed
    /// from `template.containers` in order, so the resource must still have
    /// the containers it had when `template` was read. With a name pointer, a
    /// matched container that already carries a different non-empty name is
    /// rejected; nameless containers take the template's name. Without one,
    /// only the count is checked. Missing parents are created. `resource` is
    /// replaced only once every write succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContainerMismatch`] when the number of matched
    /// containers differs from the template, [`Error::ContainerRenamed`] when
    /// a matched container has another name, [`Error::PathConflict`] when a
    /// pointer runs into a non-object, or a conversion error.
    pub fn from_meta<R>(&self, resource: &mut R, template: &PodTemplate) -> Result<(), Error>
    where
        R: Serialize + DeserializeOwned,
    {
        let mut tree = codec::to_tree(&*resource)?;
        let queries = self.compile_containers()?;

        self.annotations_pointer().set(&mut tree, &template.annotations)?;
        let mut pending = template.containers.iter();
        let mut found = 0;
        for (mapping, query) in &queries {
            for node in query.evaluate_mut(&mut tree) {
                if let Some(container) = pending.next() {
                    mapping.write(node, container, found)?;
                }
                found += 1;
            }
        }
        ensure!(
            found == template.containers.len(),
            error::ContainerMismatchSnafu { expected: template.containers.len(), found }
        );
        self.volumes_pointer().set(&mut tree, &template.volumes)?;

        codec::from_tree(tree, resource)
    }
}

impl ContainerMapping {
    fn project(&self, node: &Value) -> Result<MetaContainer, Error> {
        let name = match self.name_pointer() {
            Some(pointer) => pointer.get(node)?,
            None => String::new(),
        };
        Ok(MetaContainer {
            name,
            env: self.env_pointer().get(node)?,
            volume_mounts: self.volume_mounts_pointer().get(node)?,
        })
    }

    fn write(
        &self,
        node: &mut Value,
        container: &MetaContainer,
        position: usize,
    ) -> Result<(), Error> {
        if let Some(pointer) = self.name_pointer() {
            let current: String = pointer.get(node)?;
            ensure!(
                current.is_empty() || current == container.name,
                error::ContainerRenamedSnafu {
                    position,
                    expected: container.name.clone(),
                    found: current,
                }
            );
            pointer.set(node, &container.name)?;
        }
        self.env_pointer().set(node, &container.env)?;
        self.volume_mounts_pointer().set(node, &container.volume_mounts)
    }
}
