//! Mapping-driven credential injection for Kubernetes workloads.
//!
//! A [`PodMapping`] tells the engine where annotations, containers and volumes
//! live inside a resource whose shape is otherwise unknown. The engine turns
//! the resource into a generic tree, projects it into a [`PodTemplate`],
//! lets a [`Binding`] mutate the template, and writes the result back.
//!
//! ```rust,ignore
//! let mapping = PodMapping::defaulted();
//! let binding = Binding::new("db", "db-credentials");
//! binding.bind(&mut deployment, &mapping)?;
//! ```

mod binding;
pub mod codec;
mod error;
mod mapping;
pub mod pointer;
mod projector;
pub mod query;
mod template;

pub use self::{
    binding::{Binding, SecretReference},
    error::Error,
    mapping::{ContainerMapping, PodMapping},
    pointer::Pointer,
    query::Query,
    template::{MetaContainer, PodTemplate},
};
