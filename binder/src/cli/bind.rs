use std::path::PathBuf;

use binder_engine::Binding;
use clap::Args;
use snafu::ResultExt;

use crate::{
    cli::{
        error::{self, Error},
        internal::{self, Manifest},
    },
    config::Config,
};

#[derive(Args, Clone)]
pub struct BindCommand {
    #[arg(
        short,
        long,
        help = "Name of the binding. Used as the volume name and as the directory below the \
                binding root."
    )]
    pub name: String,

    #[arg(short, long, help = "Name of the Secret holding the credentials.")]
    pub secret: String,

    #[arg(
        long = "container",
        short = 'C',
        help = "Only bind the container with this name. Repeatable. Every container is bound \
                when omitted."
    )]
    pub containers: Vec<String>,

    #[arg(
        short,
        long,
        help = "Manifest to read, '-' for standard input. Defaults to standard input."
    )]
    pub file: Option<PathBuf>,
}

impl BindCommand {
    pub fn run(self, config: &Config) -> Result<(), Error> {
        let Self { name, secret, containers, file } = self;
        let binding = Binding::new(name, secret).with_containers(containers);

        let mut manifest = Manifest::read(file.as_deref())?;
        bind_all(&binding, &mut manifest, config)?;
        internal::write_stdout(&internal::render(&manifest.objects)?)
    }
}

fn bind_all(binding: &Binding, manifest: &mut Manifest, config: &Config) -> Result<(), Error> {
    for object in &mut manifest.objects {
        let (api_version, kind) = internal::type_of(object);
        let mapping = config.find_mapping(api_version, kind);
        let kind = kind.to_string();
        let name = object.metadata.name.clone().unwrap_or_default();

        tracing::debug!(kind = %kind, name = %name, "Binding resource");
        binding.bind(object, &mapping).context(error::BindResourceSnafu { kind, name })?;
    }
    Ok(())
}
