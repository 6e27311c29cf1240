use std::path::PathBuf;

use binder_engine::PodTemplate;
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
pub struct InspectCommand {
    #[arg(
        short,
        long,
        help = "Manifest to read, '-' for standard input. Defaults to standard input."
    )]
    pub file: Option<PathBuf>,
}

impl InspectCommand {
    pub fn run(self, config: &Config) -> Result<(), Error> {
        let manifest = Manifest::read(self.file.as_deref())?;
        let templates = project_all(&manifest, config)?;
        internal::write_stdout(&internal::render(&templates)?)
    }
}

fn project_all(manifest: &Manifest, config: &Config) -> Result<Vec<PodTemplate>, Error> {
    manifest
        .objects
        .iter()
        .map(|object| {
            let (api_version, kind) = internal::type_of(object);
            config.find_mapping(api_version, kind).to_meta(object).with_context(|_| {
                error::InspectResourceSnafu {
                    kind,
                    name: object.metadata.name.clone().unwrap_or_default(),
                }
            })
        })
        .collect()
}
